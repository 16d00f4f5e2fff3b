//! Read-only view of wave summaries as produced by the search index.
//!
//! The ordering engine and the reference filter only read records through the
//! [`SummaryRecord`] and [`SubDocument`] traits, so any index representation can
//! be sorted without copying into the concrete types below.

use crate::core::types::{ParticipantId, WaveId, WaveletId};
use serde::{Deserialize, Serialize};

/// One constituent document (wavelet) of a wave
pub trait SubDocument {
    fn creation_time(&self) -> i64;

    fn last_modified_time(&self) -> i64;

    fn creator(&self) -> &ParticipantId;

    /// Conversational sub-documents take part in the visible discussion;
    /// only they contribute to aggregate timestamps.
    fn is_conversational(&self) -> bool;

    fn is_conversation_root(&self) -> bool;

    fn participants(&self) -> &[ParticipantId] {
        &[]
    }
}

/// A summarized wave with a unique, totally ordered id
pub trait SummaryRecord {
    type Id: Ord;
    type Doc: SubDocument;

    fn id(&self) -> &Self::Id;

    fn sub_documents(&self) -> &[Self::Doc];

    /// Max of `time` over conversational sub-documents, -1 if there are none.
    fn conversational_max<F>(&self, time: F) -> i64
    where
        F: Fn(&Self::Doc) -> i64,
    {
        self.sub_documents()
            .iter()
            .filter(|doc| doc.is_conversational())
            .map(time)
            .fold(-1, i64::max)
    }

    /// Author of the conversation root, if the root is present
    fn root_creator(&self) -> Option<&ParticipantId> {
        self.sub_documents().iter().find(|doc| doc.is_conversation_root()).map(|doc| doc.creator())
    }
}

/// Concrete wavelet summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveletSummary {
    pub id: WaveletId,
    pub creator: ParticipantId,
    pub creation_time: i64,
    pub last_modified_time: i64,
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
}

impl WaveletSummary {
    pub fn new(
        id: impl Into<String>,
        creator: ParticipantId,
        creation_time: i64,
        last_modified_time: i64,
    ) -> Self {
        Self {
            id: WaveletId::new(id),
            creator,
            creation_time,
            last_modified_time,
            participants: Vec::new(),
        }
    }

    pub fn with_participants(mut self, participants: Vec<ParticipantId>) -> Self {
        self.participants = participants;
        self
    }
}

impl SubDocument for WaveletSummary {
    fn creation_time(&self) -> i64 {
        self.creation_time
    }

    fn last_modified_time(&self) -> i64 {
        self.last_modified_time
    }

    fn creator(&self) -> &ParticipantId {
        &self.creator
    }

    fn is_conversational(&self) -> bool {
        self.id.is_conversational()
    }

    fn is_conversation_root(&self) -> bool {
        self.id.is_conversation_root()
    }

    fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }
}

/// Concrete wave summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSummary {
    pub id: WaveId,
    #[serde(default)]
    pub wavelets: Vec<WaveletSummary>,
}

impl WaveSummary {
    pub fn new(id: impl Into<WaveId>, wavelets: Vec<WaveletSummary>) -> Self {
        Self { id: id.into(), wavelets }
    }
}

impl SummaryRecord for WaveSummary {
    type Id = WaveId;
    type Doc = WaveletSummary;

    fn id(&self) -> &WaveId {
        &self.id
    }

    fn sub_documents(&self) -> &[WaveletSummary] {
        &self.wavelets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ParticipantId {
        ParticipantId::of("alice@example.com").unwrap()
    }

    #[test]
    fn test_conversational_max_skips_metadata_wavelets() {
        let wave = WaveSummary::new(
            "example.com/w+1",
            vec![
                WaveletSummary::new("conv+root", alice(), 10, 100),
                WaveletSummary::new("conv+reply", alice(), 20, 150),
                WaveletSummary::new("user+alice@example.com", alice(), 30, 900),
            ],
        );

        assert_eq!(wave.conversational_max(|w| w.last_modified_time()), 150);
        assert_eq!(wave.conversational_max(|w| w.creation_time()), 20);
    }

    #[test]
    fn test_conversational_max_defaults_to_minus_one() {
        let wave = WaveSummary::new(
            "example.com/w+2",
            vec![WaveletSummary::new("user+alice@example.com", alice(), 30, 900)],
        );
        assert_eq!(wave.conversational_max(|w| w.last_modified_time()), -1);
        let empty = WaveSummary::new("example.com/w+3", vec![]);
        assert_eq!(empty.conversational_max(|w| w.creation_time()), -1);
    }

    #[test]
    fn test_root_creator() {
        let bob = ParticipantId::of("bob@example.com").unwrap();
        let wave = WaveSummary::new(
            "example.com/w+1",
            vec![
                WaveletSummary::new("conv+reply", alice(), 10, 100),
                WaveletSummary::new("conv+root", bob.clone(), 5, 50),
            ],
        );
        assert_eq!(wave.root_creator(), Some(&bob));

        let rootless = WaveSummary::new(
            "example.com/w+2",
            vec![WaveletSummary::new("conv+reply", alice(), 1, 1)],
        );
        assert_eq!(rootless.root_creator(), None);
    }

    #[test]
    fn test_wave_summary_from_json() {
        let wave: WaveSummary = serde_json::from_value(serde_json::json!({
            "id": "example.com/w+abc",
            "wavelets": [{
                "id": "conv+root",
                "creator": "Alice@example.com",
                "creation_time": 1,
                "last_modified_time": 2,
                "participants": ["bob@example.com"]
            }]
        }))
        .unwrap();

        assert_eq!(wave.id.value(), "example.com/w+abc");
        assert_eq!(wave.wavelets[0].creator, alice());
        assert_eq!(wave.wavelets[0].participants.len(), 1);
    }
}
