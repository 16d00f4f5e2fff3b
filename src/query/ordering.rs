//! Result ordering.
//!
//! A [`WaveOrdering`] is the lexicographic composition of the `orderby` keys in
//! the order they were typed, always followed by the wave id so that the result
//! is a total order. The engine only builds the rule; callers do the sorting.

use crate::core::record::{SubDocument, SummaryRecord};
use crate::core::types::ParticipantId;
use crate::query::compiler::ParsedQuery;
use crate::query::types::{OrderSpec, SortDimension};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use tracing::trace;

/// Creator used for waves without a conversation root
pub static UNKNOWN_CREATOR: Lazy<ParticipantId> =
    Lazy::new(|| ParticipantId::of_unsafe("unknown@example.com"));

fn creator_of<R: SummaryRecord>(record: &R) -> &ParticipantId {
    record.root_creator().unwrap_or(&UNKNOWN_CREATOR)
}

impl OrderSpec {
    /// Compare two records on this key alone. Descending is the reverse of the
    /// ascending comparison.
    pub fn compare<R: SummaryRecord>(&self, a: &R, b: &R) -> Ordering {
        let ascending = match self.dimension {
            SortDimension::LastModified => a
                .conversational_max(|doc| doc.last_modified_time())
                .cmp(&b.conversational_max(|doc| doc.last_modified_time())),
            SortDimension::Created => a
                .conversational_max(|doc| doc.creation_time())
                .cmp(&b.conversational_max(|doc| doc.creation_time())),
            SortDimension::Creator => creator_of(a).cmp(creator_of(b)),
        };
        self.direction.apply(ascending)
    }
}

/// Compound ordering over summary records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveOrdering {
    keys: Vec<OrderSpec>,
}

impl Default for WaveOrdering {
    fn default() -> Self {
        Self { keys: vec![OrderSpec::DEFAULT] }
    }
}

impl WaveOrdering {
    /// Ordering on `keys`, primary first. No keys means the default ordering.
    pub fn new(keys: Vec<OrderSpec>) -> Self {
        if keys.is_empty() { Self::default() } else { Self { keys } }
    }

    pub fn keys(&self) -> &[OrderSpec] {
        &self.keys
    }

    /// Each key only breaks ties left by the ones before it; the wave id breaks
    /// whatever remains.
    pub fn compare<R: SummaryRecord>(&self, a: &R, b: &R) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id().cmp(b.id()))
    }

    /// The ordering as a closure, usable with `sort_by` or `par_sort_by`
    pub fn comparator<R: SummaryRecord>(
        &self,
    ) -> impl Fn(&R, &R) -> Ordering + Send + Sync + '_ {
        move |a: &R, b: &R| self.compare(a, b)
    }
}

/// Build the ordering requested by the query's `orderby` values, or the default
/// (last modified, newest first) when there are none.
pub fn build_comparator(parsed: &ParsedQuery) -> WaveOrdering {
    let ordering = WaveOrdering::new(parsed.order_specs().collect());
    trace!(
        keys = ?ordering.keys().iter().map(OrderSpec::token).collect::<Vec<_>>(),
        "Built result ordering"
    );
    ordering
}
