//! Reference evaluation of the filter part of a parsed query.
//!
//! The search index normally evaluates filters itself; [`SearchFilter`] gives it
//! (and the CLI) the resolved bounds and participant lists, plus an in-memory
//! predicate over [`SummaryRecord`]s. `in:`, `id:` and `tag:` depend on index
//! state and are not evaluated here.

use crate::core::record::{SubDocument, SummaryRecord};
use crate::core::types::ParticipantId;
use crate::query::compiler::ParsedQuery;
use crate::query::dates::{
    EvalZone, get_date_as_epoch, get_use_date_field, round_up_to_end_of_day,
};
use crate::query::error::SearchResult;
use crate::query::participants::build_validated_participant_ids;
use crate::query::types::{DateFieldSelector, QueryParameterKind};
use serde::Serialize;
use tracing::debug;

/// Inclusive epoch-millisecond range; 0 on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub field: DateFieldSelector,
    pub from: i64,
    pub to: i64,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.from == 0 && self.to == 0
    }

    pub fn contains(&self, time: i64) -> bool {
        (self.from == 0 || time >= self.from) && (self.to == 0 || time <= self.to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilter {
    pub date_range: DateRange,
    pub creators: Vec<ParticipantId>,
    pub with: Vec<ParticipantId>,
}

impl SearchFilter {
    /// Resolve the query's filters. `to:` is widened to the end of its day, so
    /// an explicit `to:` never resolves to the 0 "unbounded" sentinel, even for
    /// the epoch day itself.
    pub fn from_parsed(
        parsed: &ParsedQuery,
        local_domain: &str,
        zone: EvalZone,
    ) -> SearchResult<Self> {
        let to = if parsed.contains(QueryParameterKind::To) {
            round_up_to_end_of_day(get_date_as_epoch(parsed, QueryParameterKind::To), zone)
        } else {
            0
        };
        let date_range = DateRange {
            field: get_use_date_field(parsed).unwrap_or_default(),
            from: get_date_as_epoch(parsed, QueryParameterKind::From),
            to,
        };

        let filter = Self {
            date_range,
            creators: build_validated_participant_ids(
                parsed,
                QueryParameterKind::Creator,
                local_domain,
            )?,
            with: build_validated_participant_ids(parsed, QueryParameterKind::With, local_domain)?,
        };
        debug!(
            from = filter.date_range.from,
            to = filter.date_range.to,
            field = %filter.date_range.field,
            creators = filter.creators.len(),
            with = filter.with.len(),
            "Resolved search filter"
        );
        Ok(filter)
    }

    pub fn matches<R: SummaryRecord>(&self, record: &R) -> bool {
        self.matches_dates(record) && self.matches_creator(record) && self.matches_with(record)
    }

    fn matches_dates<R: SummaryRecord>(&self, record: &R) -> bool {
        if self.date_range.is_unbounded() {
            return true;
        }
        let time = match self.date_range.field {
            DateFieldSelector::CreateDate => record.conversational_max(|doc| doc.creation_time()),
            DateFieldSelector::LastModDate => {
                record.conversational_max(|doc| doc.last_modified_time())
            },
        };
        // No conversational wavelets, nothing to date
        time >= 0 && self.date_range.contains(time)
    }

    fn matches_creator<R: SummaryRecord>(&self, record: &R) -> bool {
        self.creators.is_empty()
            || record.root_creator().is_some_and(|creator| self.creators.contains(creator))
    }

    /// Every `with` participant must take part in some conversational wavelet.
    fn matches_with<R: SummaryRecord>(&self, record: &R) -> bool {
        self.with.iter().all(|wanted| {
            record.sub_documents().iter().filter(|doc| doc.is_conversational()).any(|doc| {
                doc.creator() == wanted || doc.participants().contains(wanted)
            })
        })
    }
}
