//! Wave search - query compiler and result ordering
//!
//! Compiles free-text search queries (`in:inbox with:bob orderby:dateasc`) into
//! validated, typed parameters and turns their `orderby` keys into a
//! deterministic total order over wave summaries.

pub mod config;
pub mod core;
pub mod error;
pub mod query;

pub use crate::core::{
    ParticipantId, SubDocument, SummaryRecord, WaveId, WaveSummary, WaveletSummary,
};
pub use crate::query::{
    ParsedQuery, QueryCompiler, SearchError, SearchResult, WaveOrdering, build_comparator,
    build_validated_participant_ids, parse_query,
};
