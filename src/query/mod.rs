//! Search query compiler and result ordering.
//!
//! ```text
//! raw query ──QueryCompiler::parse──▶ ParsedQuery ─┬─ build_comparator ──▶ WaveOrdering
//!                                                  └─ SearchFilter / participant lookups
//! ```
//!
//! Everything here is stateless per call; the token lookup tables are built once
//! and only read afterwards, so compilers and orderings can be shared freely
//! across threads.

pub mod builder;
pub mod compiler;
pub mod dates;
pub mod error;
pub mod filter;
pub mod ordering;
pub mod participants;
pub mod types;

pub use builder::{QueryBuilder, SearchScope};
pub use compiler::{ParsedQuery, QueryCompiler, parse_query};
pub use dates::{
    EvalZone, get_date_as_epoch, get_use_date_field, parse_filter_date, round_up_to_end_of_day,
};
pub use error::{SearchError, SearchResult};
pub use filter::{DateRange, SearchFilter};
pub use ordering::{UNKNOWN_CREATOR, WaveOrdering, build_comparator};
pub use participants::build_validated_participant_ids;
pub use types::{DateFieldSelector, OrderSpec, QueryParameterKind, SortDimension, SortDirection};
