//! Core domain modules
pub mod record;
pub mod types;

// Re-export common types
pub use record::{SubDocument, SummaryRecord, WaveSummary, WaveletSummary};
pub use types::{AddressError, ParticipantId, WaveId, WaveletId};
