//! Query-layer error types.

use crate::core::types::AddressError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Malformed token, unknown key, unknown `orderby`/`usedate` value or
    /// unparsable date. `token` is the offending raw substring.
    #[error("{message}")]
    InvalidQuery { message: String, token: String },

    /// A participant value that is not a valid address once the local domain
    /// has been applied. `raw` is the value as typed in the query.
    #[error("Invalid participant address '{raw}': {reason}")]
    InvalidAddress { raw: String, reason: AddressError },
}

impl SearchError {
    pub fn invalid_param(token: &str) -> Self {
        Self::InvalidQuery {
            message: format!("Invalid query param: {}", token),
            token: token.to_string(),
        }
    }

    pub fn invalid_order_by(value: &str) -> Self {
        Self::InvalidQuery {
            message: format!("Invalid orderby query value: {}", value),
            token: value.to_string(),
        }
    }

    pub fn invalid_use_date(value: &str) -> Self {
        Self::InvalidQuery {
            message: format!("Invalid usedate query value: {}", value),
            token: value.to_string(),
        }
    }

    pub fn conflicting_use_date(value: &str) -> Self {
        Self::InvalidQuery {
            message: format!("Conflicting usedate query value: {}", value),
            token: value.to_string(),
        }
    }

    pub fn invalid_date(value: &str) -> Self {
        Self::InvalidQuery {
            message: format!("Invalid date query value: {}", value),
            token: value.to_string(),
        }
    }

    pub fn invalid_address(raw: &str, reason: AddressError) -> Self {
        Self::InvalidAddress { raw: raw.to_string(), reason }
    }

    /// The raw query substring that caused the error
    pub fn offending(&self) -> &str {
        match self {
            SearchError::InvalidQuery { token, .. } => token,
            SearchError::InvalidAddress { raw, .. } => raw,
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
