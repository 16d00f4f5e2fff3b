//! Core domain types for the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the local part and the domain of a participant address
pub const DOMAIN_PREFIX: &str = "@";

/// Prefix shared by every conversational wavelet id
pub const CONVERSATION_WAVELET_PREFIX: &str = "conv";

/// Id of the wavelet holding the conversation root
pub const CONVERSATION_ROOT_WAVELET: &str = "conv+root";

/// Wave identifier
///
/// A newtype wrapper around String. Ordering is plain lexicographic and is used
/// as the final tie-breaker when ordering search results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveId(String);

impl WaveId {
    /// Create a new WaveId
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner value
    #[inline]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WaveId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WaveId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Wavelet identifier within a wave
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveletId(String);

impl WaveletId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The conversation root wavelet id
    pub fn conversation_root() -> Self {
        Self(CONVERSATION_ROOT_WAVELET.to_string())
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Conversational wavelets carry the visible discussion: `conv+root`,
    /// `conv+<anything>`. Everything else (user data, metadata) is not.
    pub fn is_conversational(&self) -> bool {
        match self.0.split_once('+') {
            Some((prefix, rest)) => prefix == CONVERSATION_WAVELET_PREFIX && !rest.is_empty(),
            None => false,
        }
    }

    pub fn is_conversation_root(&self) -> bool {
        self.0 == CONVERSATION_ROOT_WAVELET
    }
}

impl fmt::Display for WaveletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WaveletId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reasons a participant address is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("missing domain prefix '{DOMAIN_PREFIX}'")]
    MissingDomainPrefix,

    #[error("only one '{DOMAIN_PREFIX}' is allowed")]
    MultipleDomainPrefixes,

    #[error("empty domain")]
    EmptyDomain,

    #[error("invalid domain '{0}'")]
    InvalidDomain(String),

    #[error("invalid character {0:?} in address")]
    InvalidCharacter(char),
}

/// Participant identity: a normalized (lower-cased) `name@domain` address.
///
/// The local part may be empty, in which case the id denotes the shared
/// participant of the domain (`@example.com`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Validate and normalize an address.
    pub fn of(address: &str) -> Result<Self, AddressError> {
        let normalized = address.to_lowercase();

        if let Some(c) = normalized.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(AddressError::InvalidCharacter(c));
        }

        let (_, domain) =
            normalized.split_once(DOMAIN_PREFIX).ok_or(AddressError::MissingDomainPrefix)?;
        if domain.contains(DOMAIN_PREFIX) {
            return Err(AddressError::MultipleDomainPrefixes);
        }
        if domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }
        if !is_valid_domain(domain) {
            return Err(AddressError::InvalidDomain(domain.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Build an id without validation. Only for well-known constant addresses.
    pub(crate) fn of_unsafe(address: &str) -> Self {
        Self(address.to_string())
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.0
    }

}

/// Dot-separated labels of ASCII alphanumerics and inner hyphens.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let address = String::deserialize(deserializer)?;
        Self::of(&address).map_err(serde::de::Error::custom)
    }
}
