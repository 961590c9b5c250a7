use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest star award a single question can earn.
pub const MAX_STARS: u8 = 3;

/// Per-question score unit (0-3), awarded by type-specific grading logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    /// Converts a numeric value (0-3) to `Stars`.
    ///
    /// # Errors
    ///
    /// Returns `StarsError::OutOfRange` if the value exceeds `MAX_STARS`.
    pub fn new(value: u8) -> Result<Self, StarsError> {
        if value > MAX_STARS {
            return Err(StarsError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Zero stars, the outcome for an unanswered or fully missed question.
    #[must_use]
    pub fn none() -> Self {
        Self(0)
    }

    /// Returns the underlying value
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = StarsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Stars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StarsError {
    #[error("invalid star count: {0} (max {MAX_STARS})")]
    OutOfRange(u8),
}
