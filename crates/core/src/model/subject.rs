use thiserror::Error;

const MAX_SUBJECT_LEN: usize = 64;

/// Validated subject name (trimmed, non-empty, bounded length).
///
/// Subjects identify a question bank, e.g. "history" or "geography".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    /// Create a validated subject name.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if the name is empty after trimming,
    /// or `SubjectError::TooLong` if it exceeds the maximum length.
    pub fn new(value: impl Into<String>) -> Result<Self, SubjectError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SubjectError::EmptyName);
        }
        if trimmed.len() > MAX_SUBJECT_LEN {
            return Err(SubjectError::TooLong {
                len: trimmed.len(),
                max: MAX_SUBJECT_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject name cannot be empty")]
    EmptyName,
    #[error("subject name too long: {len} (max {max})")]
    TooLong { len: usize, max: usize },
}

/// One-based difficulty level within a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u32);

impl Level {
    /// Create a validated level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Zero` if the level is zero; levels start at 1.
    pub fn new(value: u32) -> Result<Self, LevelError> {
        if value == 0 {
            return Err(LevelError::Zero);
        }
        Ok(Self(value))
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("levels start at 1")]
    Zero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_trims_and_accepts() {
        let subject = Subject::new("  geography ").unwrap();
        assert_eq!(subject.as_str(), "geography");
    }

    #[test]
    fn subject_rejects_empty() {
        assert_eq!(Subject::new("   ").unwrap_err(), SubjectError::EmptyName);
    }

    #[test]
    fn subject_rejects_too_long() {
        let err = Subject::new("x".repeat(MAX_SUBJECT_LEN + 1)).unwrap_err();
        assert!(matches!(err, SubjectError::TooLong { .. }));
    }

    #[test]
    fn level_rejects_zero() {
        assert_eq!(Level::new(0).unwrap_err(), LevelError::Zero);
        assert_eq!(Level::new(3).unwrap().value(), 3);
    }
}
