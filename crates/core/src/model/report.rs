use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Level, Subject};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("answered count ({answered}) exceeds total questions ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },

    #[error("report covers no questions")]
    NoQuestions,

    #[error("points ({points}) do not match stars ({stars}) at {points_per_star} per star")]
    PointsMismatch {
        points: u32,
        stars: u32,
        points_per_star: u32,
    },
}

/// Final report for a terminal session, sent to the leaderboard and
/// progress collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    subject: Subject,
    level: Level,
    stars: u32,
    points: u32,
    answered: u32,
    total: u32,
    timed_out: bool,
    finished_at: DateTime<Utc>,
}

impl SessionReport {
    /// Assemble a report from session-computed values.
    ///
    /// The session guarantees consistency; use [`SessionReport::from_persisted`]
    /// when rehydrating untrusted data.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject: Subject,
        level: Level,
        stars: u32,
        points: u32,
        answered: u32,
        total: u32,
        timed_out: bool,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            level,
            stars,
            points,
            answered,
            total,
            timed_out,
            finished_at,
        }
    }

    /// Rehydrate a report, validating internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the counts or points do not align.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        subject: Subject,
        level: Level,
        stars: u32,
        points: u32,
        points_per_star: u32,
        answered: u32,
        total: u32,
        timed_out: bool,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if total == 0 {
            return Err(ReportError::NoQuestions);
        }
        if answered > total {
            return Err(ReportError::AnsweredExceedsTotal { answered, total });
        }
        if points != stars.saturating_mul(points_per_star) {
            return Err(ReportError::PointsMismatch {
                points,
                stars,
                points_per_star,
            });
        }

        Ok(Self::new(
            subject,
            level,
            stars,
            points,
            answered,
            total,
            timed_out,
            finished_at,
        ))
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn stars(&self) -> u32 {
        self.stars
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Whether every sampled question received an outcome.
    #[must_use]
    pub fn is_full_clear(&self) -> bool {
        self.answered == self.total && !self.timed_out
    }
}
