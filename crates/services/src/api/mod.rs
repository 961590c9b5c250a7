//! Contracts for the external HTTP collaborators: the question bank, the
//! leaderboard, and per-user progress.

mod http;
mod memory;

pub use http::{ApiConfig, HttpApi};
pub use memory::InMemoryApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::{Level, Player, Question, QuestionError, SessionReport, Subject};

/// Errors surfaced by API adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("api unavailable: {0}")]
    Unavailable(String),

    #[error("invalid question record: {0}")]
    InvalidQuestion(#[from] QuestionError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One row for the leaderboard, produced from a terminal session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player: String,
    pub subject: String,
    pub level: u32,
    pub points: u32,
    pub stars: u32,
    pub questions_completed: u32,
    pub total_questions: u32,
    pub timed_out: bool,
}

impl ScoreSubmission {
    #[must_use]
    pub fn from_report(player: &Player, report: &SessionReport) -> Self {
        Self {
            player: player.label().to_string(),
            subject: report.subject().as_str().to_string(),
            level: report.level().value(),
            points: report.points(),
            stars: report.stars(),
            questions_completed: report.answered(),
            total_questions: report.total(),
            timed_out: report.timed_out(),
        }
    }
}

/// Best-score-wins progress record; the upsert policy is server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub subject: String,
    pub level: u32,
    pub stars: u32,
    pub completed: bool,
}

impl ProgressUpdate {
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        Self {
            subject: report.subject().as_str().to_string(),
            level: report.level().value(),
            stars: report.stars(),
            completed: report.is_full_clear(),
        }
    }
}

/// Question-bank retrieval contract.
#[async_trait]
pub trait QuestionApi: Send + Sync {
    /// Fetch the ordered question bank for a subject and level.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the bank does not exist, or other
    /// API errors.
    async fn fetch_questions(
        &self,
        subject: &Subject,
        level: Level,
    ) -> Result<Vec<Question>, ApiError>;
}

/// Leaderboard submission contract.
#[async_trait]
pub trait LeaderboardApi: Send + Sync {
    /// Submit one score row.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission cannot be delivered.
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<(), ApiError>;
}

/// Per-user progress contract.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Upsert the player's progress for a subject and level.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the update cannot be delivered.
    async fn submit_progress(&self, update: &ProgressUpdate) -> Result<(), ApiError>;
}
