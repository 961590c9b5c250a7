use std::time::Duration;
use thiserror::Error;

/// Number of questions sampled per session by default.
const DEFAULT_QUESTIONS_PER_SESSION: u32 = 10;
/// How long a question's result stays on screen before auto-advancing.
const DEFAULT_RESULT_DISPLAY: Duration = Duration::from_secs(2);
/// How long the "time's up" screen is shown before the session completes.
const DEFAULT_TIMEOUT_DISPLAY: Duration = Duration::from_millis(3500);
/// Leaderboard points awarded per star earned.
const DEFAULT_POINTS_PER_STAR: u32 = 10;

/// Product constants governing a session: subset size, display delays, and
/// points conversion. These are configuration, not derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    questions_per_session: u32,
    result_display: Duration,
    timeout_display: Duration,
    points_per_star: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per session must be positive")]
    ZeroQuestions,
    #[error("points per star must be positive")]
    ZeroPoints,
}

impl SessionSettings {
    /// Create validated settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the question count or points-per-star is zero.
    pub fn new(
        questions_per_session: u32,
        result_display: Duration,
        timeout_display: Duration,
        points_per_star: u32,
    ) -> Result<Self, SettingsError> {
        if questions_per_session == 0 {
            return Err(SettingsError::ZeroQuestions);
        }
        if points_per_star == 0 {
            return Err(SettingsError::ZeroPoints);
        }
        Ok(Self {
            questions_per_session,
            result_display,
            timeout_display,
            points_per_star,
        })
    }

    #[must_use]
    pub fn questions_per_session(&self) -> u32 {
        self.questions_per_session
    }

    #[must_use]
    pub fn result_display(&self) -> Duration {
        self.result_display
    }

    #[must_use]
    pub fn timeout_display(&self) -> Duration {
        self.timeout_display
    }

    #[must_use]
    pub fn points_per_star(&self) -> u32 {
        self.points_per_star
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
            result_display: DEFAULT_RESULT_DISPLAY,
            timeout_display: DEFAULT_TIMEOUT_DISPLAY,
            points_per_star: DEFAULT_POINTS_PER_STAR,
        }
    }
}
