//! Environment effects seam for browser-only media (audio cues, speech).
//!
//! Gameplay code talks to [`GameEffects`] so headless targets and tests run
//! with [`NoopEffects`]; a real frontend supplies its own implementation.

use quiz_core::{Question, Stars};

/// Side-effect hooks fired by the session runner.
///
/// Implementations must be cheap and non-blocking; the runner calls them
/// inline on its own tasks and never after teardown has begun.
pub trait GameEffects: Send + Sync {
    /// A new question is on screen.
    fn question_shown(&self, _question: &Question) {}

    /// Read a prompt aloud.
    fn speak_prompt(&self, _text: &str) {}

    /// The player's answer was graded.
    fn answer_feedback(&self, _stars: Stars) {}

    /// The level countdown ran out.
    fn session_timed_out(&self) {}

    /// Stop all in-flight media immediately.
    fn stop_all(&self) {}
}

/// Effects implementation that does nothing, for tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEffects;

impl GameEffects for NoopEffects {}
