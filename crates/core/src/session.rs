use std::fmt;
use thiserror::Error;

use chrono::{DateTime, Utc};

use crate::model::{Level, Question, SessionReport, SessionSettings, Stars, Subject};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
}

//
// ─── EVENTS ───────────────────────────────────────────────────────────────────
//

/// Phase of an in-progress or finished session.
///
/// `ShowingResult` doubles as the reentrancy guard: while a question's result
/// is on screen, further outcome recording is ignored until `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer,
    ShowingResult,
    TimedOut,
    Completed,
}

impl SessionPhase {
    /// Terminal phases admit no further state mutation.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::TimedOut | SessionPhase::Completed)
    }
}

/// Why an outcome-recording call was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The session is already timed out or completed.
    Terminal,
    /// A question advance is already in flight.
    AdvanceInFlight,
    /// The index is outside the sampled question subset.
    OutOfRange,
    /// This index already has a recorded outcome.
    AlreadyAnswered,
    /// The index is not the question currently awaiting an answer.
    NotCurrent,
}

/// Result of an outcome-recording call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeRecorded {
    /// The call was a no-op; the state is unchanged.
    Ignored(IgnoreReason),
    /// Outcome stored; the caller should advance after the result display delay.
    AdvanceScheduled { next_index: usize },
    /// Outcome stored for the last question; the session is complete.
    Completed,
}

/// Result of one 1 Hz countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or terminal; the countdown did not move.
    Idle,
    /// The countdown decremented.
    Ticking { remaining_secs: u32 },
    /// The countdown reached zero; the session is now timed out.
    Expired,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one playthrough of a sampled question subset.
///
/// The machine is deterministic and free of timers and I/O: callers feed it
/// `tick` at 1 Hz, `record_outcome` when grading finishes, and `advance` /
/// `finish_timed_out` when their display delays elapse.
pub struct GameSession {
    subject: Subject,
    level: Level,
    questions: Vec<Question>,
    current: usize,
    outcomes: Vec<Option<Stars>>,
    stars_total: u32,
    remaining_secs: u32,
    total_secs: u32,
    paused: bool,
    phase: SessionPhase,
    timed_out: bool,
    settings: SessionSettings,
}

impl GameSession {
    /// Create a session over an already-sampled, ordered question subset.
    ///
    /// Truncates to `questions_per_session` as a final cap; the level
    /// countdown is the sum of the selected questions' time budgets.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        subject: Subject,
        level: Level,
        mut questions: Vec<Question>,
        settings: SessionSettings,
    ) -> Result<Self, SessionError> {
        let limit = usize::try_from(settings.questions_per_session()).unwrap_or(usize::MAX);
        questions.truncate(limit);

        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let total_secs = questions
            .iter()
            .fold(0_u32, |acc, q| acc.saturating_add(q.time_budget_secs()));
        let outcomes = vec![None; questions.len()];

        Ok(Self {
            subject,
            level,
            questions,
            current: 0,
            outcomes,
            stars_total: 0,
            remaining_secs: total_secs,
            total_secs,
            paused: false,
            phase: SessionPhase::AwaitingAnswer,
            timed_out: false,
            settings,
        })
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
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// True once the countdown expired, regardless of the current phase.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    #[must_use]
    pub fn stars_total(&self) -> u32 {
        self.stars_total
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions that have a recorded outcome.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.outcomes.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_terminal() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Recorded outcome for a question index, if any.
    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<Stars> {
        self.outcomes.get(index).copied().flatten()
    }

    /// Record the stars earned for a question.
    ///
    /// No-op when the session is terminal, an advance is in flight, the index
    /// is out of range or already answered, or the index is not the current
    /// question. Otherwise pauses the countdown and stores the outcome; the
    /// last question completes the session immediately.
    pub fn record_outcome(&mut self, index: usize, stars: Stars) -> OutcomeRecorded {
        if self.is_terminal() {
            return OutcomeRecorded::Ignored(IgnoreReason::Terminal);
        }
        if self.phase == SessionPhase::ShowingResult {
            return OutcomeRecorded::Ignored(IgnoreReason::AdvanceInFlight);
        }
        if index >= self.outcomes.len() {
            return OutcomeRecorded::Ignored(IgnoreReason::OutOfRange);
        }
        if self.outcomes[index].is_some() {
            return OutcomeRecorded::Ignored(IgnoreReason::AlreadyAnswered);
        }
        if index != self.current {
            return OutcomeRecorded::Ignored(IgnoreReason::NotCurrent);
        }

        self.paused = true;
        self.outcomes[index] = Some(stars);
        self.stars_total = self.stars_total.saturating_add(u32::from(stars.value()));

        if index + 1 >= self.questions.len() {
            self.phase = SessionPhase::Completed;
            OutcomeRecorded::Completed
        } else {
            self.phase = SessionPhase::ShowingResult;
            OutcomeRecorded::AdvanceScheduled {
                next_index: index + 1,
            }
        }
    }

    /// Step to the next question after the result display delay.
    ///
    /// Resumes the countdown. Returns false (and does nothing) unless a
    /// result is currently showing.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::ShowingResult {
            return false;
        }
        self.current += 1;
        self.paused = false;
        self.phase = SessionPhase::AwaitingAnswer;
        true
    }

    /// Apply one second of countdown.
    ///
    /// Idle while paused or terminal; expiry transitions to `TimedOut` and
    /// pins the countdown at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_terminal() || self.paused {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = SessionPhase::TimedOut;
            self.timed_out = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticking {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Move a timed-out session to `Completed` after the timeout display
    /// delay, so completion handling is uniform regardless of cause.
    ///
    /// Returns false (and does nothing) unless the session is in `TimedOut`.
    pub fn finish_timed_out(&mut self) -> bool {
        if self.phase != SessionPhase::TimedOut {
            return false;
        }
        self.phase = SessionPhase::Completed;
        true
    }

    /// Final report, available once the session is terminal.
    #[must_use]
    pub fn report(&self, finished_at: DateTime<Utc>) -> Option<SessionReport> {
        if !self.is_terminal() {
            return None;
        }

        let answered = u32::try_from(self.answered_count()).unwrap_or(u32::MAX);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let points = self
            .stars_total
            .saturating_mul(self.settings.points_per_star());

        Some(SessionReport::new(
            self.subject.clone(),
            self.level,
            self.stars_total,
            points,
            answered,
            total,
            self.timed_out,
            finished_at,
        ))
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("subject", &self.subject)
            .field("level", &self.level)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("stars_total", &self.stars_total)
            .field("remaining_secs", &self.remaining_secs)
            .field("paused", &self.paused)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerPayload, Question, QuestionId};
    use crate::time::fixed_now;
    use std::time::Duration;

    fn build_question(id: u64, budget_secs: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            AnswerPayload::TrueFalse { answer: true },
            budget_secs,
        )
        .unwrap()
    }

    fn build_settings(per_session: u32) -> SessionSettings {
        SessionSettings::new(
            per_session,
            Duration::from_secs(2),
            Duration::from_millis(3500),
            10,
        )
        .unwrap()
    }

    fn build_session(budgets: &[u32]) -> GameSession {
        let questions = budgets
            .iter()
            .enumerate()
            .map(|(i, b)| build_question(i as u64 + 1, *b))
            .collect();
        GameSession::new(
            Subject::new("history").unwrap(),
            Level::new(1).unwrap(),
            questions,
            build_settings(10),
        )
        .unwrap()
    }

    fn stars(value: u8) -> Stars {
        Stars::new(value).unwrap()
    }

    #[test]
    fn countdown_totals_question_budgets() {
        let session = build_session(&[30, 45, 20]);
        assert_eq!(session.total_secs(), 95);
        assert_eq!(session.remaining_secs(), 95);
    }

    #[test]
    fn empty_session_returns_error() {
        let err = GameSession::new(
            Subject::new("history").unwrap(),
            Level::new(1).unwrap(),
            Vec::new(),
            build_settings(10),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn truncates_to_configured_subset_size() {
        let questions = (1..=5).map(|id| build_question(id, 30)).collect();
        let session = GameSession::new(
            Subject::new("geography").unwrap(),
            Level::new(2).unwrap(),
            questions,
            build_settings(3),
        )
        .unwrap();
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.total_secs(), 90);
    }

    #[test]
    fn tick_decrements_only_when_unpaused() {
        let mut session = build_session(&[30, 30]);

        assert_eq!(
            session.tick(),
            TickOutcome::Ticking { remaining_secs: 59 }
        );

        session.record_outcome(0, stars(2));
        assert!(session.paused());
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.remaining_secs(), 59);

        assert!(session.advance());
        assert!(!session.paused());
        assert_eq!(
            session.tick(),
            TickOutcome::Ticking { remaining_secs: 58 }
        );
    }

    #[test]
    fn records_outcome_once_per_index() {
        let mut session = build_session(&[30, 30]);

        let first = session.record_outcome(0, stars(3));
        assert_eq!(first, OutcomeRecorded::AdvanceScheduled { next_index: 1 });
        assert_eq!(session.stars_total(), 3);

        assert!(session.advance());

        // Index 0 already answered; the state must not change.
        let dup = session.record_outcome(0, stars(1));
        assert_eq!(dup, OutcomeRecorded::Ignored(IgnoreReason::AlreadyAnswered));
        assert_eq!(session.stars_total(), 3);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn reentrancy_guard_ignores_rapid_answers() {
        let mut session = build_session(&[30, 30]);

        session.record_outcome(0, stars(2));
        let second = session.record_outcome(1, stars(3));
        assert_eq!(second, OutcomeRecorded::Ignored(IgnoreReason::AdvanceInFlight));
        assert_eq!(session.stars_total(), 2);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn ignores_out_of_range_and_non_current_indices() {
        let mut session = build_session(&[30, 30, 30]);

        assert_eq!(
            session.record_outcome(7, stars(1)),
            OutcomeRecorded::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(
            session.record_outcome(2, stars(1)),
            OutcomeRecorded::Ignored(IgnoreReason::NotCurrent)
        );
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn last_answer_completes_immediately() {
        let mut session = build_session(&[30, 30]);

        session.record_outcome(0, stars(3));
        session.advance();
        let last = session.record_outcome(1, stars(2));

        assert_eq!(last, OutcomeRecorded::Completed);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(session.is_terminal());

        let report = session.report(fixed_now()).unwrap();
        assert_eq!(report.stars(), 5);
        assert_eq!(report.points(), 50);
        assert_eq!(report.answered(), 2);
        assert_eq!(report.total(), 2);
        assert!(!report.timed_out());
    }

    #[test]
    fn countdown_expiry_times_out_then_completes() {
        let mut session = build_session(&[1, 1]);

        assert_eq!(session.tick(), TickOutcome::Ticking { remaining_secs: 1 });
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.phase(), SessionPhase::TimedOut);
        assert!(session.timed_out());
        assert_eq!(session.remaining_secs(), 0);

        assert!(session.finish_timed_out());
        assert_eq!(session.phase(), SessionPhase::Completed);

        let report = session.report(fixed_now()).unwrap();
        assert!(report.timed_out());
        assert_eq!(report.answered(), 0);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn terminal_session_ignores_all_mutation() {
        let mut session = build_session(&[1]);
        session.tick(); // expires: the only question has a 1s budget
        assert!(session.is_terminal());

        let remaining = session.remaining_secs();
        let answered = session.answered_count();

        assert_eq!(
            session.record_outcome(0, stars(3)),
            OutcomeRecorded::Ignored(IgnoreReason::Terminal)
        );
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert!(!session.advance());

        assert_eq!(session.remaining_secs(), remaining);
        assert_eq!(session.answered_count(), answered);
        assert_eq!(session.stars_total(), 0);
    }

    #[test]
    fn advance_requires_showing_result() {
        let mut session = build_session(&[30, 30]);
        assert!(!session.advance());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn finish_timed_out_requires_timed_out_phase() {
        let mut session = build_session(&[30]);
        assert!(!session.finish_timed_out());
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn no_report_before_terminal() {
        let mut session = build_session(&[30, 30]);
        assert!(session.report(fixed_now()).is_none());
        session.record_outcome(0, stars(1));
        assert!(session.report(fixed_now()).is_none());
    }
}
