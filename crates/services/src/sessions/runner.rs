use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use quiz_core::{
    Clock, GameSession, Level, OutcomeRecorded, Player, Question, SessionPhase, SessionReport,
    SessionSettings, Stars, Subject, TickOutcome,
};

use super::guard::LifecycleGuard;
use super::plan::SessionPlanner;
use super::progress::SessionProgress;
use crate::effects::{GameEffects, NoopEffects};
use crate::error::SessionError;
use crate::reporter::ResultReporter;
use crate::supplier::QuestionSupplier;

//
// ─── GAME SERVICE ─────────────────────────────────────────────────────────────
//

/// Orchestrates session start: fetch, sample, and hand out a running handle.
#[derive(Clone)]
pub struct GameService {
    clock: Clock,
    supplier: Arc<QuestionSupplier>,
    reporter: ResultReporter,
    effects: Arc<dyn GameEffects>,
    settings: SessionSettings,
}

impl GameService {
    #[must_use]
    pub fn new(clock: Clock, supplier: Arc<QuestionSupplier>, reporter: ResultReporter) -> Self {
        Self {
            clock,
            supplier,
            reporter,
            effects: Arc::new(NoopEffects),
            settings: SessionSettings::default(),
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Arc<dyn GameEffects>) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fetch the bank for a subject and level, sample a session subset, and
    /// start the lifecycle controller.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the bank is missing or empty, or the
    /// session cannot be built.
    pub async fn start_session(
        &self,
        subject: Subject,
        level: Level,
        player: Player,
    ) -> Result<SessionHandle, SessionError> {
        let bank = self.supplier.questions(&subject, level).await?;
        let plan = SessionPlanner::new(self.settings.questions_per_session()).sample(bank);
        let session = GameSession::new(subject, level, plan.questions, self.settings.clone())?;

        Ok(SessionHandle::spawn(
            session,
            self.clock,
            player,
            self.settings.clone(),
            self.effects.clone(),
            self.reporter.clone(),
        ))
    }
}

//
// ─── SESSION HANDLE ───────────────────────────────────────────────────────────
//

/// Handle to one running session: answers, progress reads, and teardown.
///
/// Cloning is cheap; all clones drive the same session. Dropping the last
/// clone tears the session down.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RunnerInner>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

struct RunnerInner {
    session: Mutex<GameSession>,
    guard: LifecycleGuard,
    clock: Clock,
    player: Player,
    settings: SessionSettings,
    effects: Arc<dyn GameEffects>,
    reporter: ResultReporter,
    report_sent: AtomicBool,
}

impl SessionHandle {
    fn spawn(
        session: GameSession,
        clock: Clock,
        player: Player,
        settings: SessionSettings,
        effects: Arc<dyn GameEffects>,
        reporter: ResultReporter,
    ) -> Self {
        let first_question = session.current_question().cloned();

        let inner = Arc::new(RunnerInner {
            session: Mutex::new(session),
            guard: LifecycleGuard::new(),
            clock,
            player,
            settings,
            effects,
            reporter,
            report_sent: AtomicBool::new(false),
        });

        inner.spawn_tick_task();
        if let Some(question) = first_question {
            inner.effects.question_shown(&question);
            inner.effects.speak_prompt(question.prompt());
        }

        Self { inner }
    }

    /// Record the stars earned for the current question.
    ///
    /// Duplicate or reentrant calls are ignored per the session's guards;
    /// the returned value says what, if anything, happened.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ShutDown` once teardown has begun.
    pub fn answer(&self, stars: Stars) -> Result<OutcomeRecorded, SessionError> {
        if self.inner.guard.is_tearing_down() {
            return Err(SessionError::ShutDown);
        }

        let recorded = {
            let Ok(mut session) = self.inner.session.lock() else {
                return Err(SessionError::ShutDown);
            };
            let index = session.current_index();
            session.record_outcome(index, stars)
        };

        match recorded {
            OutcomeRecorded::AdvanceScheduled { .. } => {
                self.inner.effects.answer_feedback(stars);
                self.inner.schedule_advance();
            }
            OutcomeRecorded::Completed => {
                self.inner.effects.answer_feedback(stars);
                self.inner.spawn_report();
            }
            OutcomeRecorded::Ignored(_) => {}
        }

        Ok(recorded)
    }

    /// Snapshot the session's progress. Remains readable after teardown.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        match self.inner.session.lock() {
            Ok(session) => SessionProgress {
                total: session.total_questions(),
                answered: session.answered_count(),
                current_index: session.current_index(),
                stars: session.stars_total(),
                remaining_secs: session.remaining_secs(),
                total_secs: session.total_secs(),
                paused: session.paused(),
                is_terminal: session.is_terminal(),
            },
            Err(poisoned) => {
                let session = poisoned.into_inner();
                SessionProgress {
                    total: session.total_questions(),
                    answered: session.answered_count(),
                    current_index: session.current_index(),
                    stars: session.stars_total(),
                    remaining_secs: session.remaining_secs(),
                    total_secs: session.total_secs(),
                    paused: session.paused(),
                    is_terminal: session.is_terminal(),
                }
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.inner.session.lock() {
            Ok(session) => session.phase(),
            Err(poisoned) => poisoned.into_inner().phase(),
        }
    }

    /// The question currently awaiting an answer, if the session is live.
    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.inner
            .session
            .lock()
            .ok()
            .and_then(|session| session.current_question().cloned())
    }

    /// Final report, once the session is terminal.
    #[must_use]
    pub fn report(&self) -> Option<SessionReport> {
        let now = self.inner.clock.now();
        self.inner
            .session
            .lock()
            .ok()
            .and_then(|session| session.report(now))
    }

    /// Begin teardown: no timer tick, delayed transition, or media effect
    /// runs after this returns. Idempotent.
    pub fn shutdown(&self) {
        if self.inner.guard.begin_teardown() {
            self.inner.effects.stop_all();
        }
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.guard.is_tearing_down()
    }
}

impl RunnerInner {
    /// Drive the level countdown at 1 Hz until expiry or teardown.
    fn spawn_tick_task(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the countdown starts
            // one full second after session start.
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                if inner.guard.is_tearing_down() {
                    break;
                }

                let outcome = {
                    let Ok(mut session) = inner.session.lock() else {
                        break;
                    };
                    session.tick()
                };

                if outcome == TickOutcome::Expired {
                    inner.handle_expiry();
                    break;
                }
            }
        });
        self.guard.register(task);
    }

    /// The countdown ran out: show the timeout screen, then complete.
    fn handle_expiry(self: &Arc<Self>) {
        if self.guard.is_tearing_down() {
            return;
        }
        self.effects.session_timed_out();

        let weak = Arc::downgrade(self);
        let delay = self.settings.timeout_display();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            if inner.guard.is_tearing_down() {
                return;
            }

            let finished = {
                let Ok(mut session) = inner.session.lock() else {
                    return;
                };
                session.finish_timed_out()
            };
            if finished {
                inner.spawn_report();
            }
        });
        self.guard.register(task);
    }

    /// Step to the next question after the result display delay.
    fn schedule_advance(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let delay = self.settings.result_display();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            if inner.guard.is_tearing_down() {
                return;
            }

            let next = {
                let Ok(mut session) = inner.session.lock() else {
                    return;
                };
                if session.advance() {
                    session.current_question().cloned()
                } else {
                    None
                }
            };

            if let Some(question) = next
                && !inner.guard.is_tearing_down()
            {
                inner.effects.question_shown(&question);
                inner.effects.speak_prompt(question.prompt());
            }
        });
        self.guard.register(task);
    }

    /// Send the terminal report exactly once, fire-and-forget.
    fn spawn_report(self: &Arc<Self>) {
        if self.report_sent.swap(true, Ordering::SeqCst) {
            return;
        }

        let report = {
            let Ok(session) = self.session.lock() else {
                return;
            };
            session.report(self.clock.now())
        };
        let Some(report) = report else { return };

        let reporter = self.reporter.clone();
        let player = self.player.clone();
        let task = tokio::spawn(async move {
            reporter.submit(&player, &report).await;
        });
        self.guard.register(task);
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
