#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use time::Clock;

pub use model::{
    AnswerPayload, Level, Player, Question, QuestionError, QuestionId, QuestionKind, ReportError,
    SessionReport, SessionSettings, SettingsError, Stars, StarsError, Subject, SubjectError,
};
pub use session::{GameSession, IgnoreReason, OutcomeRecorded, SessionError, SessionPhase, TickOutcome};
