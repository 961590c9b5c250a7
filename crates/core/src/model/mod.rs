mod ids;
mod player;
mod question;
mod report;
mod settings;
mod stars;
mod subject;

pub use ids::{ParseIdError, QuestionId};
pub use player::{ANONYMOUS_LABEL, Player};
pub use question::{AnswerPayload, Question, QuestionError, QuestionKind};
pub use report::{ReportError, SessionReport};
pub use settings::{SessionSettings, SettingsError};
pub use stars::{MAX_STARS, Stars, StarsError};
pub use subject::{Level, LevelError, Subject, SubjectError};
