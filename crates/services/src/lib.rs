#![forbid(unsafe_code)]

pub mod api;
pub mod effects;
pub mod error;
pub mod reporter;
pub mod sessions;
pub mod supplier;

pub use quiz_core::Clock;

pub use error::{SessionError, SupplierError};

pub use api::{
    ApiConfig, ApiError, HttpApi, InMemoryApi, LeaderboardApi, ProgressApi, ProgressUpdate,
    QuestionApi, ScoreSubmission,
};
pub use effects::{GameEffects, NoopEffects};
pub use reporter::ResultReporter;
pub use sessions::{GameService, SessionHandle, SessionPlan, SessionPlanner, SessionProgress};
pub use supplier::QuestionSupplier;
