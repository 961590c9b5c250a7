mod guard;
mod plan;
mod progress;
mod runner;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionPlan, SessionPlanner};
pub use progress::SessionProgress;
pub use runner::{GameService, SessionHandle};
