//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::session::SessionError as GameSessionError;
use quiz_core::{Level, Subject};

use crate::api::ApiError;

/// Errors emitted by `QuestionSupplier`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SupplierError {
    #[error("no questions available for {subject} level {level}")]
    NoQuestions { subject: Subject, level: Level },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is shutting down")]
    ShutDown,
    #[error(transparent)]
    Supplier(#[from] SupplierError),
    #[error(transparent)]
    Game(#[from] GameSessionError),
}
