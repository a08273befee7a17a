//! # AppError
//!
//! Centralized error handling for the forum crates.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

use crate::models::ThreadId;

/// The primary error type for all forum operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Thread, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty title, answer from another thread)
    #[error("validation error: {0}")]
    Validation(String),

    /// A gated mutation was attempted without a current user
    #[error("login required")]
    LoginRequired,

    /// The current user lacks the permission for this action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Replies are closed on this thread
    #[error("comments are locked for thread {0}")]
    CommentsLocked(ThreadId),

    /// Infrastructure failure (e.g., data directory not writable)
    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }
}

/// Outcome of a failed login or registration attempt.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("user not found")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    /// A required field was empty after trimming
    #[error("{0}")]
    MissingField(String),

    #[error(transparent)]
    App(#[from] AppError),
}

/// A specialized Result type for forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
