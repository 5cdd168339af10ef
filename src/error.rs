//! Domain error types for the reporting backend core.
//!
//! Every failure is returned to the immediate caller as a typed value;
//! nothing here is logged-and-swallowed or retried. The embedding facade
//! maps [`ErrorKind`] onto whatever status signaling its transport uses.

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("report not found: {0}")]
    ReportNotFound(i64),

    #[error("comment not found: {0}")]
    CommentNotFound(i64),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// The insert succeeded but the freshly assigned row could not be read
    /// back. Multi-statement operations are not wrapped in a transaction,
    /// so callers must treat this as its own failure shape.
    #[error("row {0} inserted but could not be read back")]
    ReadBack(i64),

    #[error("unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials for user: {0}")]
    InvalidCredentials(String),

    #[error("password hash error: {0}")]
    Hash(#[from] argon2::password_hash::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("username must be {min}-{max} characters")]
    UsernameLength { min: usize, max: usize },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("comment message must not be empty")]
    EmptyMessage,

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("environment variable not set: {0}")]
    MissingEnv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Transport-agnostic classification of an [`Error`].
///
/// The set is closed so a facade can map it exhaustively onto its own
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    InvalidCredential,
    Validation,
    Storage,
    Config,
}

impl Error {
    /// Classify this error for the facade's status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Storage(
                StoreError::UserNotFound(_)
                | StoreError::ReportNotFound(_)
                | StoreError::CommentNotFound(_),
            ) => ErrorKind::NotFound,
            Error::Storage(StoreError::DuplicateUsername(_)) => ErrorKind::Duplicate,
            Error::Storage(_) => ErrorKind::Storage,

            Error::Auth(AuthError::InvalidCredentials(_) | AuthError::Token(_)) => {
                ErrorKind::InvalidCredential
            }
            Error::Auth(AuthError::Hash(_)) => ErrorKind::Storage,

            Error::Validation(_) => ErrorKind::Validation,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Get a client-safe message (generic, no internal details)
    pub fn client_message(&self) -> &'static str {
        match self {
            Error::Storage(StoreError::UserNotFound(_)) => "no such user",
            Error::Storage(StoreError::ReportNotFound(_)) => "no such report",
            Error::Storage(StoreError::CommentNotFound(_)) => "no such comment",
            Error::Storage(StoreError::DuplicateUsername(_)) => "username already taken",
            Error::Storage(_) => "service temporarily unavailable",

            Error::Auth(AuthError::InvalidCredentials(_) | AuthError::Token(_)) => {
                "supplied username and/or password incorrect"
            }
            Error::Auth(AuthError::Hash(_)) => "service temporarily unavailable",

            Error::Validation(_) => "invalid request",
            Error::Config(_) => "service misconfigured",
        }
    }
}
