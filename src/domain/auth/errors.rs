use serde::Serialize;
use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Rate limit exceeded, please try again later")]
  RateLimitExceeded,

  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("User not found")]
  UserNotFound,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Categories a sign-in failure can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthErrorKind {
  /// Wrong, unknown or malformed email/password
  CredentialsSignin,
  /// Sign-in refused even though credentials may be right
  AccessDenied,
  /// No valid session for the request
  SessionRequired,
  /// Server-side authentication setup is broken
  Configuration,
}

impl AuthError {
  /// Classifies the error; `None` means the failure is not an
  /// authentication outcome and belongs to the caller's error handling.
  pub fn kind(&self) -> Option<AuthErrorKind> {
    match self {
      AuthError::InvalidCredentials => Some(AuthErrorKind::CredentialsSignin),
      AuthError::RateLimitExceeded => Some(AuthErrorKind::AccessDenied),
      AuthError::InvalidSession | AuthError::UserNotFound => Some(AuthErrorKind::SessionRequired),
      AuthError::Hash(_) | AuthError::ValueObject(_) => Some(AuthErrorKind::Configuration),
      AuthError::Repository(_) => None,
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => RepositoryError::DatabaseError(db_err.message().to_string()),
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}
