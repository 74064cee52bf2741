use async_trait::async_trait;
use std::net::IpAddr;
use uuid::Uuid;

use super::entities::{LoginAttempt, Session, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash, SessionToken};

/// Raw credentials as submitted by the login form
#[derive(Debug, Clone)]
pub struct Credentials {
  pub email: String,
  pub password: String,
  pub ip_address: Option<IpAddr>,
  pub user_agent: Option<String>,
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
  pub user: User,
  pub session: Session,
  pub token: SessionToken,
}

/// Verifies credentials and opens a session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
  async fn sign_in(&self, credentials: Credentials) -> Result<SignedIn, AuthError>;
}

/// Repository trait for user lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  /// Finds a session by the SHA-256 hash of its token
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError>;
}

/// Repository trait for login attempt tracking operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
  async fn create(&self, attempt: LoginAttempt) -> Result<(), AuthError>;

  /// Counts failed attempts for `email` within the last `window_seconds`
  async fn count_recent_failures(&self, email: &str, window_seconds: i64)
  -> Result<i64, AuthError>;
}

/// Checks a plain password against a stored hash
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}
