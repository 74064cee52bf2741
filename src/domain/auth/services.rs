use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

use super::entities::{LoginAttempt, Session, User};
use super::errors::AuthError;
use super::ports::{
  Authenticator, Credentials, LoginAttemptRepository, PasswordHasher, SessionRepository, SignedIn,
  UserRepository,
};
use super::value_objects::{Email, Password, PasswordHash, SessionToken};

/// Tunables for sign-in and session lifetime
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  pub password_min_length: usize,
  pub session_ttl_seconds: i64,
  pub rate_limit_window_seconds: i64,
  pub max_failed_attempts: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      password_min_length: 6,
      session_ttl_seconds: 60 * 60 * 24,
      rate_limit_window_seconds: 15 * 60,
      max_failed_attempts: 5,
    }
  }
}

/// Credentials authenticator backed by the users table
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  attempt_repo: Arc<dyn LoginAttemptRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  config: AuthServiceConfig,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    attempt_repo: Arc<dyn LoginAttemptRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      session_repo,
      attempt_repo,
      password_hasher,
      config,
    }
  }

  /// Validates a session token and returns the associated user
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if the session is unknown or expired
  pub async fn validate_session(&self, token: &SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self.session_repo.delete(session.id).await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  /// Ends the session behind `token`; unknown tokens are ignored
  pub async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
    let token_hash = token.hash();

    if let Some(session) = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
    {
      self.session_repo.delete(session.id).await?;
      tracing::info!(user_id = %session.user_id, "Session ended");
    }

    Ok(())
  }

  async fn record_attempt(&self, attempt: LoginAttempt) -> Result<(), AuthError> {
    self.attempt_repo.create(attempt).await
  }
}

#[async_trait]
impl Authenticator for AuthService {
  async fn sign_in(&self, credentials: Credentials) -> Result<SignedIn, AuthError> {
    let Credentials {
      email,
      password,
      ip_address,
      user_agent,
    } = credentials;

    // Malformed input is indistinguishable from a wrong password
    let (Ok(email), Ok(password)) = (
      Email::new(email),
      Password::new(password, self.config.password_min_length),
    ) else {
      return Err(AuthError::InvalidCredentials);
    };

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let failed_attempts = self
      .attempt_repo
      .count_recent_failures(email.as_str(), self.config.rate_limit_window_seconds)
      .await?;

    if failed_attempts >= self.config.max_failed_attempts {
      tracing::warn!(user_id = %user.id, failed_attempts, "Sign-in throttled");
      self
        .record_attempt(LoginAttempt::failure(email.into_inner(), ip_address))
        .await?;
      return Err(AuthError::RateLimitExceeded);
    }

    let password_hash = PasswordHash::from_hash(user.password_hash.as_str())?;
    if !self.password_hasher.verify(&password, &password_hash).await? {
      self
        .record_attempt(LoginAttempt::failure(email.into_inner(), ip_address))
        .await?;
      return Err(AuthError::InvalidCredentials);
    }

    self
      .record_attempt(LoginAttempt::success(email.into_inner(), ip_address))
      .await?;

    let token = SessionToken::generate();
    let session = Session::with_duration(
      user.id,
      token.hash().into_inner(),
      Duration::seconds(self.config.session_ttl_seconds),
      ip_address,
      user_agent,
    );
    let session = self.session_repo.create(session).await?;

    tracing::info!(user_id = %user.id, "User signed in");
    Ok(SignedIn {
      user,
      session,
      token,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::{HashError, RepositoryError};
  use crate::domain::auth::ports::{
    MockLoginAttemptRepository, MockPasswordHasher, MockSessionRepository, MockUserRepository,
  };
  use uuid::Uuid;

  // Well-formed PHC string; verification is mocked so the digest never matters.
  const STORED_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$q7TNmSvVCJG2fZIgiRHBtZNo/DPAFc6jjQ4O8QwYR7s";

  fn user() -> User {
    User::new(
      "User".to_string(),
      "user@nextmail.com".to_string(),
      STORED_HASH.to_string(),
    )
  }

  fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
      email: email.to_string(),
      password: password.to_string(),
      ip_address: Some("127.0.0.1".parse().unwrap()),
      user_agent: Some("test-agent".to_string()),
    }
  }

  struct Mocks {
    users: MockUserRepository,
    sessions: MockSessionRepository,
    attempts: MockLoginAttemptRepository,
    hasher: MockPasswordHasher,
  }

  impl Mocks {
    fn new() -> Self {
      Self {
        users: MockUserRepository::new(),
        sessions: MockSessionRepository::new(),
        attempts: MockLoginAttemptRepository::new(),
        hasher: MockPasswordHasher::new(),
      }
    }

    fn into_service(self) -> AuthService {
      AuthService::new(
        Arc::new(self.users),
        Arc::new(self.sessions),
        Arc::new(self.attempts),
        Arc::new(self.hasher),
        AuthServiceConfig::default(),
      )
    }
  }

  #[tokio::test]
  async fn test_sign_in_success_creates_session() {
    let mut mocks = Mocks::new();
    mocks
      .users
      .expect_find_by_email()
      .returning(|_| Ok(Some(user())));
    mocks
      .attempts
      .expect_count_recent_failures()
      .returning(|_, _| Ok(0));
    mocks.hasher.expect_verify().returning(|_, _| Ok(true));
    mocks
      .attempts
      .expect_create()
      .withf(|attempt| attempt.success)
      .times(1)
      .returning(|_| Ok(()));
    mocks
      .sessions
      .expect_create()
      .times(1)
      .returning(|session| Ok(session));

    let signed_in = mocks
      .into_service()
      .sign_in(credentials("User@NextMail.com", "123456"))
      .await
      .unwrap();

    assert_eq!(signed_in.user.email, "user@nextmail.com");
    assert_eq!(signed_in.session.session_token, signed_in.token.hash().into_inner());
    assert!(!signed_in.session.is_expired());
  }

  #[tokio::test]
  async fn test_sign_in_malformed_credentials() {
    let service = Mocks::new().into_service();

    let result = service.sign_in(credentials("not-an-email", "123456")).await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    let result = service.sign_in(credentials("user@nextmail.com", "123")).await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_sign_in_unknown_email() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_email().returning(|_| Ok(None));

    let result = mocks
      .into_service()
      .sign_in(credentials("nobody@nextmail.com", "123456"))
      .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_sign_in_wrong_password_records_failure() {
    let mut mocks = Mocks::new();
    mocks
      .users
      .expect_find_by_email()
      .returning(|_| Ok(Some(user())));
    mocks
      .attempts
      .expect_count_recent_failures()
      .returning(|_, _| Ok(1));
    mocks.hasher.expect_verify().returning(|_, _| Ok(false));
    mocks
      .attempts
      .expect_create()
      .withf(|attempt| !attempt.success && attempt.email == "user@nextmail.com")
      .times(1)
      .returning(|_| Ok(()));
    mocks.sessions.expect_create().never();

    let result = mocks
      .into_service()
      .sign_in(credentials("user@nextmail.com", "wrong-password"))
      .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_sign_in_throttled_after_repeated_failures() {
    let mut mocks = Mocks::new();
    mocks
      .users
      .expect_find_by_email()
      .returning(|_| Ok(Some(user())));
    mocks
      .attempts
      .expect_count_recent_failures()
      .returning(|_, _| Ok(5));
    mocks
      .attempts
      .expect_create()
      .times(1)
      .returning(|_| Ok(()));
    mocks.hasher.expect_verify().never();

    let result = mocks
      .into_service()
      .sign_in(credentials("user@nextmail.com", "123456"))
      .await;

    assert!(matches!(result, Err(AuthError::RateLimitExceeded)));
  }

  #[tokio::test]
  async fn test_sign_in_repository_failure_propagates() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_email().returning(|_| {
      Err(AuthError::Repository(RepositoryError::ConnectionFailed(
        "Pool timed out".to_string(),
      )))
    });

    let result = mocks
      .into_service()
      .sign_in(credentials("user@nextmail.com", "123456"))
      .await;

    assert!(matches!(result, Err(AuthError::Repository(_))));
  }

  #[tokio::test]
  async fn test_sign_in_hasher_failure_is_configuration_error() {
    let mut mocks = Mocks::new();
    mocks
      .users
      .expect_find_by_email()
      .returning(|_| Ok(Some(user())));
    mocks
      .attempts
      .expect_count_recent_failures()
      .returning(|_, _| Ok(0));
    mocks
      .hasher
      .expect_verify()
      .returning(|_, _| Err(AuthError::Hash(HashError::VerificationFailed("bad params".into()))));

    let result = mocks
      .into_service()
      .sign_in(credentials("user@nextmail.com", "123456"))
      .await;

    assert!(matches!(result, Err(AuthError::Hash(_))));
  }

  #[tokio::test]
  async fn test_validate_session_expired_is_deleted() {
    let token = SessionToken::generate();
    let hash = token.hash().into_inner();

    let mut mocks = Mocks::new();
    mocks
      .sessions
      .expect_find_by_token_hash()
      .returning(move |_| {
        Ok(Some(Session::with_duration(
          Uuid::new_v4(),
          hash.clone(),
          Duration::seconds(-10),
          None,
          None,
        )))
      });
    mocks.sessions.expect_delete().times(1).returning(|_| Ok(()));

    let result = mocks.into_service().validate_session(&token).await;
    assert!(matches!(result, Err(AuthError::InvalidSession)));
  }

  #[tokio::test]
  async fn test_validate_session_returns_user() {
    let token = SessionToken::generate();
    let owner = user();
    let owner_id = owner.id;

    let mut mocks = Mocks::new();
    mocks
      .sessions
      .expect_find_by_token_hash()
      .returning(move |hash| {
        Ok(Some(Session::with_duration(
          owner_id,
          hash.to_string(),
          Duration::hours(1),
          None,
          None,
        )))
      });
    mocks
      .users
      .expect_find_by_id()
      .returning(move |_| Ok(Some(owner.clone())));

    let user = mocks.into_service().validate_session(&token).await.unwrap();
    assert_eq!(user.id, owner_id);
  }

  #[tokio::test]
  async fn test_sign_out_unknown_token_is_noop() {
    let mut mocks = Mocks::new();
    mocks
      .sessions
      .expect_find_by_token_hash()
      .returning(|_| Ok(None));
    mocks.sessions.expect_delete().never();

    let result = mocks
      .into_service()
      .sign_out(&SessionToken::generate())
      .await;
    assert!(result.is_ok());
  }
}
