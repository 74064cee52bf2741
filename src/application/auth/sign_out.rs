use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthService, SessionToken};

/// Use case for ending the current browser session
pub struct SignOutUseCase {
  auth_service: Arc<AuthService>,
}

impl SignOutUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Ends the session behind the cookie value, if there is one.
  /// Malformed tokens cannot match a session and are ignored.
  pub async fn execute(&self, session_token: &str) -> Result<(), AuthError> {
    match SessionToken::from_string(session_token) {
      Ok(token) => self.auth_service.sign_out(&token).await,
      Err(_) => Ok(()),
    }
  }
}
