use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;

use crate::application::action_result::{INVALID_CREDENTIALS, SOMETHING_WENT_WRONG};
use crate::domain::auth::{AuthError, AuthErrorKind, Authenticator, Credentials, SessionToken};

/// Where a signed-in user lands when no usable `redirectTo` was given
pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// Command for signing a user in from the login form
#[derive(Debug, Clone)]
pub struct AuthenticateCommand {
  pub email: String,
  pub password: String,
  /// Path the user asked for before being sent to the login page
  pub redirect_to: Option<String>,
  pub ip_address: Option<IpAddr>,
  pub user_agent: Option<String>,
}

#[derive(Debug)]
pub enum AuthenticateOutcome {
  SignedIn {
    token: SessionToken,
    expires_at: DateTime<Utc>,
    redirect_to: String,
  },
  /// Message to show on the login form
  Failed(String),
}

pub struct AuthenticateUseCase {
  authenticator: Arc<dyn Authenticator>,
}

impl AuthenticateUseCase {
  pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
    Self { authenticator }
  }

  /// Signs the user in and picks the page to continue to
  ///
  /// # Errors
  /// Failures that are not an authentication outcome (storage outages)
  /// are returned unchanged.
  pub async fn execute(&self, command: AuthenticateCommand) -> Result<AuthenticateOutcome, AuthError> {
    let credentials = Credentials {
      email: command.email,
      password: command.password,
      ip_address: command.ip_address,
      user_agent: command.user_agent,
    };

    match self.authenticator.sign_in(credentials).await {
      Ok(signed_in) => Ok(AuthenticateOutcome::SignedIn {
        token: signed_in.token,
        expires_at: signed_in.session.expires_at,
        redirect_to: local_redirect(command.redirect_to.as_deref()),
      }),
      Err(e) => match e.kind() {
        Some(AuthErrorKind::CredentialsSignin) => {
          Ok(AuthenticateOutcome::Failed(INVALID_CREDENTIALS.to_string()))
        }
        Some(kind) => {
          tracing::warn!(?kind, error = %e, "Sign-in refused");
          Ok(AuthenticateOutcome::Failed(SOMETHING_WENT_WRONG.to_string()))
        }
        None => Err(e),
      },
    }
  }
}

/// Accepts only same-origin absolute paths
fn local_redirect(requested: Option<&str>) -> String {
  match requested {
    Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
      path.to_string()
    }
    _ => DEFAULT_REDIRECT.to_string(),
  }
}
