use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Dashboard user allowed to sign in with email and password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  /// Argon2id PHC string
  #[serde(skip_serializing)]
  pub password_hash: String,
}

impl User {
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
    }
  }
}

/// Session entity representing a signed-in browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  /// SHA-256 hash of the token handed to the client
  pub session_token: String,
  pub ip_address: Option<IpAddr>,
  pub user_agent: Option<String>,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  /// Creates a session expiring `duration` from now
  pub fn with_duration(
    user_id: Uuid,
    session_token: String,
    duration: Duration,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      session_token,
      ip_address,
      user_agent,
      expires_at: now + duration,
      created_at: now,
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}

/// Record of one sign-in attempt, used for throttling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
  pub id: Uuid,
  pub email: String,
  pub ip_address: Option<IpAddr>,
  pub success: bool,
  pub attempted_at: DateTime<Utc>,
}

impl LoginAttempt {
  pub fn new(email: String, ip_address: Option<IpAddr>, success: bool) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      ip_address,
      success,
      attempted_at: Utc::now(),
    }
  }

  pub fn success(email: String, ip_address: Option<IpAddr>) -> Self {
    Self::new(email, ip_address, true)
  }

  pub fn failure(email: String, ip_address: Option<IpAddr>) -> Self {
    Self::new(email, ip_address, false)
  }
}
