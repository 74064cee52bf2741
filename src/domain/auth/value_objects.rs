use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Password is too short (minimum {min} characters)")]
  PasswordTooShort { min: usize },

  #[error("Password is too long (maximum {} characters)", Password::MAX_LENGTH)]
  PasswordTooLong,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Invalid token format")]
  InvalidToken,
}

/// Login email, trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let raw = email.into();
    let normalized = raw.trim().to_lowercase();

    if normalized.validate_email() {
      Ok(Self(normalized))
    } else {
      Err(ValueObjectError::InvalidEmail(raw))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Plain password as typed; only ever hashed or verified, never stored
#[derive(Clone)]
pub struct Password(String);

impl Password {
  pub const MAX_LENGTH: usize = 128;

  pub fn new(password: impl Into<String>, min_length: usize) -> Result<Self, ValueObjectError> {
    let password = password.into();

    match password.chars().count() {
      n if n < min_length => Err(ValueObjectError::PasswordTooShort { min: min_length }),
      n if n > Self::MAX_LENGTH => Err(ValueObjectError::PasswordTooLong),
      _ => Ok(Self(password)),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

/// Stored Argon2 hash in PHC string form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    argon2::PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Opaque session token carried by the browser cookie
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
  /// Random bytes behind a token; hex encoding doubles the length
  const BYTES: usize = 32;

  pub fn generate() -> Self {
    use rand::RngCore;

    let mut bytes = [0u8; Self::BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);

    Self(hex::encode(bytes))
  }

  /// Accepts only strings shaped like a generated token
  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();
    let well_formed =
      token.len() == Self::BYTES * 2 && token.bytes().all(|b| b.is_ascii_hexdigit());

    if !well_formed {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// SHA-256 of the token, hex encoded
  pub fn hash(&self) -> TokenHash {
    TokenHash(hex::encode(Sha256::digest(self.0.as_bytes())))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

/// What the sessions table stores instead of the token itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for TokenHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
