use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// KiB
const MEMORY_COST: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Argon2id hasher for the `users.password_hash` column
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub fn new() -> Result<Self, AuthError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
      .map_err(|e| HashError::HashingFailed(format!("Invalid Argon2 params: {}", e)))?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  /// PHC string with a fresh random salt
  pub fn hash_password(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let phc = self
      .argon2
      .hash_password(password.as_str().as_bytes(), &salt)
      .map_err(|e| HashError::HashingFailed(e.to_string()))?
      .to_string();

    Ok(PasswordHash::from_hash(phc)?)
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let stored = password_hash::PasswordHash::new(hashed_password.as_str())
      .map_err(|e| HashError::VerificationFailed(format!("Invalid hash format: {}", e)))?;

    match self
      .argon2
      .verify_password(password.as_str().as_bytes(), &stored)
    {
      Ok(()) => Ok(true),
      Err(password_hash::Error::Password) => Ok(false),
      Err(e) => Err(HashError::VerificationFailed(e.to_string()).into()),
    }
  }
}
