//! Argon2id password hashing.

use argon2::password_hash::{
    PasswordHash, PasswordHasher as Argon2PasswordHasherTrait, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};

const OUTPUT_LENGTH: usize = 32;

/// Argon2id hasher with a random per-password salt. Verification goes
/// through the PHC string, so parameters stored with older hashes still verify.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(memory_cost: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_cost, iterations, parallelism, Some(OUTPUT_LENGTH))
            .map_err(|e| AppError::Internal(format!("Invalid argon2 parameters: {}", e)))?;

        let mut hasher = Self {
            params,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash("dummy-password-for-timing")?;

        Ok(hasher)
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Constant-time comparison against a stored PHC hash
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash could not be parsed");
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burns one verification so an unknown account costs the same as a
    /// wrong password.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}
