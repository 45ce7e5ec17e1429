use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

use crate::config::HashConfig;

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("invalid argon2 parameters: {0}")]
    Params(String),
    #[error("argon2 hash_password error: {0}")]
    Hash(String),
}

/// Salted Argon2id password hashing with configurable cost.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(cfg: HashConfig) -> Result<Self, HashingError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| HashingError::Params(e.to_string()))?;
        Ok(Self { params })
    }

    /// Cheapest parameters argon2 accepts. Only suitable for tests.
    #[cfg(test)]
    pub fn insecure_fast() -> Self {
        Self::new(HashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("minimal argon2 params are valid")
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashingError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Returns false for a wrong password and for a hash that cannot be parsed.
    /// Cost parameters are read from the PHC string, so hashes made under older
    /// settings keep verifying.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}
