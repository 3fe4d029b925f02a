/// Password hashing and verification using Argon2id
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Argon2id hasher with fixed cost parameters
///
/// ## Security
///
/// - Algorithm: Argon2id, version 0x13
/// - Salt: random 16-byte salt generated per password
/// - Output: PHC-formatted string, parameters embedded
///
/// Verification reads the parameters from the stored hash, so changing the
/// configured cost does not invalidate existing passwords.
#[derive(Debug, Clone, Default)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Build a hasher from configured costs. `None` keeps the argon2 default.
    pub fn from_settings(
        memory_kib: Option<u32>,
        iterations: Option<u32>,
        parallelism: Option<u32>,
    ) -> Result<Self> {
        let params = Params::new(
            memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            iterations.unwrap_or(Params::DEFAULT_T_COST),
            parallelism.unwrap_or(Params::DEFAULT_P_COST),
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self::new(params))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// Check a plaintext password against a stored PHC hash
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
    /// unreadable.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
