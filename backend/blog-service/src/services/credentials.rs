/// Credential service - user registration and password checks
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::security::CredentialHasher;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Plaintext behind the hash checked for unknown usernames
const DUMMY_PASSWORD: &str = "blog-service-dummy-password";

#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    /// Hash with the configured cost, verified when the username is unknown
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: CredentialHasher) -> Self {
        Self {
            users,
            hasher,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&plaintext)).await?
    }

    async fn verify_blocking(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let stored_hash = stored_hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&plaintext, &stored_hash))
            .await?
    }

    async fn dummy_hash(&self) -> Result<&str> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash_blocking(DUMMY_PASSWORD))
            .await?;
        Ok(hash.as_str())
    }

    /// Create a user with an Argon2id-hashed password
    ///
    /// A taken username yields `AlreadyExists`, including when a concurrent
    /// registration wins the unique constraint after the pre-check.
    pub async fn register(&self, username: &str, password: &str, is_admin: bool) -> Result<User> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let password_hash = self.hash_blocking(password).await?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                is_admin,
            })
            .await?;

        tracing::info!(user_id = user.id, is_admin = user.is_admin, "User registered");
        Ok(user)
    }

    /// Look up `username` and check `password` against its stored hash
    ///
    /// Unknown users and wrong passwords both yield `InvalidCredentials`. An
    /// unknown username is still checked against a dummy hash so both cases
    /// cost one Argon2 verification.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                self.verify_blocking(password, self.dummy_hash().await?).await?;
                tracing::debug!("Login attempt for unknown username");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.verify_blocking(password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }
}
