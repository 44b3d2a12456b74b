use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterForm, User, validation_messages};
use crate::repository::UserRepository;

/// Service layer for registration and credential checks
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the form, hash the password and store the account.
    /// Registration does not log the user in.
    pub async fn register(&self, form: RegisterForm) -> UserResult<User> {
        form.validate()
            .map_err(|e| UserError::InvalidForm(validation_messages(&e)))?;

        let username = form.username.trim().to_string();
        if self.repository.username_exists(&username).await? {
            return Err(UserError::DuplicateUsername(username));
        }

        let password_hash = self.hash_password(&form.password)?;
        let user = self.repository.create(User::new(username, password_hash)).await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> UserResult<User> {
        let Some(user) = self.repository.get_by_username(username.trim()).await? else {
            warn!("Login attempt for unknown user");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
