use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString
    },
    Argon2
};

use crate::auth::AuthError;
use crate::config::{AppConfig, PasswordSource};

/// The single administrator account. The password is only ever held as an
/// argon2 PHC string.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        match &config.admin_password {
            PasswordSource::Plain(password) => Self::new(&config.admin_username, password),
            PasswordSource::Hash(hash) => Self::with_hash(&config.admin_username, hash),
        }
    }

    pub fn new(username: &str, password: &str) -> Result<Self, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    pub fn with_hash(username: &str, password_hash: &str) -> Result<Self, AuthError> {
        PasswordHash::new(password_hash).map_err(|e| AuthError::InvalidHash(e.to_string()))?;

        Ok(Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Exact, case-sensitive match on both fields.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::InvalidHash(e.to_string()))?;

        // Hash even for an unknown username so both failures take the same time.
        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if password_ok && username == self.username {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
