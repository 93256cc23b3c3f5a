//! Authentication: registration, login, and token verification

mod jwt;

pub use jwt::{Claims, JwtManager};

use crate::config::AuthConfig;
use crate::storage::{UserAccount, UserStore};
use crate::utils::error::{AppError, Result};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

/// Identity attached to a request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
}

/// Registration/login backend over the in-memory user table
pub struct AuthSystem {
    jwt: JwtManager,
    users: Arc<UserStore>,
}

impl AuthSystem {
    pub fn new(config: &AuthConfig, users: Arc<UserStore>) -> Self {
        Self {
            jwt: JwtManager::new(&config.jwt_secret, config.token_ttl_secs),
            users,
        }
    }

    /// Create an account and return it with a fresh token
    pub fn register(&self, email: &str, password: &str) -> Result<(UserAccount, String)> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') || email.len() < 3 {
            return Err(AppError::Validation("A valid email is required".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Crypto(e.to_string()))?
            .to_string();

        let account = UserAccount {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            created_at: Utc::now(),
        };
        self.users.create(account.clone())?;

        let token = self.jwt.issue(&account.id, &account.email)?;
        Ok((account, token))
    }

    /// Verify credentials and return the account with a fresh token
    pub fn login(&self, email: &str, password: &str) -> Result<(UserAccount, String)> {
        let email = email.trim().to_lowercase();
        let account = self
            .users
            .find_by_email(&email)
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|e| AppError::Crypto(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let token = self.jwt.issue(&account.id, &account.email)?;
        Ok((account, token))
    }

    /// Resolve a bearer token to the identity it was issued for
    pub fn verify_token(&self, token: &str) -> Result<AuthedUser> {
        let claims = self.jwt.verify(token)?;
        Ok(AuthedUser {
            id: claims.sub,
            email: claims.email,
        })
    }

    /// Look up an account by id
    pub fn find_user(&self, id: &str) -> Option<UserAccount> {
        self.users.find_by_id(id)
    }
}
