//! Authentication configuration

use crate::config::validation::Validate;
use serde::{Deserialize, Serialize};

/// Minimum accepted JWT secret length
const MIN_SECRET_LEN: usize = 32;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify JWTs
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(format!(
                "jwt_secret must be at least {} characters",
                MIN_SECRET_LEN
            ));
        }
        if self.token_ttl_secs == 0 {
            return Err("token_ttl_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_jwt_secret() -> String {
    // Development fallback only; deployments set JWT_SECRET
    "insecure-development-secret-change-me-in-prod".to_string()
}

fn default_token_ttl() -> u64 {
    // 7 days
    7 * 24 * 60 * 60
}
