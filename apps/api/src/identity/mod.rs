//! Identity provider collaborator.
//!
//! The provider owns credentials and tokens. Roles are not part of the
//! provider's account; they live in the user profile in the document store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

pub mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpIdentityProvider;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the request (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailExists,

    #[error("Session token is invalid or expired")]
    InvalidToken,
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidCredentials | IdentityError::InvalidToken => AppError::Unauthorized,
            IdentityError::EmailExists => AppError::Conflict("Email already registered".to_string()),
            other => AppError::Identity(other.to_string()),
        }
    }
}

/// Account as known to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// A signed-in account plus the bearer token that identifies the session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub account: Account,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<AuthSession, IdentityError>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;
    /// Emails a passwordless sign-in link that returns to `continue_url`.
    async fn send_sign_in_link(&self, email: &str, continue_url: &str) -> Result<(), IdentityError>;
    async fn complete_link_sign_in(&self, email: &str, code: &str) -> Result<AuthSession, IdentityError>;
    /// Exchanges an id token from a federated provider (e.g. `google.com`).
    async fn sign_in_federated(&self, provider_id: &str, id_token: &str) -> Result<AuthSession, IdentityError>;
    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
    /// Resolves a bearer token to its account.
    async fn lookup(&self, token: &str) -> Result<Account, IdentityError>;
}
