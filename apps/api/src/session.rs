//! Per-request session context.
//!
//! Handlers receive the caller's identity as an extractor argument instead of
//! reading it from shared state. The bearer token is resolved through the
//! identity provider and the role comes from the stored profile.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{Role, UserProfile};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionContext {
    pub user: Option<UserProfile>,
    /// The token is valid but the profile has not been written yet.
    pub loading: bool,
    #[serde(skip)]
    pub token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn loading(token: String) -> Self {
        Self {
            user: None,
            loading: true,
            token: Some(token),
        }
    }

    pub fn signed_in(user: UserProfile, token: String) -> Self {
        Self {
            user: Some(user),
            loading: false,
            token: Some(token),
        }
    }

    pub fn require_user(&self) -> Result<&UserProfile, AppError> {
        self.user.as_ref().ok_or(AppError::Unauthorized)
    }

    pub fn require_employer(&self) -> Result<&UserProfile, AppError> {
        self.require_role(Role::Employer)
    }

    pub fn require_job_seeker(&self) -> Result<&UserProfile, AppError> {
        self.require_role(Role::JobSeeker)
    }

    fn require_role(&self, role: Role) -> Result<&UserProfile, AppError> {
        let user = self.require_user()?;
        if user.role != role {
            return Err(AppError::Forbidden(format!(
                "This action requires the {} role",
                role.as_str()
            )));
        }
        Ok(user)
    }
}

/// `Ok(None)` without an Authorization header; a header that is not a bearer
/// token is rejected.
fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::Unauthorized)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Unauthorized),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(token) = bearer_token(&parts.headers)? else {
            return Ok(Self::anonymous());
        };

        let account = state.identity.lookup(&token).await?;
        match state.store.get_profile(&account.uid).await? {
            Some(user) => Ok(Self::signed_in(user, token)),
            None => {
                debug!("Account {} has no profile yet", account.uid);
                Ok(Self::loading(token))
            }
        }
    }
}
