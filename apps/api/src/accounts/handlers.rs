use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accounts::ensure_profile;
use crate::blob::avatar_key;
use crate::board::validation::{validate_sign_up, Validator, AVATAR_CONTENT_TYPES};
use crate::errors::AppError;
use crate::identity::AuthSession;
use crate::models::{NewProfile, ProfileUpdate, Role, UserProfile};
use crate::session::SessionContext;
use crate::state::AppState;
use crate::uploads::MultipartForm;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SendLinkRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct CompleteLinkRequest {
    pub email: String,
    pub code: String,
    /// Used only when this sign-in creates the account's profile.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct FederatedSignInRequest {
    pub provider_id: String,
    pub id_token: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// The bearer token plus the session it opens. `user` is null and `loading`
/// true when the account has no profile yet.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub session: SessionContext,
}

impl AuthResponse {
    fn new(token: String, user: Option<UserProfile>) -> Self {
        let session = match user {
            Some(user) => SessionContext::signed_in(user, token.clone()),
            None => SessionContext::loading(token.clone()),
        };
        Self { token, session }
    }
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub photo_url: String,
}

/// Signs the account in, creating its profile with `role` on first use.
async fn complete_sign_in(
    state: &AppState,
    session: AuthSession,
    role: Role,
) -> Result<Json<AuthResponse>, AppError> {
    let user = ensure_profile(state.store.as_ref(), &session.account, role).await?;
    info!("{} signed in as {}", user.uid, user.role.as_str());
    Ok(Json(AuthResponse::new(session.token, Some(user))))
}

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_sign_up(&req.email, &req.password, &req.display_name)?;
    let session = state
        .identity
        .sign_up(req.email.trim(), &req.password, req.display_name.trim())
        .await?;
    let user = state
        .store
        .create_profile(NewProfile {
            uid: session.account.uid.clone(),
            display_name: req.display_name.trim().to_string(),
            email: session.account.email.clone(),
            role: req.role,
        })
        .await?;
    info!("Registered {} as {}", user.uid, user.role.as_str());
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(session.token, Some(user))),
    ))
}

/// POST /api/v1/auth/sign-in
///
/// Reads the profile only. Roles are assigned when the account is created, so
/// an account without a profile signs in as `loading`.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .identity
        .sign_in_with_password(req.email.trim(), &req.password)
        .await?;
    let user = state.store.get_profile(&session.account.uid).await?;
    match &user {
        Some(user) => info!("{} signed in as {}", user.uid, user.role.as_str()),
        None => warn!("{} signed in without a profile", session.account.uid),
    }
    Ok(Json(AuthResponse::new(session.token, user)))
}

/// POST /api/v1/auth/sign-in/link
pub async fn handle_send_link(
    State(state): State<AppState>,
    Json(req): Json<SendLinkRequest>,
) -> Result<StatusCode, AppError> {
    let mut v = Validator::new();
    v.check(req.email.contains('@'), "email", "a valid email is required");
    v.finish()?;
    state
        .identity
        .send_sign_in_link(req.email.trim(), &state.config.sign_in_link_url)
        .await?;
    info!("Sent sign-in link to {}", req.email.trim());
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/sign-in/link/complete
pub async fn handle_complete_link(
    State(state): State<AppState>,
    Json(req): Json<CompleteLinkRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .identity
        .complete_link_sign_in(req.email.trim(), &req.code)
        .await?;
    complete_sign_in(&state, session, req.role.unwrap_or(Role::JobSeeker)).await
}

/// POST /api/v1/auth/sign-in/federated
pub async fn handle_federated(
    State(state): State<AppState>,
    Json(req): Json<FederatedSignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .identity
        .sign_in_federated(&req.provider_id, &req.id_token)
        .await?;
    complete_sign_in(&state, session, req.role.unwrap_or(Role::JobSeeker)).await
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<StatusCode, AppError> {
    let token = session.token.as_deref().ok_or(AppError::Unauthorized)?;
    state.identity.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_session(session: SessionContext) -> Json<SessionContext> {
    Json(session)
}

/// GET /api/v1/profile
pub async fn handle_get_profile(session: SessionContext) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(session.require_user()?.clone()))
}

/// PUT /api/v1/profile
///
/// Company details are kept for employers only.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: SessionContext,
    Json(mut update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let user = session.require_user()?;
    let mut v = Validator::new();
    v.require("display_name", &update.display_name);
    v.finish()?;

    update.display_name = update.display_name.trim().to_string();
    if !user.is_employer() {
        update.profile.company = None;
    }
    let updated = state.store.update_profile(&user.uid, update).await?;
    info!("Updated profile {}", updated.uid);
    Ok(Json(updated))
}

/// POST /api/v1/profile/avatar
pub async fn handle_upload_avatar(
    State(state): State<AppState>,
    session: SessionContext,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    let user = session.require_user()?;
    let mut form = MultipartForm::read(&mut multipart, &["avatar"]).await?;
    let file = form
        .take_file("avatar")
        .ok_or_else(|| AppError::Validation("avatar file is required".to_string()))?;
    file.validate("avatar", AVATAR_CONTENT_TYPES, state.config.max_upload_bytes)?;

    let photo_url = state
        .blobs
        .upload(&avatar_key(&user.uid), file.bytes, &file.content_type)
        .await?;
    state.store.set_photo_url(&user.uid, &photo_url).await?;
    info!("Stored avatar for {}", user.uid);
    Ok(Json(AvatarResponse { photo_url }))
}
