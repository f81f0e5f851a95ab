pub mod handlers;

use tracing::info;

use crate::errors::AppError;
use crate::identity::Account;
use crate::models::{NewProfile, Role, UserProfile};
use crate::store::DocumentStore;

/// Returns the stored profile for `account`, creating one with `role` on the
/// first sign-in. An existing profile keeps the role it was created with.
pub async fn ensure_profile(store: &dyn DocumentStore, account: &Account, role: Role) -> Result<UserProfile, AppError> {
    if let Some(profile) = store.get_profile(&account.uid).await? {
        return Ok(profile);
    }
    let display_name = account
        .display_name
        .clone()
        .unwrap_or_else(|| account.email.split('@').next().unwrap_or_default().to_string());
    let profile = store
        .create_profile(NewProfile {
            uid: account.uid.clone(),
            display_name,
            email: account.email.clone(),
            role,
        })
        .await?;
    info!("First sign-in for {}, created {} profile", account.uid, role.as_str());
    Ok(profile)
}
