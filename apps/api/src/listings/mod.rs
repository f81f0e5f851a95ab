pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Listing;
use crate::store::DocumentStore;

/// Fetches listing `id` for its owner. A listing owned by someone else is
/// reported exactly like a missing one.
pub async fn owned_listing(store: &dyn DocumentStore, id: Uuid, uid: &str) -> Result<Listing, AppError> {
    match store.get_listing(id).await? {
        Some(listing) if listing.is_owned_by(uid) => Ok(listing),
        _ => Err(AppError::NotFound(format!("Listing {id} not found"))),
    }
}
