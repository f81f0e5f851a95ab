//! Document store collaborator.
//!
//! Handlers never talk to a database directly; they go through
//! `Arc<dyn DocumentStore>` held in `AppState`. Creation timestamps and ids
//! are assigned by the store. List queries return newest first.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, Listing, ListingDraft, ListingStatus, NewApplication,
    NewProfile, ProfileUpdate, UserProfile,
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A second application by the same applicant to the same listing.
pub fn already_applied(listing_id: Uuid) -> AppError {
    AppError::Conflict(format!("You have already applied to listing {listing_id}"))
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    // users
    async fn create_profile(&self, profile: NewProfile) -> Result<UserProfile, AppError>;
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;
    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, AppError>;
    async fn set_photo_url(&self, uid: &str, url: &str) -> Result<(), AppError>;

    // listings
    async fn create_listing(&self, owner: &str, draft: &ListingDraft) -> Result<Listing, AppError>;
    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, AppError>;
    async fn update_listing(&self, id: Uuid, draft: &ListingDraft) -> Result<Listing, AppError>;
    async fn set_listing_status(&self, id: Uuid, status: ListingStatus) -> Result<(), AppError>;
    /// `status = active`, newest first.
    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError>;
    /// `posted_by = owner`, newest first.
    async fn list_listings_by_owner(&self, owner: &str) -> Result<Vec<Listing>, AppError>;

    // applications
    /// `Conflict` when the applicant already applied to the listing.
    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError>;
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError>;
    async fn list_applications_for_listing(&self, listing_id: Uuid) -> Result<Vec<Application>, AppError>;
    async fn list_applications_by_applicant(&self, applicant_id: &str) -> Result<Vec<Application>, AppError>;
    async fn set_application_status(&self, id: Uuid, status: ApplicationStatus) -> Result<(), AppError>;
    async fn delete_application(&self, id: Uuid) -> Result<(), AppError>;
}
