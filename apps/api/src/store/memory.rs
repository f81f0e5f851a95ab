use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, Compensation, Listing, ListingDraft, ListingStatus,
    NewApplication, NewProfile, ProfileUpdate, UserProfile,
};
use crate::store::{already_applied, DocumentStore};

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    users: RwLock<HashMap<String, UserProfile>>,
    listings: RwLock<Vec<Listing>>,
    applications: RwLock<Vec<Application>>,
}

impl InMemoryDocumentStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            listings: RwLock::new(listings),
            ..Self::default()
        }
    }
}

fn newest_listings_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}

fn newest_applications_first(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    applications
}

fn listing_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Listing {id} not found"))
}

fn application_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_profile(&self, profile: NewProfile) -> Result<UserProfile, AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&profile.uid) {
            return Err(AppError::Conflict(format!(
                "Profile for {} already exists",
                profile.uid
            )));
        }
        let created = UserProfile {
            uid: profile.uid.clone(),
            display_name: profile.display_name,
            email: profile.email,
            role: profile.role,
            photo_url: None,
            created_at: Utc::now(),
            profile: Default::default(),
        };
        users.insert(profile.uid, created.clone());
        Ok(created)
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(uid)
            .ok_or_else(|| AppError::NotFound(format!("Profile {uid} not found")))?;
        user.display_name = update.display_name;
        user.profile = update.profile;
        Ok(user.clone())
    }

    async fn set_photo_url(&self, uid: &str, url: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(uid)
            .ok_or_else(|| AppError::NotFound(format!("Profile {uid} not found")))?;
        user.photo_url = Some(url.to_string());
        Ok(())
    }

    async fn create_listing(&self, owner: &str, draft: &ListingDraft) -> Result<Listing, AppError> {
        let listing = Listing {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            company: draft.company.clone(),
            location: draft.location.clone(),
            work_mode: draft.work_mode,
            category: draft.category.clone(),
            salary: Compensation {
                min: draft.salary_min,
                max: draft.salary_max,
                currency: draft.salary_currency.clone(),
            },
            description: draft.description.clone(),
            requirements: draft.requirements.clone(),
            created_at: Utc::now(),
            deadline: draft.deadline_utc(),
            status: ListingStatus::Active,
            posted_by: owner.to_string(),
            updated_at: None,
        };
        self.listings.write().await.push(listing.clone());
        debug!("Stored listing {} for {owner}", listing.id);
        Ok(listing)
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        Ok(self
            .listings
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn update_listing(&self, id: Uuid, draft: &ListingDraft) -> Result<Listing, AppError> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| listing_not_found(id))?;
        listing.title = draft.title.clone();
        listing.company = draft.company.clone();
        listing.location = draft.location.clone();
        listing.work_mode = draft.work_mode;
        listing.category = draft.category.clone();
        listing.salary = Compensation {
            min: draft.salary_min,
            max: draft.salary_max,
            currency: draft.salary_currency.clone(),
        };
        listing.description = draft.description.clone();
        listing.requirements = draft.requirements.clone();
        listing.deadline = draft.deadline_utc();
        listing.updated_at = Some(Utc::now());
        Ok(listing.clone())
    }

    async fn set_listing_status(&self, id: Uuid, status: ListingStatus) -> Result<(), AppError> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| listing_not_found(id))?;
        listing.status = status;
        listing.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError> {
        let listings = self.listings.read().await;
        Ok(newest_listings_first(
            listings
                .iter()
                .filter(|l| l.status == ListingStatus::Active)
                .cloned()
                .collect(),
        ))
    }

    async fn list_listings_by_owner(&self, owner: &str) -> Result<Vec<Listing>, AppError> {
        let listings = self.listings.read().await;
        Ok(newest_listings_first(
            listings
                .iter()
                .filter(|l| l.posted_by == owner)
                .cloned()
                .collect(),
        ))
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let mut applications = self.applications.write().await;
        if applications
            .iter()
            .any(|a| a.listing_id == new.listing_id && a.applicant_id == new.applicant_id)
        {
            return Err(already_applied(new.listing_id));
        }
        let application = Application {
            id: Uuid::new_v4(),
            listing_id: new.listing_id,
            applicant_id: new.applicant_id,
            applicant_name: new.applicant_name,
            applicant_email: new.applicant_email,
            resume_url: new.resume_url,
            cover_letter: new.cover_letter,
            submitted_at: Utc::now(),
            status: ApplicationStatus::Pending,
        };
        applications.push(application.clone());
        Ok(application)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_applications_for_listing(&self, listing_id: Uuid) -> Result<Vec<Application>, AppError> {
        let applications = self.applications.read().await;
        Ok(newest_applications_first(
            applications
                .iter()
                .filter(|a| a.listing_id == listing_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_applications_by_applicant(&self, applicant_id: &str) -> Result<Vec<Application>, AppError> {
        let applications = self.applications.read().await;
        Ok(newest_applications_first(
            applications
                .iter()
                .filter(|a| a.applicant_id == applicant_id)
                .cloned()
                .collect(),
        ))
    }

    async fn set_application_status(&self, id: Uuid, status: ApplicationStatus) -> Result<(), AppError> {
        let mut applications = self.applications.write().await;
        let application = applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| application_not_found(id))?;
        application.status = status;
        Ok(())
    }

    async fn delete_application(&self, id: Uuid) -> Result<(), AppError> {
        let mut applications = self.applications.write().await;
        let before = applications.len();
        applications.retain(|a| a.id != id);
        if applications.len() == before {
            return Err(application_not_found(id));
        }
        Ok(())
    }
}
