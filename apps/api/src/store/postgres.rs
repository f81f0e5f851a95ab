use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::listing::ListingRow;
use crate::models::user::UserRow;
use crate::models::{
    Application, ApplicationStatus, Listing, ListingDraft, ListingStatus, NewApplication,
    NewProfile, ProfileUpdate, UserProfile,
};
use crate::store::{already_applied, DocumentStore};

const LISTING_COLUMNS: &str = "id, title, company, location, work_mode, category, salary_min, \
     salary_max, salary_currency, description, requirements, created_at, deadline, status, \
     posted_by, updated_at";

const APPLICATION_COLUMNS: &str = "id, listing_id, applicant_id, applicant_name, applicant_email, \
     resume_url, cover_letter, submitted_at, status";

const USER_COLUMNS: &str = "uid, display_name, email, role, photo_url, created_at, profile";

/// Postgres-backed document store.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn listings_from_rows(rows: Vec<ListingRow>) -> Result<Vec<Listing>, AppError> {
    rows.into_iter().map(Listing::try_from).collect()
}

fn applications_from_rows(rows: Vec<ApplicationRow>) -> Result<Vec<Application>, AppError> {
    rows.into_iter().map(Application::try_from).collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_profile(&self, profile: NewProfile) -> Result<UserProfile, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (uid, display_name, email, role) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (uid) DO NOTHING RETURNING {USER_COLUMNS}"
        ))
        .bind(&profile.uid)
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Profile for {} already exists", profile.uid)))?;

        info!("Created {} profile {}", profile.role.as_str(), profile.uid);
        row.try_into()
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1"))
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?
            .map(UserProfile::try_from)
            .transpose()
    }

    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET display_name = $1, profile = $2 WHERE uid = $3 RETURNING {USER_COLUMNS}"
        ))
        .bind(&update.display_name)
        .bind(Json(&update.profile))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {uid} not found")))?
        .try_into()
    }

    async fn set_photo_url(&self, uid: &str, url: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET photo_url = $1 WHERE uid = $2")
            .bind(url)
            .bind(uid)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Profile {uid} not found")));
        }
        Ok(())
    }

    async fn create_listing(&self, owner: &str, draft: &ListingDraft) -> Result<Listing, AppError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            INSERT INTO listings
                (title, company, location, work_mode, category, salary_min, salary_max,
                 salary_currency, description, requirements, deadline, status, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'active', $12)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.company)
        .bind(&draft.location)
        .bind(draft.work_mode.as_str())
        .bind(&draft.category)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(&draft.salary_currency)
        .bind(&draft.description)
        .bind(&draft.requirements)
        .bind(draft.deadline_utc())
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted listing {} for {owner}", row.id);
        row.try_into()
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        sqlx::query_as::<_, ListingRow>(&format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    async fn update_listing(&self, id: Uuid, draft: &ListingDraft) -> Result<Listing, AppError> {
        sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE listings SET
                title = $1, company = $2, location = $3, work_mode = $4, category = $5,
                salary_min = $6, salary_max = $7, salary_currency = $8, description = $9,
                requirements = $10, deadline = $11, updated_at = now()
            WHERE id = $12
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.company)
        .bind(&draft.location)
        .bind(draft.work_mode.as_str())
        .bind(&draft.category)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(&draft.salary_currency)
        .bind(&draft.description)
        .bind(&draft.requirements)
        .bind(draft.deadline_utc())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))?
        .try_into()
    }

    async fn set_listing_status(&self, id: Uuid, status: ListingStatus) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE listings SET status = $1, updated_at = now() WHERE id = $2")
                .bind(status.as_str())
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Listing {id} not found")));
        }
        Ok(())
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE status = 'active' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        listings_from_rows(rows)
    }

    async fn list_listings_by_owner(&self, owner: &str) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE posted_by = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        listings_from_rows(rows)
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications
                (listing_id, applicant_id, applicant_name, applicant_email, resume_url, cover_letter, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(new.listing_id)
        .bind(&new.applicant_id)
        .bind(&new.applicant_name)
        .bind(&new.applicant_email)
        .bind(&new.resume_url)
        .bind(&new.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                already_applied(new.listing_id)
            }
            other => AppError::Database(other),
        })?;

        info!(
            "Inserted application {} for listing {} by {}",
            row.id, new.listing_id, new.applicant_id
        );
        row.try_into()
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Application::try_from)
        .transpose()
    }

    async fn list_applications_for_listing(&self, listing_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE listing_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        applications_from_rows(rows)
    }

    async fn list_applications_by_applicant(&self, applicant_id: &str) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE applicant_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        applications_from_rows(rows)
    }

    async fn set_application_status(&self, id: Uuid, status: ApplicationStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application {id} not found")));
        }
        Ok(())
    }

    async fn delete_application(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application {id} not found")));
        }
        Ok(())
    }
}
