use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(AppError::Validation(format!(
                "Unknown application status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|e: AppError| {
            AppError::Internal(anyhow::anyhow!("application {} has bad status: {e}", row.id))
        })?;
        Ok(Application {
            id: row.id,
            listing_id: row.listing_id,
            applicant_id: row.applicant_id,
            applicant_name: row.applicant_name,
            applicant_email: row.applicant_email,
            resume_url: row.resume_url,
            cover_letter: row.cover_letter,
            submitted_at: row.submitted_at,
            status,
        })
    }
}

/// A submission before the store assigns id, timestamp and initial status.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub listing_id: Uuid,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}
