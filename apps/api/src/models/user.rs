use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::errors::AppError;

/// Fixed at account creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "employer")]
    Employer,
    #[serde(rename = "jobSeeker")]
    JobSeeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "employer",
            Role::JobSeeker => "jobSeeker",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employer" => Ok(Role::Employer),
            "jobSeeker" => Ok(Role::JobSeeker),
            other => Err(AppError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreferences {
    pub job_alerts: bool,
    pub application_updates: bool,
    pub marketing_emails: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            job_alerts: true,
            application_updates: true,
            marketing_emails: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub company_description: String,
    pub company_website: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileDetails {
    pub title: String,
    pub location: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub website_url: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub notifications: NotificationPreferences,
    pub two_factor_auth: bool,
    /// Employers only.
    pub company: Option<CompanyProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile: ProfileDetails,
}

impl UserProfile {
    pub fn is_employer(&self) -> bool {
        self.role == Role::Employer
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile: Json<ProfileDetails>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|e: AppError| {
            AppError::Internal(anyhow::anyhow!("user {} has bad role: {e}", row.uid))
        })?;
        Ok(UserProfile {
            uid: row.uid,
            display_name: row.display_name,
            email: row.email,
            role,
            photo_url: row.photo_url,
            created_at: row.created_at,
            profile: row.profile.0,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

/// Settings form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: String,
    #[serde(default)]
    pub profile: ProfileDetails,
}
