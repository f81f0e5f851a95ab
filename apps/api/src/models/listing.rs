use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Onsite => "onsite",
        }
    }
}

impl FromStr for WorkMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(WorkMode::Remote),
            "hybrid" => Ok(WorkMode::Hybrid),
            "onsite" => Ok(WorkMode::Onsite),
            other => Err(AppError::Validation(format!("Unknown work mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Closed,
    Hired,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Closed => "closed",
            ListingStatus::Hired => "hired",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "closed" => Ok(ListingStatus::Closed),
            "hired" => Ok(ListingStatus::Hired),
            other => Err(AppError::Validation(format!(
                "Unknown listing status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Compensation {
    pub min: i64,
    pub max: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_mode: WorkMode,
    pub category: String,
    pub salary: Compensation,
    pub description: String,
    pub requirements: String,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: ListingStatus,
    pub posted_by: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Open for new applications: active, and the deadline day (UTC) has not
    /// ended.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Active && now.date_naive() <= self.deadline.date_naive()
    }

    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.posted_by == uid
    }
}

/// Flat row as stored in the `listings` table.
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_mode: String,
    pub category: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub salary_currency: String,
    pub description: String,
    pub requirements: String,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub posted_by: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let work_mode = row.work_mode.parse().map_err(|e: AppError| {
            AppError::Internal(anyhow::anyhow!("listing {} has bad work_mode: {e}", row.id))
        })?;
        let status = row.status.parse().map_err(|e: AppError| {
            AppError::Internal(anyhow::anyhow!("listing {} has bad status: {e}", row.id))
        })?;
        Ok(Listing {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            work_mode,
            category: row.category,
            salary: Compensation {
                min: row.salary_min,
                max: row.salary_max,
                currency: row.salary_currency,
            },
            description: row.description,
            requirements: row.requirements,
            created_at: row.created_at,
            deadline: row.deadline,
            status,
            posted_by: row.posted_by,
            updated_at: row.updated_at,
        })
    }
}

fn default_work_mode() -> WorkMode {
    WorkMode::Onsite
}

fn default_category() -> String {
    "Technology".to_string()
}

fn default_salary_min() -> i64 {
    50_000
}

fn default_salary_max() -> i64 {
    100_000
}

fn default_currency() -> String {
    "$".to_string()
}

/// Employer-submitted listing form. Defaults match the posting form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default = "default_work_mode")]
    pub work_mode: WorkMode,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_salary_min")]
    pub salary_min: i64,
    #[serde(default = "default_salary_max")]
    pub salary_max: i64,
    #[serde(default = "default_currency")]
    pub salary_currency: String,
    pub description: String,
    pub requirements: String,
    pub deadline: chrono::NaiveDate,
}

impl ListingDraft {
    pub fn deadline_utc(&self) -> DateTime<Utc> {
        self.deadline.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}
