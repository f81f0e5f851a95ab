use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::models::{
    Application, ApplicationStatus, Compensation, Listing, ListingStatus, WorkMode,
};

pub fn listing(id: u128, title: &str, company: &str, min: i64, max: i64, mode: WorkMode) -> Listing {
    Listing {
        id: Uuid::from_u128(id),
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".to_string(),
        work_mode: mode,
        category: "Technology".to_string(),
        salary: Compensation {
            min,
            max,
            currency: "$".to_string(),
        },
        description: String::new(),
        requirements: String::new(),
        created_at: Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap(),
        deadline: Utc.with_ymd_and_hms(2025, 6, 5, 0, 0, 0).unwrap(),
        status: ListingStatus::Active,
        posted_by: "employer-1".to_string(),
        updated_at: None,
    }
}

pub fn listing_with_status(id: u128, status: ListingStatus) -> Listing {
    let mut l = listing(id, "Engineer", "TechCorp", 90_000, 120_000, WorkMode::Hybrid);
    l.status = status;
    l
}

pub fn application(id: u128, status: ApplicationStatus) -> Application {
    Application {
        id: Uuid::from_u128(id),
        listing_id: Uuid::from_u128(1),
        applicant_id: format!("seeker-{id}"),
        applicant_name: "John Smith".to_string(),
        applicant_email: "john@example.com".to_string(),
        resume_url: None,
        cover_letter: None,
        submitted_at: Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap(),
        status,
    }
}
