//! Sample listings loaded into the in-memory store when no database is configured.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{Compensation, Listing, ListingStatus, WorkMode};

pub const SAMPLE_EMPLOYER: &str = "sample-employer";

struct Sample {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    work_mode: WorkMode,
    category: &'static str,
    salary: (i64, i64),
    created: (i32, u32, u32),
    deadline: (i32, u32, u32),
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Senior Frontend Developer",
        company: "TechCorp",
        location: "Remote",
        work_mode: WorkMode::Remote,
        category: "Technology",
        salary: (95_000, 125_000),
        created: (2025, 5, 5),
        deadline: (2025, 6, 5),
    },
    Sample {
        title: "Full Stack Engineer",
        company: "WebSolutions",
        location: "New York, NY",
        work_mode: WorkMode::Hybrid,
        category: "Technology",
        salary: (105_000, 140_000),
        created: (2025, 5, 10),
        deadline: (2025, 6, 10),
    },
    Sample {
        title: "DevOps Engineer",
        company: "CloudTech",
        location: "San Francisco, CA",
        work_mode: WorkMode::Onsite,
        category: "Engineering",
        salary: (120_000, 160_000),
        created: (2025, 5, 12),
        deadline: (2025, 6, 15),
    },
    Sample {
        title: "UI/UX Designer",
        company: "DesignStudio",
        location: "Remote",
        work_mode: WorkMode::Remote,
        category: "Design",
        salary: (85_000, 110_000),
        created: (2025, 5, 15),
        deadline: (2025, 6, 20),
    },
    Sample {
        title: "React Native Developer",
        company: "MobileApps",
        location: "Austin, TX",
        work_mode: WorkMode::Hybrid,
        category: "Technology",
        salary: (90_000, 120_000),
        created: (2025, 5, 16),
        deadline: (2025, 6, 16),
    },
    Sample {
        title: "Backend Engineer",
        company: "DataStream",
        location: "Chicago, IL",
        work_mode: WorkMode::Onsite,
        category: "Engineering",
        salary: (100_000, 135_000),
        created: (2025, 5, 17),
        deadline: (2025, 6, 17),
    },
    Sample {
        title: "Product Manager",
        company: "InnovateCo",
        location: "Seattle, WA",
        work_mode: WorkMode::Hybrid,
        category: "Marketing",
        salary: (110_000, 150_000),
        created: (2025, 5, 15),
        deadline: (2025, 6, 18),
    },
    Sample {
        title: "Data Scientist",
        company: "AnalyticsPro",
        location: "Boston, MA",
        work_mode: WorkMode::Onsite,
        category: "Finance",
        salary: (115_000, 155_000),
        created: (2025, 5, 14),
        deadline: (2025, 6, 19),
    },
];

fn utc_date((y, m, d): (i32, u32, u32)) -> chrono::DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .unwrap_or_default()
}

pub fn sample_listings() -> Vec<Listing> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, s)| Listing {
            id: Uuid::from_u128(i as u128 + 1),
            title: s.title.to_string(),
            company: s.company.to_string(),
            location: s.location.to_string(),
            work_mode: s.work_mode,
            category: s.category.to_string(),
            salary: Compensation {
                min: s.salary.0,
                max: s.salary.1,
                currency: "$".to_string(),
            },
            description: format!("{} at {}.", s.title, s.company),
            requirements: String::new(),
            created_at: utc_date(s.created),
            deadline: utc_date(s.deadline),
            status: ListingStatus::Active,
            posted_by: SAMPLE_EMPLOYER.to_string(),
            updated_at: None,
        })
        .collect()
}
