//! Landing-page derivations over the active listing set.

use serde::Serialize;

use crate::models::{Listing, ListingStatus};

pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Marketing",
    "Design",
    "Finance",
    "Healthcare",
    "Engineering",
    "Sales",
    "Education",
];

pub const FEATURED_MIN_SALARY: i64 = 80_000;
pub const FEATURED_LIMIT: usize = 3;
pub const RECENT_LIMIT: usize = 6;

#[derive(Debug, Serialize)]
pub struct Highlights {
    pub featured: Vec<Listing>,
    pub recent: Vec<Listing>,
    pub categories: &'static [&'static str],
}

/// Active listings paying at least `FEATURED_MIN_SALARY`, best minimum first.
pub fn featured(listings: &[Listing]) -> Vec<&Listing> {
    let mut picked: Vec<&Listing> = listings
        .iter()
        .filter(|l| l.status == ListingStatus::Active && l.salary.min >= FEATURED_MIN_SALARY)
        .collect();
    picked.sort_by(|a, b| b.salary.min.cmp(&a.salary.min));
    picked.truncate(FEATURED_LIMIT);
    picked
}

/// Newest active listings.
pub fn recent(listings: &[Listing]) -> Vec<&Listing> {
    let mut picked: Vec<&Listing> = listings
        .iter()
        .filter(|l| l.status == ListingStatus::Active)
        .collect();
    picked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    picked.truncate(RECENT_LIMIT);
    picked
}

pub fn highlights(listings: &[Listing]) -> Highlights {
    Highlights {
        featured: featured(listings).into_iter().cloned().collect(),
        recent: recent(listings).into_iter().cloned().collect(),
        categories: CATEGORIES,
    }
}
