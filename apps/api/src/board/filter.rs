//! Filter predicate engine for listing search.
//!
//! Every criterion is independent and disabled when empty. A listing is kept
//! when it satisfies all active criteria. Order of the input is preserved.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Listing, WorkMode};

/// Requested salary window. A listing matches only when its whole range fits
/// inside the window; overlapping ranges do not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBounds {
    pub min: i64,
    pub max: i64,
}

impl SalaryBounds {
    pub fn contains(&self, listing: &Listing) -> bool {
        listing.salary.min >= self.min && listing.salary.max <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub location: String,
    pub work_mode: Option<WorkMode>,
    pub salary: Option<SalaryBounds>,
    pub category: Option<String>,
}

impl FilterCriteria {
    /// Zero means filtering returns its input unchanged.
    pub fn active_count(&self) -> usize {
        [
            !self.query.trim().is_empty(),
            !self.location.trim().is_empty(),
            self.work_mode.is_some(),
            self.salary.is_some(),
            self.category.as_deref().is_some_and(|c| !c.is_empty()),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_query(listing)
            && self.matches_location(listing)
            && self.matches_work_mode(listing)
            && self.matches_category(listing)
            && self.matches_salary(listing)
    }

    fn matches_query(&self, listing: &Listing) -> bool {
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || listing.title.to_lowercase().contains(&needle)
            || listing.company.to_lowercase().contains(&needle)
    }

    fn matches_location(&self, listing: &Listing) -> bool {
        let needle = self.location.trim().to_lowercase();
        needle.is_empty() || listing.location.to_lowercase().contains(&needle)
    }

    fn matches_work_mode(&self, listing: &Listing) -> bool {
        self.work_mode.map_or(true, |mode| listing.work_mode == mode)
    }

    fn matches_category(&self, listing: &Listing) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => listing.category == category,
        }
    }

    fn matches_salary(&self, listing: &Listing) -> bool {
        self.salary.map_or(true, |bounds| bounds.contains(listing))
    }
}

/// Returns the listings satisfying every active criterion, in input order.
pub fn filter_listings<'a>(listings: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    listings.iter().filter(|l| criteria.matches(l)).collect()
}

/// Query string accepted by the search endpoint, e.g.
/// `?query=engineer&mode=remote&min_salary=0&max_salary=200000&category=Technology`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub mode: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub category: Option<String>,
}

impl TryFrom<ListingQuery> for FilterCriteria {
    type Error = AppError;

    fn try_from(q: ListingQuery) -> Result<Self, Self::Error> {
        let work_mode = parse_work_mode_selector(&q.mode)?;

        let salary = match (q.min_salary, q.max_salary) {
            (None, None) => None,
            (min, max) => {
                let bounds = SalaryBounds {
                    min: min.unwrap_or(0),
                    max: max.unwrap_or(i64::MAX),
                };
                if bounds.min > bounds.max {
                    return Err(AppError::Validation(format!(
                        "min_salary ({}) must not exceed max_salary ({})",
                        bounds.min, bounds.max
                    )));
                }
                Some(bounds)
            }
        };

        let category = q
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(FilterCriteria {
            query: q.query,
            location: q.location,
            work_mode,
            salary,
            category,
        })
    }
}

/// `""` and `"all"` disable the work-mode criterion.
pub fn parse_work_mode_selector(selector: &str) -> Result<Option<WorkMode>, AppError> {
    match selector.trim() {
        "" | "all" => Ok(None),
        other => other.parse().map(Some),
    }
}
