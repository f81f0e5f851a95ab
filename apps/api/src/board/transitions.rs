//! Lifecycle transition tables.
//!
//! Listing: active -> closed | hired, closed -> active. Hired is final.
//! Application: pending -> reviewed | accepted | rejected,
//! reviewed -> accepted | rejected. Accepted and rejected are final.

use std::fmt::Display;

use tracing::debug;

use crate::errors::AppError;
use crate::models::{ApplicationStatus, ListingStatus};

pub trait Lifecycle: Copy + Eq + Display {
    /// Name used in error messages.
    const ENTITY: &'static str;

    /// Whether `self -> next` is allowed. Staying in place is not a transition.
    fn can_transition_to(self, next: Self) -> bool;

    fn is_terminal(self) -> bool;
}

impl Lifecycle for ListingStatus {
    const ENTITY: &'static str = "listing";

    fn can_transition_to(self, next: Self) -> bool {
        use ListingStatus::*;
        matches!(
            (self, next),
            (Active, Closed) | (Active, Hired) | (Closed, Active)
        )
    }

    fn is_terminal(self) -> bool {
        self == ListingStatus::Hired
    }
}

impl Lifecycle for ApplicationStatus {
    const ENTITY: &'static str = "application";

    fn can_transition_to(self, next: Self) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Reviewed)
                | (Pending, Accepted)
                | (Pending, Rejected)
                | (Reviewed, Accepted)
                | (Reviewed, Rejected)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// Rejects a move the table does not allow with `AppError::IllegalTransition`.
pub fn check_transition<S: Lifecycle>(from: S, to: S) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        if from.is_terminal() {
            debug!("{} is final for a {}, refusing {to}", from, S::ENTITY);
        }
        Err(AppError::IllegalTransition {
            entity: S::ENTITY,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
