use axum::{extract::State, Json};
use serde::Serialize;

use crate::board::{LocalCollection, TabbedView};
use crate::errors::AppError;
use crate::models::{Application, Listing, Role};
use crate::session::SessionContext;
use crate::state::AppState;

/// Dashboard payload, tagged with the caller's role.
#[derive(Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Dashboard {
    Employer {
        /// Applications received across all of the employer's listings.
        applications_received: usize,
        /// Active listings still accepting applications.
        open_listings: usize,
        listings: TabbedView<Listing>,
    },
    JobSeeker {
        applications: TabbedView<Application>,
    },
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<Dashboard>, AppError> {
    let user = session.require_user()?;
    let dashboard = match user.role {
        Role::Employer => {
            let listings = state.store.list_listings_by_owner(&user.uid).await?;
            let mut applications_received = 0;
            for listing in &listings {
                applications_received += state
                    .store
                    .list_applications_for_listing(listing.id)
                    .await?
                    .len();
            }
            let now = chrono::Utc::now();
            let open_listings = listings
                .iter()
                .filter(|l| l.accepts_applications(now))
                .count();
            Dashboard::Employer {
                applications_received,
                open_listings,
                listings: TabbedView::of(&LocalCollection::loaded(listings), None),
            }
        }
        Role::JobSeeker => {
            let applications = state.store.list_applications_by_applicant(&user.uid).await?;
            Dashboard::JobSeeker {
                applications: TabbedView::of(&LocalCollection::loaded(applications), None),
            }
        }
    };
    Ok(Json(dashboard))
}
