use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::board::{LocalCollection, TabQuery, TabbedView};
use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, WorkMode};
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ApplicationStatusChange {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub tab: Option<ApplicationStatus>,
}

#[derive(Serialize)]
pub struct ApplicationStatusResponse {
    pub application: Application,
    #[serde(flatten)]
    pub tabs: TabbedView<Application>,
}

/// The listing fields a job seeker sees next to each application.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_mode: WorkMode,
}

#[derive(Serialize)]
pub struct MyApplicationsResponse {
    #[serde(flatten)]
    pub tabs: TabbedView<Application>,
    /// Keyed by listing id. Listings that no longer exist are absent.
    pub listings: BTreeMap<Uuid, ListingSummary>,
}

/// PATCH /api/v1/applications/:id/status
///
/// Only the owner of the listing applied to may move an application.
pub async fn handle_set_status(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(change): Json<ApplicationStatusChange>,
) -> Result<Json<ApplicationStatusResponse>, AppError> {
    let employer = session.require_employer()?;
    let current = state
        .store
        .get_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    let listing = match state.store.get_listing(current.listing_id).await? {
        Some(listing) if listing.is_owned_by(&employer.uid) => listing,
        _ => return Err(AppError::NotFound(format!("Application {id} not found"))),
    };

    let mut applications =
        LocalCollection::loaded(state.store.list_applications_for_listing(listing.id).await?);

    let store = &state.store;
    let application = applications
        .set_status(id, change.status, |staged| async move {
            store.set_application_status(staged.id, staged.status).await
        })
        .await?
        .clone();
    info!(
        "Application {id} on listing {} is now {}",
        listing.id, application.status
    );

    let tab = change.tab.or(Some(current.status));
    Ok(Json(ApplicationStatusResponse {
        application,
        tabs: TabbedView::of(&applications, tab),
    }))
}

/// DELETE /api/v1/applications/:id
///
/// Withdraws one of the caller's own applications. Withdrawing an application
/// that is already gone succeeds without touching the store.
pub async fn handle_withdraw(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let seeker = session.require_job_seeker()?;
    let mut applications =
        LocalCollection::loaded(state.store.list_applications_by_applicant(&seeker.uid).await?);

    let store = &state.store;
    let removed = applications
        .remove(id, |id| async move { store.delete_application(id).await })
        .await?;
    if removed.is_some() {
        info!("{} withdrew application {id}", seeker.uid);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<TabQuery>,
) -> Result<Json<MyApplicationsResponse>, AppError> {
    let seeker = session.require_job_seeker()?;
    let tab: Option<ApplicationStatus> = query.selected()?;
    let applications = state.store.list_applications_by_applicant(&seeker.uid).await?;

    let mut listings = BTreeMap::new();
    for application in &applications {
        if listings.contains_key(&application.listing_id) {
            continue;
        }
        if let Some(listing) = state.store.get_listing(application.listing_id).await? {
            listings.insert(
                listing.id,
                ListingSummary {
                    title: listing.title,
                    company: listing.company,
                    location: listing.location,
                    work_mode: listing.work_mode,
                },
            );
        }
    }

    Ok(Json(MyApplicationsResponse {
        tabs: TabbedView::of(&LocalCollection::loaded(applications), tab),
        listings,
    }))
}
