use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::blob::resume_key;
use crate::board::filter::{filter_listings, FilterCriteria, ListingQuery};
use crate::board::highlights::{highlights, Highlights};
use crate::board::validation::{
    validate_applicant, validate_listing_draft, RESUME_CONTENT_TYPES,
};
use crate::board::views::{RenderState, ViewPayload, NO_SEARCH_RESULTS};
use crate::board::{LocalCollection, TabQuery, TabbedView};
use crate::errors::AppError;
use crate::listings::owned_listing;
use crate::models::{
    Application, ApplicationStatus, Listing, ListingDraft, ListingStatus, NewApplication,
};
use crate::session::SessionContext;
use crate::state::AppState;
use crate::uploads::MultipartForm;

#[derive(Serialize)]
pub struct SearchResponse {
    pub active_filters: usize,
    /// Size of the unfiltered active set.
    pub total: usize,
    #[serde(flatten)]
    pub view: ViewPayload<Listing>,
}

#[derive(Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub accepting_applications: bool,
}

#[derive(Deserialize)]
pub struct ListingStatusChange {
    pub status: ListingStatus,
    /// Tab to render afterwards; defaults to the tab the listing left.
    #[serde(default)]
    pub tab: Option<ListingStatus>,
}

#[derive(Serialize)]
pub struct ListingStatusResponse {
    pub listing: Listing,
    #[serde(flatten)]
    pub tabs: TabbedView<Listing>,
}

#[derive(Serialize)]
pub struct ApplicantsResponse {
    pub listing_id: Uuid,
    #[serde(flatten)]
    pub tabs: TabbedView<Application>,
}

/// GET /api/v1/listings
pub async fn handle_search(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let criteria = FilterCriteria::try_from(query)?;
    let active = state.store.list_active_listings().await?;
    let matched = filter_listings(&active, &criteria);
    let view = RenderState::from_items(matched, NO_SEARCH_RESULTS);
    Ok(Json(SearchResponse {
        active_filters: criteria.active_count(),
        total: active.len(),
        view: ViewPayload::render(view, None),
    }))
}

/// GET /api/v1/listings/highlights
pub async fn handle_highlights(
    State(state): State<AppState>,
) -> Result<Json<Highlights>, AppError> {
    let active = state.store.list_active_listings().await?;
    Ok(Json(highlights(&active)))
}

/// POST /api/v1/listings
pub async fn handle_create(
    State(state): State<AppState>,
    session: SessionContext,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<Listing>), AppError> {
    let employer = session.require_employer()?;
    validate_listing_draft(&draft, Utc::now().date_naive())?;
    let listing = state.store.create_listing(&employer.uid, &draft).await?;
    info!("Employer {} posted listing {}", employer.uid, listing.id);
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/v1/listings/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingDetail>, AppError> {
    let listing = state
        .store
        .get_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))?;
    let accepting_applications = listing.accepts_applications(Utc::now());
    Ok(Json(ListingDetail {
        listing,
        accepting_applications,
    }))
}

/// PUT /api/v1/listings/:id
pub async fn handle_update(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<Listing>, AppError> {
    let employer = session.require_employer()?;
    owned_listing(state.store.as_ref(), id, &employer.uid).await?;
    validate_listing_draft(&draft, Utc::now().date_naive())?;
    let listing = state.store.update_listing(id, &draft).await?;
    info!("Employer {} edited listing {id}", employer.uid);
    Ok(Json(listing))
}

/// PATCH /api/v1/listings/:id/status
///
/// Runs against the caller's own listings, so a foreign id is not found.
pub async fn handle_set_status(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(change): Json<ListingStatusChange>,
) -> Result<Json<ListingStatusResponse>, AppError> {
    let employer = session.require_employer()?;
    let owned = state.store.list_listings_by_owner(&employer.uid).await?;
    let mut listings = LocalCollection::loaded(owned);
    let previous = listings.get(id).map(|l| l.status);

    let store = &state.store;
    let listing = listings
        .set_status(id, change.status, |staged| async move {
            store.set_listing_status(staged.id, staged.status).await
        })
        .await?
        .clone();
    info!("Listing {id} is now {}", listing.status);

    let tab = change.tab.or(previous);
    Ok(Json(ListingStatusResponse {
        listing,
        tabs: TabbedView::of(&listings, tab),
    }))
}

/// GET /api/v1/listings/:id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Query(query): Query<TabQuery>,
) -> Result<Json<ApplicantsResponse>, AppError> {
    let employer = session.require_employer()?;
    let tab: Option<ApplicationStatus> = query.selected()?;
    let listing = owned_listing(state.store.as_ref(), id, &employer.uid).await?;
    let applications =
        LocalCollection::loaded(state.store.list_applications_for_listing(listing.id).await?);
    Ok(Json(ApplicantsResponse {
        listing_id: listing.id,
        tabs: TabbedView::of(&applications, tab),
    }))
}

/// POST /api/v1/listings/:id/applications
///
/// Multipart fields: `applicant_name`, `applicant_email`, `cover_letter` and an
/// optional `resume` file. Name and email fall back to the caller's profile.
pub async fn handle_apply(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let seeker = session.require_job_seeker()?;
    let mut form = MultipartForm::read(&mut multipart, &["resume"]).await?;

    let listing = state
        .store
        .get_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))?;
    if !listing.accepts_applications(Utc::now()) {
        return Err(AppError::Conflict(
            "This listing is no longer accepting applications".to_string(),
        ));
    }

    let already_applied = state
        .store
        .list_applications_by_applicant(&seeker.uid)
        .await?
        .iter()
        .any(|a| a.listing_id == id);
    if already_applied {
        return Err(crate::store::already_applied(id));
    }

    let applicant_name = form
        .text("applicant_name")
        .unwrap_or(&seeker.display_name)
        .to_string();
    let applicant_email = form
        .text("applicant_email")
        .unwrap_or(&seeker.email)
        .to_string();
    let cover_letter = form.text("cover_letter").map(str::to_string);
    validate_applicant(&applicant_name, &applicant_email, cover_letter.as_deref())?;

    let resume = form.take_file("resume");
    if let Some(file) = &resume {
        file.validate("resume", RESUME_CONTENT_TYPES, state.config.max_upload_bytes)?;
    }

    let resume_url = match resume {
        Some(file) => {
            let key = resume_key(&seeker.uid, id, &file.file_name);
            Some(state.blobs.upload(&key, file.bytes, &file.content_type).await?)
        }
        None => None,
    };

    let application = state
        .store
        .create_application(NewApplication {
            listing_id: id,
            applicant_id: seeker.uid.clone(),
            applicant_name,
            applicant_email,
            resume_url,
            cover_letter,
        })
        .await?;
    info!("{} applied to listing {id}", seeker.uid);
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/me/listings
pub async fn handle_my_listings(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<TabQuery>,
) -> Result<Json<TabbedView<Listing>>, AppError> {
    let employer = session.require_employer()?;
    let tab: Option<ListingStatus> = query.selected()?;
    let owned = state.store.list_listings_by_owner(&employer.uid).await?;
    Ok(Json(TabbedView::of(&LocalCollection::loaded(owned), tab)))
}
