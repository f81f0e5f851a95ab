//! Status partitioning and tab view composition.
//!
//! A view is derived from one authoritative snapshot. Partitions keep the
//! snapshot order (the store returns newest first).

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::mutation::{LocalCollection, Record};
use crate::board::transitions::Lifecycle;
use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, Listing, ListingStatus};

pub const NO_SEARCH_RESULTS: &str = "No jobs found. Try adjusting your filters.";

/// A record with a lifecycle status that tabs are keyed on.
pub trait StatusTracked {
    type Status: TabStatus;

    fn status(&self) -> Self::Status;
}

pub trait TabStatus: Copy + Eq + Ord + Debug + 'static {
    /// Tab shown when the caller does not pick one.
    const DEFAULT: Self;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
    fn empty_message(&self) -> &'static str;
}

impl TabStatus for ListingStatus {
    const DEFAULT: Self = ListingStatus::Active;
    const ALL: &'static [Self] = &[
        ListingStatus::Active,
        ListingStatus::Closed,
        ListingStatus::Hired,
    ];

    fn as_str(&self) -> &'static str {
        ListingStatus::as_str(self)
    }

    fn empty_message(&self) -> &'static str {
        match self {
            ListingStatus::Active => "No active jobs found",
            ListingStatus::Closed => "No closed jobs found",
            ListingStatus::Hired => "No filled positions yet",
        }
    }
}

impl TabStatus for ApplicationStatus {
    const DEFAULT: Self = ApplicationStatus::Pending;
    const ALL: &'static [Self] = &[
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    fn as_str(&self) -> &'static str {
        ApplicationStatus::as_str(self)
    }

    fn empty_message(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "No pending applications",
            ApplicationStatus::Reviewed => "No reviewed applications",
            ApplicationStatus::Accepted => "No accepted applications",
            ApplicationStatus::Rejected => "No rejected applications",
        }
    }
}

impl StatusTracked for Listing {
    type Status = ListingStatus;

    fn status(&self) -> ListingStatus {
        self.status
    }
}

impl StatusTracked for Application {
    type Status = ApplicationStatus;

    fn status(&self) -> ApplicationStatus {
        self.status
    }
}

/// Entries whose status equals `status`, in snapshot order.
pub fn partition<T: StatusTracked>(items: &[T], status: T::Status) -> Vec<&T> {
    items.iter().filter(|item| item.status() == status).collect()
}

/// Number of entries per status. Every known status is present, zero or not.
pub fn count_by_status<T: StatusTracked>(items: &[T]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        T::Status::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for item in items {
        *counts.entry(item.status().as_str()).or_insert(0) += 1;
    }
    counts
}

/// What a view renders. Callers must be able to tell the three apart.
#[derive(Debug)]
pub enum RenderState<'a, T> {
    Loading,
    Empty { message: &'static str },
    Populated(Vec<&'a T>),
}

impl<'a, T> RenderState<'a, T> {
    pub fn from_items(items: Vec<&'a T>, empty_message: &'static str) -> Self {
        if items.is_empty() {
            RenderState::Empty {
                message: empty_message,
            }
        } else {
            RenderState::Populated(items)
        }
    }
}

/// Composes the tab view for `tab` (or the default tab) over a snapshot that
/// may not have been fetched yet.
pub fn compose<'a, T: StatusTracked>(
    snapshot: Option<&'a [T]>,
    tab: Option<T::Status>,
) -> RenderState<'a, T> {
    let Some(items) = snapshot else {
        return RenderState::Loading;
    };
    let tab = tab.unwrap_or(T::Status::DEFAULT);
    RenderState::from_items(partition(items, tab), tab.empty_message())
}

/// JSON form of a rendered view.
#[derive(Debug, Serialize)]
pub struct ViewPayload<T> {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub items: Vec<T>,
}

impl<T: Clone> ViewPayload<T> {
    pub fn render(state: RenderState<'_, T>, tab: Option<&'static str>) -> Self {
        match state {
            RenderState::Loading => ViewPayload {
                state: "loading",
                tab,
                message: None,
                items: vec![],
            },
            RenderState::Empty { message } => ViewPayload {
                state: "empty",
                tab,
                message: Some(message),
                items: vec![],
            },
            RenderState::Populated(items) => ViewPayload {
                state: "populated",
                tab,
                message: None,
                items: items.into_iter().cloned().collect(),
            },
        }
    }
}

/// A tab view together with the per-status counts shown on the tab strip.
#[derive(Debug, Serialize)]
pub struct TabbedView<T> {
    pub counts: BTreeMap<&'static str, usize>,
    pub total: usize,
    #[serde(flatten)]
    pub view: ViewPayload<T>,
}

impl<T: Record> TabbedView<T>
where
    T::Status: Lifecycle,
{
    /// Renders `tab` (or the default tab) of a request-local collection.
    pub fn of(collection: &LocalCollection<T>, tab: Option<T::Status>) -> Self {
        let selected = tab.unwrap_or(T::Status::DEFAULT);
        TabbedView {
            counts: count_by_status(collection.items().unwrap_or_default()),
            total: collection.len(),
            view: ViewPayload::render(collection.view(Some(selected)), Some(selected.as_str())),
        }
    }
}

/// `?status=` selector shared by the tab endpoints. Empty means the default tab.
#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    pub status: Option<String>,
}

impl TabQuery {
    pub fn selected<S>(&self) -> Result<Option<S>, AppError>
    where
        S: FromStr<Err = AppError>,
    {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}
