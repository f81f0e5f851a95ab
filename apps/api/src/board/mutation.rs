//! Local mutation layer.
//!
//! A `LocalCollection` is the snapshot a single view renders from. Changes are
//! two-phase: the changed entry is staged, the collaborator is asked to persist
//! it, and only a confirmed change is committed to the snapshot. A failed
//! confirmation leaves the snapshot untouched.

use std::future::Future;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::board::transitions::{check_transition, Lifecycle};
use crate::board::views::{compose, RenderState, StatusTracked};
use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, Listing, ListingStatus};

pub trait Record: StatusTracked + Clone {
    fn id(&self) -> Uuid;
    fn set_status(&mut self, status: Self::Status);
}

impl Record for Listing {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_status(&mut self, status: ListingStatus) {
        self.status = status;
    }
}

impl Record for Application {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
pub struct LocalCollection<T> {
    /// `None` until the snapshot has been fetched.
    items: Option<Vec<T>>,
}

impl<T> Default for LocalCollection<T> {
    fn default() -> Self {
        Self { items: None }
    }
}

impl<T: Record> LocalCollection<T>
where
    T::Status: Lifecycle,
{
    #[cfg(test)]
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn loaded(items: Vec<T>) -> Self {
        Self { items: Some(items) }
    }

    pub fn items(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.as_ref()?.iter().find(|item| item.id() == id)
    }

    pub fn view(&self, tab: Option<T::Status>) -> RenderState<'_, T> {
        compose(self.items(), tab)
    }

    /// Moves entry `id` to `status` once `confirm` has persisted the staged entry.
    ///
    /// Re-applying the current status returns the entry without calling `confirm`.
    pub async fn set_status<F, Fut>(
        &mut self,
        id: Uuid,
        status: T::Status,
        confirm: F,
    ) -> Result<&T, AppError>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let index = self.position(id)?;
        let current = self.entry(index)?;
        let from = current.status();
        if from == status {
            debug!("{} {id} already {status}", T::Status::ENTITY);
            return self.entry(index);
        }
        check_transition(from, status)?;

        let mut staged = current.clone();
        staged.set_status(status);

        if let Err(e) = confirm(staged.clone()).await {
            warn!(
                "{} {id} status change {from} -> {status} not confirmed: {e}",
                T::Status::ENTITY
            );
            return Err(e);
        }

        let slot = self
            .items
            .as_mut()
            .and_then(|items| items.get_mut(index))
            .ok_or_else(|| not_found::<T>(id))?;
        *slot = staged;
        debug!("{} {id} committed {from} -> {status}", T::Status::ENTITY);
        self.entry(index)
    }

    /// Removes entry `id` once `confirm` has deleted it remotely.
    ///
    /// Absent ids are a no-op: `Ok(None)` and `confirm` is not called.
    pub async fn remove<F, Fut>(&mut self, id: Uuid, confirm: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let items = self.items.as_mut().ok_or_else(|| not_found::<T>(id))?;
        let Some(index) = items.iter().position(|item| item.id() == id) else {
            debug!("{} {id} already absent", T::Status::ENTITY);
            return Ok(None);
        };

        if let Err(e) = confirm(id).await {
            warn!("{} {id} removal not confirmed: {e}", T::Status::ENTITY);
            return Err(e);
        }

        Ok(Some(items.remove(index)))
    }

    fn position(&self, id: Uuid) -> Result<usize, AppError> {
        self.items
            .as_ref()
            .and_then(|items| items.iter().position(|item| item.id() == id))
            .ok_or_else(|| not_found::<T>(id))
    }

    fn entry(&self, index: usize) -> Result<&T, AppError> {
        self.items
            .as_ref()
            .and_then(|items| items.get(index))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("snapshot index {index} vanished")))
    }
}

fn not_found<T: Record>(id: Uuid) -> AppError
where
    T::Status: Lifecycle,
{
    AppError::NotFound(format!("{} {id} not found", capitalize(T::Status::ENTITY)))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}
