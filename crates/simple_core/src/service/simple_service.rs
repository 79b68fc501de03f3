//! SimpleModel mutation service.
//!
//! # Responsibility
//! - Provide add/remove/update/get/list entry points.
//! - Publish exactly one notification after every successful store mutation.
//!
//! # Invariants
//! - The store call completes and its result is used before notifying.
//! - `ItemNotFound` and `InvalidIdentifier` short-circuit before any store
//!   mutation or notification.
//! - A failed notification does not roll back the store mutation.

use crate::logging::EventLog;
use crate::model::simple_model::{parse_simple_model_id, SimpleModel, SimpleModelId};
use crate::notify::{Notifier, NotifyError};
use crate::repo::simple_repo::{RepoError, SimpleRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for SimpleModel use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target id does not resolve to a stored model.
    ///
    /// Carries the nil UUID when `update` received a model without an id;
    /// nil is never a valid stored id.
    ItemNotFound(SimpleModelId),
    /// Wire identifier could not be parsed.
    InvalidIdentifier(String),
    Repo(RepoError),
    Notify(NotifyError),
}

impl ServiceError {
    /// Stable code used in log events and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "item_not_found",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::Repo(_) => "repo_failed",
            Self::Notify(_) => "notify_failed",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) if id.is_nil() => write!(f, "item not found: model has no id"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidIdentifier(value) => write!(f, "invalid identifier: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Notify(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Notify(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<NotifyError> for ServiceError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}

/// Orchestrates store mutations and change notifications.
pub struct SimpleService<R: SimpleRepository, N: Notifier> {
    repo: R,
    notifier: N,
    log: EventLog,
}

impl<R: SimpleRepository, N: Notifier> SimpleService<R, N> {
    pub fn new(repo: R, notifier: N, log: EventLog) -> Self {
        Self {
            repo,
            notifier,
            log,
        }
    }

    /// Persists `model` and notifies with the stored value.
    ///
    /// # Contract
    /// - `model.id` may be absent; the store assigns one.
    /// - Returns the store's value, not the input.
    pub fn add(&self, model: &SimpleModel) -> ServiceResult<SimpleModel> {
        let saved = self
            .repo
            .save(model)
            .map_err(|err| self.fail("simple_add", None, err.into()))?;
        let id = self.saved_id("simple_add", &saved)?;
        self.notify("simple_add", Some(&saved), id)?;
        self.log.event("simple_add").field("id", id).ok();
        Ok(saved)
    }

    /// Deletes the model identified by `id` and publishes a tombstone.
    ///
    /// # Errors
    /// - `InvalidIdentifier` when `id` is not a valid non-nil UUID.
    /// - `ItemNotFound` when no model has that id.
    pub fn remove(&self, id: &str) -> ServiceResult<()> {
        let id = self.parse_id("simple_remove", id)?;
        let existing = self.require("simple_remove", id)?;
        self.repo
            .delete(&existing)
            .map_err(|err| self.fail("simple_remove", Some(id), err.into()))?;
        self.notify("simple_remove", None, id)?;
        self.log.event("simple_remove").field("id", id).ok();
        Ok(())
    }

    /// Replaces an existing model and notifies with the stored value.
    ///
    /// # Errors
    /// - `ItemNotFound` when `model.id` is absent or unknown.
    pub fn update(&self, model: &SimpleModel) -> ServiceResult<SimpleModel> {
        let Some(id) = model.id else {
            return Err(self.fail(
                "simple_update",
                None,
                ServiceError::ItemNotFound(SimpleModelId::nil()),
            ));
        };
        self.require("simple_update", id)?;
        let saved = self
            .repo
            .save(model)
            .map_err(|err| self.fail("simple_update", Some(id), err.into()))?;
        self.notify("simple_update", Some(&saved), id)?;
        self.log.event("simple_update").field("id", id).ok();
        Ok(saved)
    }

    /// Looks up one model by wire identifier. No notification.
    pub fn get(&self, id: &str) -> ServiceResult<SimpleModel> {
        let id = self.parse_id("simple_get", id)?;
        self.require("simple_get", id)
    }

    /// Returns every stored model in store order. No notification.
    pub fn get_all(&self) -> ServiceResult<Vec<SimpleModel>> {
        let models = self
            .repo
            .find_all()
            .map_err(|err| self.fail("simple_list", None, err.into()))?;
        self.log
            .event("simple_list")
            .field("count", models.len())
            .ok();
        Ok(models)
    }

    fn parse_id(&self, event: &'static str, raw: &str) -> ServiceResult<SimpleModelId> {
        parse_simple_model_id(raw).ok_or_else(|| {
            self.fail(
                event,
                None,
                ServiceError::InvalidIdentifier(raw.to_string()),
            )
        })
    }

    fn require(&self, event: &'static str, id: SimpleModelId) -> ServiceResult<SimpleModel> {
        match self.repo.find_by_id(id) {
            Ok(Some(model)) => Ok(model),
            Ok(None) => Err(self.fail(event, Some(id), ServiceError::ItemNotFound(id))),
            Err(err) => Err(self.fail(event, Some(id), err.into())),
        }
    }

    fn saved_id(&self, event: &'static str, saved: &SimpleModel) -> ServiceResult<SimpleModelId> {
        saved.id.ok_or_else(|| {
            self.fail(
                event,
                None,
                ServiceError::Repo(RepoError::InvalidData(
                    "store returned a model without an id".to_string(),
                )),
            )
        })
    }

    fn notify(
        &self,
        event: &'static str,
        model: Option<&SimpleModel>,
        id: SimpleModelId,
    ) -> ServiceResult<()> {
        self.notifier
            .send_message(model, id)
            .map_err(|err| self.fail(event, Some(id), err.into()))
    }

    fn fail(
        &self,
        event: &'static str,
        id: Option<SimpleModelId>,
        err: ServiceError,
    ) -> ServiceError {
        let entry = self.log.event(event);
        let entry = match id {
            Some(id) => entry.field("id", id),
            None => entry,
        };
        entry.error(err.code(), &err);
        err
    }
}
