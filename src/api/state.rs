//! Application state for the Overtime Report Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::calculation::{RecordView, SelectionTracker};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{FilterSpec, HolidaySet};
use crate::storage::{RecordRepository, RecordSnapshot};

/// The filter most recently listed and the selection made against it.
#[derive(Debug, Default)]
pub struct SelectionSession {
    /// Filter of the current listing.
    pub filter: FilterSpec,
    /// Collection revision the current listing was built from.
    pub listed_revision: Option<u64>,
    /// Selected positions of the current listing.
    pub tracker: SelectionTracker,
}

impl SelectionSession {
    /// Fails unless `view` is the view last listed to the client.
    ///
    /// Positions sent by the client only mean something against the listing
    /// they were read from.
    pub fn ensure_listed(&self, view: &RecordView) -> EngineResult<()> {
        match self.listed_revision {
            Some(revision) if revision == view.revision() => Ok(()),
            listed => Err(EngineError::StaleView {
                listed,
                current: view.revision(),
            }),
        }
    }
}

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// configuration, the holiday calendar, the record repository and the
/// selection session.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    holidays: Arc<HolidaySet>,
    repository: Arc<dyn RecordRepository>,
    session: Arc<Mutex<SelectionSession>>,
}

impl AppState {
    /// Creates a new application state using the configured holiday calendar.
    pub fn new(config: ConfigLoader, repository: Arc<dyn RecordRepository>) -> Self {
        let holidays = config.holiday_set().clone();
        Self {
            config: Arc::new(config),
            holidays: Arc::new(holidays),
            repository,
            session: Arc::new(Mutex::new(SelectionSession::default())),
        }
    }

    /// Replaces the holiday calendar.
    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = Arc::new(holidays);
        self
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the holiday calendar.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Returns the record repository.
    pub fn repository(&self) -> &dyn RecordRepository {
        self.repository.as_ref()
    }

    /// Locks the selection session.
    ///
    /// A poisoned lock is recovered; the tracker rebinds on next use.
    pub fn session(&self) -> MutexGuard<'_, SelectionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the collection and builds its view under `filter`.
    pub fn view(&self, filter: FilterSpec) -> EngineResult<(RecordSnapshot, RecordView)> {
        let snapshot = self.repository.snapshot()?;
        let view = RecordView::build(&snapshot.records, filter, &self.holidays, snapshot.revision);
        Ok((snapshot, view))
    }
}
