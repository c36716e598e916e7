//! In-memory repository.

use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::TimeRecord;

use super::{RecordRepository, RecordSnapshot};

const LOCATION: &str = "<memory>";

fn lock_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::StorageError {
        path: LOCATION.to_string(),
        message: format!("lock poisoned: {}", e),
    }
}

/// A repository that keeps the collection in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<RecordSnapshot>,
}

impl InMemoryRepository {
    /// Creates a repository holding `records` at revision 0.
    pub fn new(records: Vec<TimeRecord>) -> Self {
        Self {
            state: RwLock::new(RecordSnapshot {
                revision: 0,
                records,
            }),
        }
    }
}

impl RecordRepository for InMemoryRepository {
    fn load_all(&self) -> EngineResult<Vec<TimeRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.records.clone())
    }

    fn replace_all(&self, records: Vec<TimeRecord>) -> EngineResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.records = records;
        state.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        match self.state.read() {
            Ok(state) => state.revision,
            Err(poisoned) => poisoned.into_inner().revision,
        }
    }

    fn snapshot(&self) -> EngineResult<RecordSnapshot> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.clone())
    }
}
