//! JSON file repository.
//!
//! Reads and writes the history document used by the time-entry workflow:
//!
//! ```text
//! {
//!   "history": [ { "date": "2024-01-06", "total_hours": 10, ... }, ... ],
//!   "festiveDays": [ { "date": "2024-01-06" } ]
//! }
//! ```
//!
//! The history is normalized once when the file is opened and served from
//! memory afterwards, so identifiers assigned during ingestion stay stable
//! for the life of the process. Top-level keys other than `history` are kept
//! as they are and written back unchanged.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::TimeRecord;

use super::{RecordRepository, RecordSnapshot, ingest_records};

#[derive(Debug, Default, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    history: Vec<Value>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    history: &'a [TimeRecord],
    #[serde(flatten)]
    other: &'a Map<String, Value>,
}

#[derive(Debug, Default)]
struct FileState {
    snapshot: RecordSnapshot,
    other: Map<String, Value>,
}

/// A repository backed by one JSON file.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    state: RwLock<FileState>,
}

impl JsonFileRepository {
    /// Opens the history file at `path`.
    ///
    /// A missing file is an empty collection; it is created on the first
    /// write. Entries that cannot be dated are skipped with a warning.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use overtime_engine::storage::{JsonFileRepository, RecordRepository};
    ///
    /// let repo = JsonFileRepository::open("./data/history.json")?;
    /// println!("{} records", repo.load_all()?.len());
    /// # Ok::<(), overtime_engine::error::EngineError>(())
    /// ```
    pub fn open<P: Into<PathBuf>>(path: P) -> EngineResult<Self> {
        let path = path.into();
        let document = read_document(&path)?;
        let outcome = ingest_records(&document.history);

        info!(
            path = %path.display(),
            records = outcome.records.len(),
            skipped = outcome.skipped,
            assigned_ids = outcome.assigned_ids,
            "Opened record store"
        );

        Ok(Self {
            path,
            state: RwLock::new(FileState {
                snapshot: RecordSnapshot {
                    revision: 0,
                    records: outcome.records,
                },
                other: document.other,
            }),
        })
    }

    /// Location of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dates listed under the document's `festiveDays` key.
    ///
    /// Entries without a valid `date` are ignored.
    pub fn festive_days(&self) -> EngineResult<Vec<NaiveDate>> {
        let state = self.state.read().map_err(|e| self.lock_error(e))?;
        let entries = match state.other.get("festiveDays") {
            Some(Value::Array(entries)) => entries,
            _ => return Ok(Vec::new()),
        };

        Ok(entries
            .iter()
            .filter_map(|entry| entry.get("date")?.as_str())
            .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .collect())
    }

    fn lock_error(&self, e: impl std::fmt::Display) -> EngineError {
        self.storage_error(format!("lock poisoned: {}", e))
    }

    fn storage_error(&self, message: String) -> EngineError {
        EngineError::StorageError {
            path: self.path.display().to_string(),
            message,
        }
    }

    /// Writes the document to a temp file, then renames it over the target.
    fn write_document(&self, records: &[TimeRecord], other: &Map<String, Value>) -> EngineResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                self.storage_error(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let file = File::create(&temp_path)
            .map_err(|e| self.storage_error(format!("failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        let document = DocumentRef {
            history: records,
            other,
        };
        serde_json::to_writer_pretty(&mut writer, &document)
            .map_err(|e| self.storage_error(format!("failed to serialize records: {}", e)))?;
        writer
            .flush()
            .map_err(|e| self.storage_error(format!("failed to flush records: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| self.storage_error(format!("failed to sync records: {}", e)))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.storage_error(format!("failed to replace file: {}", e))
        })
    }
}

fn read_document(path: &Path) -> EngineResult<StoredDocument> {
    if !path.exists() {
        warn!(path = %path.display(), "Record store not found, starting empty");
        return Ok(StoredDocument::default());
    }

    let to_error = |message: String| EngineError::StorageError {
        path: path.display().to_string(),
        message,
    };

    let file = File::open(path).map_err(|e| to_error(format!("failed to open: {}", e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| to_error(format!("failed to parse: {}", e)))
}

impl RecordRepository for JsonFileRepository {
    fn load_all(&self) -> EngineResult<Vec<TimeRecord>> {
        let state = self.state.read().map_err(|e| self.lock_error(e))?;
        Ok(state.snapshot.records.clone())
    }

    fn replace_all(&self, records: Vec<TimeRecord>) -> EngineResult<()> {
        let mut state = self.state.write().map_err(|e| self.lock_error(e))?;
        self.write_document(&records, &state.other)?;

        state.snapshot.records = records;
        state.snapshot.revision += 1;
        info!(
            path = %self.path.display(),
            records = state.snapshot.records.len(),
            revision = state.snapshot.revision,
            "Record store written"
        );
        Ok(())
    }

    fn revision(&self) -> u64 {
        match self.state.read() {
            Ok(state) => state.snapshot.revision,
            Err(poisoned) => poisoned.into_inner().snapshot.revision,
        }
    }

    fn snapshot(&self) -> EngineResult<RecordSnapshot> {
        let state = self.state.read().map_err(|e| self.lock_error(e))?;
        Ok(state.snapshot.clone())
    }
}
