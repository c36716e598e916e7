//! Record storage.
//!
//! The reporting core works on in-memory snapshots; a [`RecordRepository`]
//! owns the collection between requests. Every write replaces the whole list
//! and bumps the repository's revision, which is what selections are scoped
//! to.

mod ingest;
mod json_file;
mod memory;

pub use ingest::{IngestOutcome, SkipReason, ingest_records, normalize_record};
pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;

use crate::error::EngineResult;
use crate::models::TimeRecord;

/// A collection of records together with the revision it was read at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    /// Revision of the collection when it was read.
    pub revision: u64,
    /// The records, in stored order.
    pub records: Vec<TimeRecord>,
}

/// Storage backend for the record collection.
///
/// Implementations must be safe to share across request handlers.
pub trait RecordRepository: Send + Sync {
    /// Returns every stored record, in stored order.
    fn load_all(&self) -> EngineResult<Vec<TimeRecord>>;

    /// Replaces the stored collection and bumps the revision.
    fn replace_all(&self, records: Vec<TimeRecord>) -> EngineResult<()>;

    /// Monotonic counter of writes.
    fn revision(&self) -> u64;

    /// Reads records and revision consistently.
    fn snapshot(&self) -> EngineResult<RecordSnapshot>;
}
