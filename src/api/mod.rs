//! HTTP API module for the Overtime Report Engine.
//!
//! This module exposes record listings, summaries, selection management,
//! deletion and exports over REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PageSelectionRequest, RecordsQuery, ToggleRequest};
pub use response::{
    ApiError, DeletionResponse, RecordRow, RecordsPage, SelectionResponse, YearsResponse,
};
pub use state::{AppState, SelectionSession};
