//! HTTP request handlers for the Overtime Report Engine API.
//!
//! This module contains the handler functions for all API endpoints.
//!
//! Handlers that read the current view or write the collection hold the
//! selection session for their whole body. Writes are therefore serialized
//! with every selection change, and a deletion always acts on the view its
//! selection was made against.
//!
//! Requests that name positions (toggle, page, select-all, delete by index)
//! are refused with `409` once the collection has moved past the last
//! listing.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    Page, RecordView, available_years, daily_breakdown, day_detail, filter_stats, plan_deletion,
    summarize_year,
};
use crate::error::{EngineError, EngineResult};
use crate::export::ExportPayload;
use crate::models::{AnnualReport, DailySummary, DayDetail};
use crate::storage::RecordSnapshot;

use super::request::{
    PageSelectionRequest, RecordsQuery, ToggleRequest, parse_date, parse_month, parse_year,
};
use super::response::{
    ApiError, ApiErrorResponse, DeletionResponse, RecordsPage, SelectionResponse, YearsResponse,
};
use super::state::{AppState, SelectionSession};

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/records", get(list_records_handler))
        .route("/records/delete-selected", post(delete_selected_handler))
        .route("/records/:index", delete(delete_record_handler))
        .route("/years", get(years_handler))
        .route("/summary/:year", get(annual_summary_handler))
        .route("/summary/:year/:month", get(monthly_breakdown_handler))
        .route("/days/:date", get(day_detail_handler))
        .route(
            "/selection",
            get(get_selection_handler).delete(clear_selection_handler),
        )
        .route("/selection/toggle", post(toggle_selection_handler))
        .route("/selection/page", post(select_page_handler))
        .route("/selection/all", post(select_all_handler))
        .route("/export/csv", get(export_csv_handler))
        .route("/export/json", get(export_json_handler))
        .route("/export/summary/:year", get(export_summary_handler))
        .with_state(state)
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    ApiErrorResponse::from(error).into_response()
}

fn respond<T: Serialize>(correlation_id: Uuid, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}

fn attachment(correlation_id: Uuid, result: EngineResult<ExportPayload>) -> Response {
    match result {
        Ok(payload) => {
            info!(
                correlation_id = %correlation_id,
                filename = %payload.filename,
                bytes = payload.content.len(),
                "Export generated"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, payload.mime_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", payload.filename),
                    ),
                ],
                payload.content,
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Unwraps a JSON body, turning extractor rejections into `400` responses.
fn json_body<T: DeserializeOwned>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
}

/// Builds the view of the session's filter and binds the selection to it.
///
/// The returned flag is true when a non-empty selection was dropped because
/// the collection changed since it was made.
fn bind_session_view(
    state: &AppState,
    session: &mut SelectionSession,
) -> EngineResult<(RecordSnapshot, RecordView, bool)> {
    let (snapshot, view) = state.view(session.filter.clone())?;
    let stale = session.tracker.bind(&view);
    Ok((snapshot, view, stale))
}

/// Handler for GET /records.
///
/// The query becomes the session filter; a different filter than the
/// previous listing drops the selection.
async fn list_records_handler(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing records listing");

    let start_time = Instant::now();
    let result = list_records(&state, &query);
    if let Ok(page) = &result {
        info!(
            correlation_id = %correlation_id,
            total_records = page.total_records,
            page = page.page,
            duration_us = start_time.elapsed().as_micros(),
            "Records listed"
        );
    }
    respond(correlation_id, result)
}

fn list_records(state: &AppState, query: &RecordsQuery) -> EngineResult<RecordsPage> {
    let filter = query.to_filter()?;
    let page = Page::new(query.page_number()?, state.config().page_size());

    let mut session = state.session();
    session.filter = filter;
    let (_, view, _) = bind_session_view(state, &mut *session)?;
    session.listed_revision = Some(view.revision());

    Ok(RecordsPage::build(
        &view,
        page,
        filter_stats(view.records()),
        &session.tracker,
        state.holidays(),
    ))
}

/// Handler for GET /years.
async fn years_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing available years");

    let result = state
        .repository()
        .load_all()
        .map(|records| YearsResponse {
            years: available_years(&records),
        });
    respond(correlation_id, result)
}

/// Handler for GET /summary/:year.
async fn annual_summary_handler(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, year = %year, "Processing annual summary");

    let result = annual_report(&state, &year);
    respond(correlation_id, result)
}

fn annual_report(state: &AppState, year: &str) -> EngineResult<AnnualReport> {
    let year = parse_year(year)?;
    let records = state.repository().load_all()?;
    Ok(summarize_year(&records, year))
}

/// Handler for GET /summary/:year/:month.
async fn monthly_breakdown_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        year = %year,
        month = %month,
        "Processing daily breakdown"
    );

    let result = monthly_breakdown(&state, &year, &month);
    respond(correlation_id, result)
}

fn monthly_breakdown(state: &AppState, year: &str, month: &str) -> EngineResult<Vec<DailySummary>> {
    let year = parse_year(year)?;
    let month = match month.parse::<u32>() {
        Ok(m) => parse_month(&format!("{:04}-{:02}", year, m))?,
        Err(_) => parse_month(month)?,
    };
    let records = state.repository().load_all()?;
    Ok(daily_breakdown(&records, &month, state.holidays()))
}

/// Handler for GET /days/:date.
async fn day_detail_handler(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %date, "Processing day detail");

    let result = day_detail_for(&state, &date);
    respond(correlation_id, result)
}

fn day_detail_for(state: &AppState, date: &str) -> EngineResult<DayDetail> {
    let date = parse_date("date", date)?;
    let records = state.repository().load_all()?;
    Ok(day_detail(&records, date, state.holidays()))
}

/// Runs a selection change against the current view.
///
/// A `positional` change needs the view to still be the one last listed.
fn with_selection<F>(
    state: &AppState,
    positional: bool,
    change: F,
) -> EngineResult<SelectionResponse>
where
    F: FnOnce(&mut SelectionSession, &RecordView) -> EngineResult<()>,
{
    let mut session = state.session();
    let (_, view, stale) = bind_session_view(state, &mut *session)?;
    if positional {
        session.ensure_listed(&view)?;
    }
    change(&mut *session, &view)?;
    Ok(SelectionResponse::build(&view, &session.tracker, stale))
}

/// Handler for GET /selection.
async fn get_selection_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Reading selection");
    respond(correlation_id, with_selection(&state, false, |_, _| Ok(())))
}

/// Handler for POST /selection/toggle.
async fn toggle_selection_handler(
    State(state): State<AppState>,
    payload: Result<Json<ToggleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, index = request.index, "Toggling selection");

    let result = with_selection(&state, true, |session, view| {
        if request.index >= view.len() {
            return Err(EngineError::RecordNotFound {
                index: request.index,
                len: view.len(),
            });
        }
        session.tracker.toggle(request.index);
        Ok(())
    });
    respond(correlation_id, result)
}

/// Handler for POST /selection/page.
async fn select_page_handler(
    State(state): State<AppState>,
    payload: Result<Json<PageSelectionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        page = request.page,
        selected = request.selected,
        "Changing page selection"
    );

    let per_page = state.config().page_size();
    let result = with_selection(&state, true, |session, view| {
        let indices = Page::new(request.page, per_page).indices(view.len());
        if request.selected {
            session.tracker.select_all_visible(&indices);
        } else {
            session.tracker.deselect_all_visible(&indices);
        }
        Ok(())
    });
    respond(correlation_id, result)
}

/// Handler for POST /selection/all.
async fn select_all_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Selecting all filtered records");

    let result = with_selection(&state, true, |session, view| {
        session.tracker.select_all_filtered(view.len());
        Ok(())
    });
    respond(correlation_id, result)
}

/// Handler for DELETE /selection.
async fn clear_selection_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Clearing selection");

    let result = with_selection(&state, false, |session, _| {
        session.tracker.clear();
        Ok(())
    });
    respond(correlation_id, result)
}

/// Handler for POST /records/delete-selected.
///
/// A selection made against an older revision is cleared and nothing is
/// deleted.
async fn delete_selected_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Deleting selected records");

    let result = delete_selected(&state);
    if let Ok(outcome) = &result {
        info!(
            correlation_id = %correlation_id,
            removed = outcome.removed,
            remaining = outcome.remaining,
            stale = outcome.stale_selection_cleared,
            "Deletion completed"
        );
    }
    respond(correlation_id, result)
}

fn delete_selected(state: &AppState) -> EngineResult<DeletionResponse> {
    let mut session = state.session();
    let (snapshot, view, stale) = bind_session_view(state, &mut *session)?;

    let ids = session.tracker.selected_ids(&view).unwrap_or_default();
    if stale || ids.is_empty() {
        return Ok(DeletionResponse {
            removed: 0,
            remaining: snapshot.records.len(),
            stale_selection_cleared: stale,
        });
    }

    let plan = plan_deletion(&snapshot.records, &ids);
    let remaining = plan.remaining.len();
    state.repository().replace_all(plan.remaining)?;
    session.tracker.invalidate();

    Ok(DeletionResponse {
        removed: plan.removed,
        remaining,
        stale_selection_cleared: false,
    })
}

/// Handler for DELETE /records/:index.
///
/// The index is a position in the last listing; the collection must not have
/// changed since.
async fn delete_record_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, index, "Deleting record");

    let result = delete_record(&state, index);
    respond(correlation_id, result)
}

fn delete_record(state: &AppState, index: usize) -> EngineResult<DeletionResponse> {
    let mut session = state.session();
    let (snapshot, view, _) = bind_session_view(state, &mut *session)?;
    session.ensure_listed(&view)?;

    let record = view.get(index).ok_or(EngineError::RecordNotFound {
        index,
        len: view.len(),
    })?;

    let plan = plan_deletion(&snapshot.records, &[record.id]);
    let remaining = plan.remaining.len();
    state.repository().replace_all(plan.remaining)?;
    session.tracker.invalidate();

    Ok(DeletionResponse {
        removed: plan.removed,
        remaining,
        stale_selection_cleared: false,
    })
}

/// Handler for GET /export/csv.
async fn export_csv_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Exporting filtered records as CSV");

    let filter = state.session().filter.clone();
    let result = state.view(filter).and_then(|(_, view)| {
        ExportPayload::filtered_csv(view.records(), state.holidays(), Utc::now().date_naive())
    });
    attachment(correlation_id, result)
}

/// Handler for GET /export/json.
async fn export_json_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Exporting filtered records as JSON");

    let filter = state.session().filter.clone();
    let result = state
        .view(filter)
        .and_then(|(_, view)| ExportPayload::history_json(view.records(), view.filter(), Utc::now()));
    attachment(correlation_id, result)
}

/// Handler for GET /export/summary/:year.
async fn export_summary_handler(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, year = %year, "Exporting annual summary");

    let result = annual_report(&state, &year).and_then(|report| ExportPayload::annual_summary(&report));
    attachment(correlation_id, result)
}
