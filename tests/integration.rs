//! Integration tests for the Overtime Report Engine HTTP API.
//!
//! This test suite covers:
//! - Record listings with every filter dimension
//! - Filter validation errors
//! - Annual, monthly and daily summaries
//! - Selection management and its invalidation
//! - Deletion by selection and by position
//! - CSV and JSON exports

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use overtime_engine::api::{AppState, create_router};
use overtime_engine::config::ConfigLoader;
use overtime_engine::export::parse_export;
use overtime_engine::models::TimeRecord;
use overtime_engine::storage::{InMemoryRepository, RecordRepository};

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn record(date: &str, total: &str, extra: &str, night: &str, amount: &str) -> TimeRecord {
    TimeRecord::new(make_date(date))
        .with_hours(dec(total), dec(extra), dec(night))
        .with_amount(dec(amount))
}

/// 2024-01-06 is Epiphany in the default calendar and falls on a Saturday.
fn sample_records() -> Vec<TimeRecord> {
    vec![
        record("2024-01-06", "10", "2", "0", "50"),
        record("2024-01-08", "9", "1", "1", "30"),
        record("2024-01-13", "8", "0", "0", "20"),
        record("2024-01-14", "6", "6", "2", "60"),
        record("2024-02-05", "8", "0", "0", "10"),
        record("2025-03-03", "12", "4", "3", "120"),
    ]
}

fn create_test_app() -> (Router, Arc<InMemoryRepository>) {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let repository = Arc::new(InMemoryRepository::new(sample_records()));
    let state = AppState::new(config, repository.clone());
    (create_router(state), repository)
}

async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, body_bytes.to_vec())
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(router, method, uri, body).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None).await
}

fn dates(page: &Value) -> Vec<String> {
    page["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Listings and filters
// =============================================================================

#[tokio::test]
async fn test_list_all_records_sorted_descending() {
    let (router, _) = create_test_app();
    let (status, page) = get(&router, "/records").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_records"], 6);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["per_page"], 20);
    assert_eq!(
        dates(&page),
        vec![
            "2025-03-03",
            "2024-02-05",
            "2024-01-14",
            "2024-01-13",
            "2024-01-08",
            "2024-01-06"
        ]
    );
    assert_eq!(dec(page["stats"]["amount"].as_str().unwrap()), dec("290"));
    assert_eq!(page["stats"]["record_count"], 6);
}

#[tokio::test]
async fn test_list_rows_carry_derived_fields() {
    let (router, _) = create_test_app();
    let (_, page) = get(&router, "/records?month=2024-01").await;

    let last = &page["records"][3];
    assert_eq!(last["date"], "2024-01-06");
    assert_eq!(last["index"], 3);
    assert_eq!(last["day_type"], "festive");
    assert_eq!(dec(last["normal_hours"].as_str().unwrap()), dec("8"));
    assert_eq!(last["selected"], false);
}

#[tokio::test]
async fn test_year_filter() {
    let (router, _) = create_test_app();
    let (status, page) = get(&router, "/records?year=2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_records"], 5);
    assert_eq!(page["filter"]["year"], "2024");
    assert_eq!(dec(page["stats"]["amount"].as_str().unwrap()), dec("170"));
}

#[tokio::test]
async fn test_date_range_filter_is_inclusive() {
    let (router, _) = create_test_app();
    let (_, page) = get(&router, "/records?start_date=2024-01-08&end_date=2024-01-14").await;
    assert_eq!(dates(&page), vec!["2024-01-14", "2024-01-13", "2024-01-08"]);
}

#[tokio::test]
async fn test_holiday_on_saturday_is_festive_not_saturday() {
    let (router, _) = create_test_app();

    let (_, festive) = get(&router, "/records?day_type=festive").await;
    assert_eq!(dates(&festive), vec!["2024-01-06"]);

    let (_, saturday) = get(&router, "/records?day_type=saturday").await;
    assert_eq!(dates(&saturday), vec!["2024-01-13"]);
}

#[tokio::test]
async fn test_combined_filters() {
    let (router, _) = create_test_app();
    let (_, page) = get(&router, "/records?year=2024&day_type=weekday").await;
    assert_eq!(dates(&page), vec!["2024-02-05", "2024-01-08"]);
}

#[tokio::test]
async fn test_filter_without_matches_has_zero_stats() {
    let (router, _) = create_test_app();
    let (status, page) = get(&router, "/records?month=2023-07").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_records"], 0);
    assert_eq!(page["total_pages"], 0);
    assert_eq!(dec(page["stats"]["amount"].as_str().unwrap()), Decimal::ZERO);
    assert_eq!(
        dec(page["stats"]["avg_amount_per_day"].as_str().unwrap()),
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let (router, _) = create_test_app();
    let (status, page) = get(&router, "/records?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["page"], 2);
    assert!(page["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_filters_return_400() {
    let (router, _) = create_test_app();

    for uri in [
        "/records?month=2024-13",
        "/records?year=24",
        "/records?start_date=2024/01/01",
        "/records?day_type=monday",
        "/records?page=0",
    ] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body["code"], "INVALID_FILTER", "uri: {}", uri);
    }
}

// =============================================================================
// Summaries
// =============================================================================

#[tokio::test]
async fn test_available_years() {
    let (router, _) = create_test_app();
    let (status, body) = get(&router, "/years").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"years": [2024, 2025]}));
}

#[tokio::test]
async fn test_annual_summary() {
    let (router, _) = create_test_app();
    let (status, report) = get(&router, "/summary/2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);
    assert_eq!(report["months"].as_array().unwrap().len(), 12);
    assert_eq!(dec(report["months"][0]["amount"].as_str().unwrap()), dec("160"));
    assert_eq!(report["months"][0]["days_worked"], 4);
    assert_eq!(dec(report["months"][1]["amount"].as_str().unwrap()), dec("10"));
    assert_eq!(dec(report["months"][11]["amount"].as_str().unwrap()), Decimal::ZERO);
    assert_eq!(report["totals"]["shift_count"], 5);
    assert_eq!(
        dec(report["avg_amount_per_shift"].as_str().unwrap()),
        dec("34")
    );
}

#[tokio::test]
async fn test_annual_summary_for_empty_year_is_zeroed() {
    let (router, _) = create_test_app();
    let (status, report) = get(&router, "/summary/2019").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["months"].as_array().unwrap().len(), 12);
    assert_eq!(dec(report["totals"]["amount"].as_str().unwrap()), Decimal::ZERO);
}

#[tokio::test]
async fn test_annual_summary_rejects_bad_year() {
    let (router, _) = create_test_app();
    let (status, body) = get(&router, "/summary/twenty").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FILTER");
}

#[tokio::test]
async fn test_monthly_daily_breakdown() {
    let (router, _) = create_test_app();
    let (status, days) = get(&router, "/summary/2024/1").await;

    assert_eq!(status, StatusCode::OK);
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 4);
    assert_eq!(days[0]["date"], "2024-01-06");
    assert_eq!(days[0]["day_type"], "festive");
    assert_eq!(days[3]["day_type"], "sunday");

    let (_, padded) = get(&router, "/summary/2024/01").await;
    assert_eq!(padded.as_array().unwrap().len(), 4);

    let (status, _) = get(&router, "/summary/2024/13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_day_detail() {
    let (router, _) = create_test_app();
    let (status, detail) = get(&router, "/days/2024-01-08").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["summary"]["shift_count"], 1);
    assert_eq!(detail["summary"]["day_type"], "weekday");
    assert_eq!(detail["shifts"][0]["date"], "2024-01-08");

    let (status, _) = get(&router, "/days/08-01-2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Selection and deletion
// =============================================================================

#[tokio::test]
async fn test_toggle_and_read_selection() {
    let (router, _) = create_test_app();
    get(&router, "/records?year=2024").await;

    let (status, selection) =
        send(&router, "POST", "/selection/toggle", Some(json!({"index": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selection["selected"], json!([1]));
    assert_eq!(selection["total_filtered"], 5);
    assert_eq!(selection["all_filtered_selected"], false);

    let (_, page) = get(&router, "/records?year=2024").await;
    assert_eq!(page["records"][1]["selected"], true);
}

#[tokio::test]
async fn test_toggle_out_of_range_returns_404() {
    let (router, _) = create_test_app();
    get(&router, "/records?year=2025").await;

    let (status, body) =
        send(&router, "POST", "/selection/toggle", Some(json!({"index": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_toggle_without_index_is_validation_error() {
    let (router, _) = create_test_app();
    let (status, body) = send(&router, "POST", "/selection/toggle", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_select_all_and_clear() {
    let (router, _) = create_test_app();
    get(&router, "/records?month=2024-01").await;

    let (_, selection) = send(&router, "POST", "/selection/all", None).await;
    assert_eq!(selection["selected_count"], 4);
    assert_eq!(selection["all_filtered_selected"], true);

    let (_, selection) = send(&router, "DELETE", "/selection", None).await;
    assert_eq!(selection["selected_count"], 0);
    assert_eq!(selection["all_filtered_selected"], false);
}

#[tokio::test]
async fn test_select_and_deselect_page() {
    let (router, _) = create_test_app();
    get(&router, "/records").await;

    let (_, selection) =
        send(&router, "POST", "/selection/page", Some(json!({"page": 1}))).await;
    assert_eq!(selection["selected_count"], 6);

    let (_, selection) = send(
        &router,
        "POST",
        "/selection/page",
        Some(json!({"page": 1, "selected": false})),
    )
    .await;
    assert_eq!(selection["selected_count"], 0);
}

#[tokio::test]
async fn test_select_all_on_empty_view_is_not_all_selected() {
    let (router, _) = create_test_app();
    get(&router, "/records?year=2019").await;

    let (_, selection) = send(&router, "POST", "/selection/all", None).await;
    assert_eq!(selection["selected_count"], 0);
    assert_eq!(selection["all_filtered_selected"], false);
}

#[tokio::test]
async fn test_filter_change_clears_selection() {
    let (router, _) = create_test_app();
    get(&router, "/records?year=2024").await;
    send(&router, "POST", "/selection/toggle", Some(json!({"index": 0}))).await;

    get(&router, "/records?year=2025").await;
    let (_, selection) = get(&router, "/selection").await;
    assert_eq!(selection["selected_count"], 0);
    assert_eq!(selection["filter"]["year"], "2025");
}

#[tokio::test]
async fn test_delete_selected_removes_exactly_the_selection() {
    let (router, repository) = create_test_app();
    get(&router, "/records?year=2024").await;
    send(&router, "POST", "/selection/toggle", Some(json!({"index": 0}))).await;
    send(&router, "POST", "/selection/toggle", Some(json!({"index": 4}))).await;

    let (status, outcome) = send(&router, "POST", "/records/delete-selected", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 2);
    assert_eq!(outcome["remaining"], 4);
    assert_eq!(outcome["stale_selection_cleared"], false);

    let remaining: Vec<String> = repository
        .load_all()
        .unwrap()
        .iter()
        .map(|r| r.date_key())
        .collect();
    assert_eq!(
        remaining,
        vec!["2024-01-08", "2024-01-13", "2024-01-14", "2025-03-03"]
    );

    let (_, selection) = get(&router, "/selection").await;
    assert_eq!(selection["selected_count"], 0);
}

#[tokio::test]
async fn test_delete_selected_distinguishes_identical_records() {
    let config = ConfigLoader::load("./config/default").unwrap();
    let first = record("2024-03-04", "8", "0", "0", "10");
    let twin = record("2024-03-04", "8", "0", "0", "10");
    let repository = Arc::new(InMemoryRepository::new(vec![first.clone(), twin]));
    let router = create_router(AppState::new(config, repository.clone()));

    get(&router, "/records").await;
    send(&router, "POST", "/selection/toggle", Some(json!({"index": 1}))).await;
    let (_, outcome) = send(&router, "POST", "/records/delete-selected", None).await;

    assert_eq!(outcome["removed"], 1);
    assert_eq!(repository.load_all().unwrap(), vec![first]);
}

#[tokio::test]
async fn test_stale_selection_is_cleared_not_deleted() {
    let (router, repository) = create_test_app();
    get(&router, "/records").await;
    send(&router, "POST", "/selection/all", None).await;

    // Another writer changes the collection.
    repository.replace_all(repository.load_all().unwrap()).unwrap();

    let (status, outcome) = send(&router, "POST", "/records/delete-selected", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 0);
    assert_eq!(outcome["stale_selection_cleared"], true);
    assert_eq!(repository.load_all().unwrap().len(), 6);
}

#[tokio::test]
async fn test_delete_selected_with_empty_selection_is_noop() {
    let (router, repository) = create_test_app();
    let (_, outcome) = send(&router, "POST", "/records/delete-selected", None).await;
    assert_eq!(outcome["removed"], 0);
    assert_eq!(repository.revision(), 0);
}

#[tokio::test]
async fn test_delete_single_record_by_position() {
    let (router, repository) = create_test_app();
    get(&router, "/records?day_type=sunday").await;

    let (status, outcome) = send(&router, "DELETE", "/records/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 1);

    let records = repository.load_all().unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.date_key() != "2024-01-14"));

    // The listing no longer matches the collection until it is fetched again.
    let (status, body) = send(&router, "DELETE", "/records/0", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STALE_VIEW");

    let (_, page) = get(&router, "/records?day_type=sunday").await;
    assert_eq!(page["total_records"], 0);
    let (status, body) = send(&router, "DELETE", "/records/0", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_by_position_after_external_write_is_refused() {
    let (router, repository) = create_test_app();
    let (_, page) = get(&router, "/records").await;
    assert_eq!(page["records"][1]["date"], "2024-02-05");

    // Another writer removes the first listed record.
    let remaining: Vec<TimeRecord> = repository
        .load_all()
        .unwrap()
        .into_iter()
        .filter(|r| r.date_key() != "2025-03-03")
        .collect();
    repository.replace_all(remaining).unwrap();

    let (status, body) = send(&router, "DELETE", "/records/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STALE_VIEW");
    assert_eq!(repository.load_all().unwrap().len(), 5);

    let (_, page) = get(&router, "/records").await;
    assert_eq!(page["records"][0]["date"], "2024-02-05");
    let (status, outcome) = send(&router, "DELETE", "/records/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 1);
    assert!(
        repository
            .load_all()
            .unwrap()
            .iter()
            .all(|r| r.date_key() != "2024-02-05")
    );
}

#[tokio::test]
async fn test_positional_selection_after_external_write_is_refused() {
    let (router, repository) = create_test_app();
    get(&router, "/records").await;
    repository.replace_all(repository.load_all().unwrap()).unwrap();

    for (uri, body) in [
        ("/selection/toggle", Some(json!({"index": 0}))),
        ("/selection/page", Some(json!({"page": 1}))),
        ("/selection/all", None),
    ] {
        let (status, error) = send(&router, "POST", uri, body).await;
        assert_eq!(status, StatusCode::CONFLICT, "{}", uri);
        assert_eq!(error["code"], "STALE_VIEW");
    }

    let (status, selection) = get(&router, "/selection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selection["selected_count"], 0);
}

#[tokio::test]
async fn test_delete_by_position_without_listing_is_refused() {
    let (router, repository) = create_test_app();
    let (status, body) = send(&router, "DELETE", "/records/0", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STALE_VIEW");
    assert_eq!(repository.revision(), 0);
}

// =============================================================================
// Exports
// =============================================================================

#[tokio::test]
async fn test_export_csv_uses_current_filter() {
    let (router, _) = create_test_app();
    get(&router, "/records?month=2024-01&day_type=saturday").await;

    let (status, headers, body) = send_raw(&router, "GET", "/export/csv", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"overtime_filtered_"));
    assert!(disposition.ends_with(".csv\""));

    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "date,startTime,endTime,totalHours,normalHours,extraHours,nightHours,amount,dayTypeLabel"
    );
    assert_eq!(
        lines[1],
        r#""2024-01-13","","","8.00","8.00","0.00","0.00","20.00","Saturday""#
    );
}

#[tokio::test]
async fn test_export_json_round_trips_view() {
    let (router, _) = create_test_app();
    let (_, page) = get(&router, "/records?year=2024&day_type=festive").await;

    let (status, headers, body) = send_raw(&router, "GET", "/export/json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");

    let export = parse_export(std::str::from_utf8(&body).unwrap()).unwrap();
    assert_eq!(export.metadata.total_records, 1);
    assert_eq!(export.metadata.filters.year.as_deref(), Some("2024"));
    assert_eq!(export.data.len(), 1);
    assert_eq!(export.data[0].id.to_string(), page["records"][0]["id"]);
    assert_eq!(export.data[0].amount, dec("50"));
}

#[tokio::test]
async fn test_export_annual_summary() {
    let (router, _) = create_test_app();
    let (status, headers, body) = send_raw(&router, "GET", "/export/summary/2024", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"overtime_summary_2024.csv\""
    );
    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(
        lines[0],
        "month,daysWorked,totalHours,extraHours,nightHours,amount,avgPerDay"
    );
    assert_eq!(
        lines[1],
        r#""January","4","33.00","9.00","3.00","160.00","40.00""#
    );
}
