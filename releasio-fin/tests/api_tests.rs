//! Integration tests for releasio-fin API endpoints
//!
//! Tests cover:
//! - Monthly payout summary derivation (grouping, sorting, status)
//! - Per-collaborator breakdowns
//! - Payout distribution ledger (one run per month)
//! - Master split editing with validation
//! - Royalty ingestion and catalog editing
//! - Health endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use uuid::Uuid;

use releasio_fin::{build_router, AppState};

/// Test helper: Create app over a fresh in-memory database
async fn setup_app() -> Router {
    let pool = releasio_common::db::init_memory()
        .await
        .expect("Should open in-memory database");
    build_router(AppState::new(pool))
}

/// Test helper: Create request with no body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Create request with a JSON body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Create a collaborator, returning its id
async fn create_collaborator(app: &Router, name: &str, role: &str) -> Uuid {
    let request = json_request(
        "POST",
        "/api/collaborators",
        json!({
            "name": name,
            "role": role,
            "email": format!("{}@example.com", name.to_lowercase()),
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

/// Test helper: Create a release, returning its id
async fn create_release(app: &Router, artist: &str, title: &str) -> Uuid {
    let request = json_request(
        "POST",
        "/api/releases",
        json!({ "artist": artist, "title": title, "release_date": "2024-01-19" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

/// Test helper: Append royalty entries to a release
async fn append_royalties(app: &Router, release_id: Uuid, entries: Value) {
    let request = json_request(
        "POST",
        &format!("/api/releases/{}/royalties", release_id),
        json!({ "entries": entries }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test helper: Replace a release's master splits
async fn put_splits(app: &Router, release_id: Uuid, splits: Value) -> StatusCode {
    let request = json_request(
        "PUT",
        &format!("/api/releases/{}/splits", release_id),
        json!({ "splits": splits }),
    );
    app.clone().oneshot(request).await.unwrap().status()
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "releasio-fin");
    assert!(body["version"].is_string());
}

// =============================================================================
// Summary Derivation Tests
// =============================================================================

#[tokio::test]
async fn test_summaries_empty_catalog() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/summaries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_summaries_group_sort_and_split() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let mira = create_collaborator(&app, "Mira", "Featured Artist").await;

    let signal = create_release(&app, "Nova Hart", "Midnight Signal").await;
    let tides = create_release(&app, "Nova Hart", "Glass Tides").await;

    // Splits on one release only; the other passes through to the artist
    assert_eq!(
        put_splits(
            &app,
            signal,
            json!([
                { "collaborator_id": kaito, "percentage": 30.0 },
                { "collaborator_id": mira, "percentage": 20.0 },
            ]),
        )
        .await,
        StatusCode::OK
    );

    append_royalties(
        &app,
        signal,
        json!([
            { "month": "2024-03", "earnings": 10000 },
            { "month": "2024-01", "earnings": 2000 },
        ]),
    )
    .await;
    append_royalties(&app, tides, json!([{ "month": "2024-03", "earnings": 5000 }])).await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/summaries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);

    // Months descending
    assert_eq!(summaries[0]["month"], "2024-03");
    assert_eq!(summaries[1]["month"], "2024-01");

    // Shared month sums across releases; payouts only from the split release
    assert_eq!(summaries[0]["total_earnings"], 15000);
    assert_eq!(summaries[0]["total_payouts"].as_f64().unwrap(), 5000.0);
    assert_eq!(summaries[0]["artist_net"].as_f64().unwrap(), 10000.0);
    assert_eq!(summaries[0]["payouts"].as_array().unwrap().len(), 2);

    assert_eq!(summaries[1]["total_earnings"], 2000);
    assert_eq!(summaries[1]["total_payouts"].as_f64().unwrap(), 1000.0);

    // Nothing distributed yet
    assert_eq!(summaries[0]["status"], "Pending");
    assert!(summaries[0].get("paid_date").is_none());
}

#[tokio::test]
async fn test_duplicate_month_entries_accumulate() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;
    assert_eq!(
        put_splits(&app, release, json!([{ "collaborator_id": kaito, "percentage": 10.0 }])).await,
        StatusCode::OK
    );

    append_royalties(
        &app,
        release,
        json!([
            { "month": "2024-02", "earnings": 500 },
            { "month": "2024-02", "earnings": 700 },
        ]),
    )
    .await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/summaries/2024-02"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["total_earnings"], 1200);
    // One payout per (entry, split) pair
    assert_eq!(body["payouts"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_payouts"].as_f64().unwrap(), 120.0);
}

#[tokio::test]
async fn test_summary_unknown_month_is_404() {
    let app = setup_app().await;

    let response = app
        .oneshot(test_request("GET", "/api/financials/summaries/2031-12"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("2031-12"));
}

#[tokio::test]
async fn test_overview_sums_all_months() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;
    assert_eq!(
        put_splits(&app, release, json!([{ "collaborator_id": kaito, "percentage": 50.0 }])).await,
        StatusCode::OK
    );
    append_royalties(
        &app,
        release,
        json!([
            { "month": "2024-01", "earnings": 1000 },
            { "month": "2024-02", "earnings": 3000 },
        ]),
    )
    .await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/overview"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["total_earnings"], 4000);
    assert_eq!(body["total_payouts"].as_f64().unwrap(), 2000.0);
    assert_eq!(body["artist_net"].as_f64().unwrap(), 2000.0);
}

// =============================================================================
// Collaborator Breakdown Tests
// =============================================================================

#[tokio::test]
async fn test_collaborator_breakdown() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/settings/artist", json!({ "name": "Nova Hart" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let signal = create_release(&app, "Nova Hart", "Midnight Signal").await;
    let tides = create_release(&app, "Nova Hart", "Glass Tides").await;

    assert_eq!(
        put_splits(&app, signal, json!([{ "collaborator_id": kaito, "percentage": 30.0 }])).await,
        StatusCode::OK
    );
    assert_eq!(
        put_splits(&app, tides, json!([{ "collaborator_id": kaito, "percentage": 10.0 }])).await,
        StatusCode::OK
    );

    append_royalties(&app, signal, json!([{ "month": "2024-05", "earnings": 10000 }])).await;
    append_royalties(&app, tides, json!([{ "month": "2024-05", "earnings": 2000 }])).await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/summaries/2024-05/collaborators"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["month"], "2024-05");
    assert_eq!(body["artist_name"], "Nova Hart");
    assert_eq!(body["total_earnings"], 12000);
    // 12000 - (3000 + 200)
    assert_eq!(body["artist_net"].as_f64().unwrap(), 8800.0);

    let shares = body["shares"].as_array().unwrap();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0]["collaborator_id"], kaito.to_string());
    assert_eq!(shares[0]["name"], "Kaito");
    assert_eq!(shares[0]["role"], "Producer");
    assert_eq!(shares[0]["amount"].as_f64().unwrap(), 3200.0);

    let details: Vec<&str> = shares[0]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(
        details,
        vec![
            "$30.00 from \"Midnight Signal\" (30%)",
            "$2.00 from \"Glass Tides\" (10%)",
        ]
    );
}

// =============================================================================
// Payout Distribution Tests
// =============================================================================

#[tokio::test]
async fn test_distribute_records_run_once() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;
    assert_eq!(
        put_splits(&app, release, json!([{ "collaborator_id": kaito, "percentage": 25.0 }])).await,
        StatusCode::OK
    );
    append_royalties(&app, release, json!([{ "month": "2024-06", "earnings": 8000 }])).await;

    // First distribution succeeds and captures the payout total
    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/financials/payouts/2024-06/distribute"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["month"], "2024-06");
    assert_eq!(body["total_payouts"].as_f64().unwrap(), 2000.0);
    assert!(body["paid_date"].is_string());

    // Second distribution for the same month conflicts
    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/financials/payouts/2024-06/distribute"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The summary now reports the month as paid
    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/summaries/2024-06"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "Paid");
    assert!(body["paid_date"].is_string());

    // And the ledger lists the run
    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/financials/payouts"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let runs = body.as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["month"], "2024-06");
}

#[tokio::test]
async fn test_distribute_unknown_month_is_404() {
    let app = setup_app().await;

    let response = app
        .oneshot(test_request("POST", "/api/financials/payouts/2024-06/distribute"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Master Split Editing Tests
// =============================================================================

#[tokio::test]
async fn test_splits_rejected_over_hundred_percent() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let mira = create_collaborator(&app, "Mira", "Remixer").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;

    let status = put_splits(
        &app,
        release,
        json!([
            { "collaborator_id": kaito, "percentage": 60.0 },
            { "collaborator_id": mira, "percentage": 50.0 },
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_splits_rejected_for_unknown_collaborator() {
    let app = setup_app().await;

    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;
    let status = put_splits(
        &app,
        release,
        json!([{ "collaborator_id": Uuid::new_v4(), "percentage": 10.0 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_splits_rejected_negative_percentage() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;

    let status = put_splits(
        &app,
        release,
        json!([{ "collaborator_id": kaito, "percentage": -5.0 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_splits_unknown_release_is_404() {
    let app = setup_app().await;

    let status = put_splits(&app, Uuid::new_v4(), json!([])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_splits_replace_wholesale() {
    let app = setup_app().await;

    let kaito = create_collaborator(&app, "Kaito", "Producer").await;
    let mira = create_collaborator(&app, "Mira", "Session Musician").await;
    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;

    assert_eq!(
        put_splits(&app, release, json!([{ "collaborator_id": kaito, "percentage": 40.0 }])).await,
        StatusCode::OK
    );
    assert_eq!(
        put_splits(&app, release, json!([{ "collaborator_id": mira, "percentage": 15.0 }])).await,
        StatusCode::OK
    );

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/releases"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let splits = body[0]["master_splits"].as_array().unwrap();
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0]["collaborator_id"], mira.to_string());
    assert_eq!(splits[0]["percentage"].as_f64().unwrap(), 15.0);
}

// =============================================================================
// Catalog Editing Tests
// =============================================================================

#[tokio::test]
async fn test_create_release_rejects_blank_title() {
    let app = setup_app().await;

    let request = json_request(
        "POST",
        "/api/releases",
        json!({ "artist": "Nova Hart", "title": "   " }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_append_royalties_rejects_bad_month_key() {
    let app = setup_app().await;

    let release = create_release(&app, "Nova Hart", "Midnight Signal").await;
    let request = json_request(
        "POST",
        &format!("/api/releases/{}/royalties", release),
        json!({ "entries": [{ "month": "2024-13", "earnings": 100 }] }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = json_request(
        "POST",
        &format!("/api/releases/{}/royalties", release),
        json!({ "entries": [] }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_append_royalties_unknown_release_is_404() {
    let app = setup_app().await;

    let request = json_request(
        "POST",
        &format!("/api/releases/{}/royalties", Uuid::new_v4()),
        json!({ "entries": [{ "month": "2024-01", "earnings": 100 }] }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_collaborators() {
    let app = setup_app().await;

    create_collaborator(&app, "Mira", "Featured Artist").await;
    create_collaborator(&app, "Kaito", "Producer").await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/collaborators"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    let collaborators = body.as_array().unwrap();
    assert_eq!(collaborators.len(), 2);
    // Ordered by name
    assert_eq!(collaborators[0]["name"], "Kaito");
    assert_eq!(collaborators[1]["name"], "Mira");
    assert_eq!(collaborators[1]["role"], "Featured Artist");
}

// =============================================================================
// Settings Tests
// =============================================================================

#[tokio::test]
async fn test_artist_settings_round_trip() {
    let app = setup_app().await;

    // Seeded default until configured
    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/settings/artist"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Primary Artist");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/settings/artist", json!({ "name": "Nova Hart" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/settings/artist"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Nova Hart");

    // Blank names are rejected
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/settings/artist", json!({ "name": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
