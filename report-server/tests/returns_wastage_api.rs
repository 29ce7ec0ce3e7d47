//! End-to-end tests for the returns & wastage endpoints
//!
//! Runs the real router against an in-memory transaction log: request →
//! filter normalization → cache → aggregation → response envelope.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::Service;

use report_server::core::{Config, ServerState};
use report_server::db::DbService;
use report_server::{api, utils};

fn test_config() -> Config {
    Config {
        http_port: 0,
        database_path: ":memory:".to_string(),
        timezone: chrono_tz::UTC,
        currency_code: "AED".to_string(),
        query_timeout_ms: 120_000,
        cache_ttl_ms: 300_000,
        environment: "test".to_string(),
    }
}

async fn test_app() -> (Router, ServerState) {
    let db = DbService::in_memory().await.expect("in-memory database");
    let state = ServerState::with_db(test_config(), db);
    (api::build_app(state.clone()), state)
}

fn today() -> String {
    utils::time::format_date(chrono::Utc::now().date_naive())
}

async fn seed_line(
    pool: &SqlitePool,
    trx_type: &str,
    collection: Option<&str>,
    product: &str,
    salesman: &str,
    value: f64,
) {
    sqlx::query(
        "INSERT INTO transaction_line (trx_code, trx_date, trx_type, collection_type, \
         customer_code, customer_name, channel_name, product_code, product_name, brand, \
         category_name, return_reason, quantity, unit_price, line_amount, total_amount, \
         salesman_code, salesman_name, route_code, subarea_code, region_code) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(format!("TRX-{product}-{trx_type}"))
    .bind(today())
    .bind(trx_type)
    .bind(collection)
    .bind("C001")
    .bind("Corner Market")
    .bind("Grocery")
    .bind(product)
    .bind(format!("Product {product}"))
    .bind("Farm Fresh")
    .bind("Dairy")
    .bind(Option::<String>::None)
    .bind(1.0)
    .bind(value)
    .bind(value)
    .bind(value)
    .bind(salesman)
    .bind(format!("Salesman {salesman}"))
    .bind("R100")
    .bind("R100-A")
    .bind("DXB")
    .execute(pool)
    .await
    .expect("seed row");
}

async fn get_json(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.call(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

async fn post_json(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.call(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn empty_scope_returns_zeroed_report() {
    let (mut app, _state) = test_app().await;

    let (status, body) = get_json(&mut app, "/api/returns-wastage?range=today").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["cached"], false);
    assert_eq!(body["data"]["periodReturns"]["summary"]["return_count"], 0);
    assert_eq!(
        body["data"]["returnReasons"]["byBrand"].as_array().unwrap().len(),
        0
    );
    assert_eq!(
        body["data"]["skuReturnPercentage"]["data"]
            .as_array()
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn report_covers_seeded_returns_and_sales() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("GOOD"), "P001", "S01", 250.0).await;
    seed_line(&state.pool, "SALE", None, "P001", "S01", 1000.0).await;

    let (status, body) = get_json(&mut app, "/api/returns-wastage?range=today").await;

    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"]["periodReturns"]["summary"];
    assert_eq!(summary["good_return_value"], 250.0);
    assert_eq!(summary["sale_value"], 1000.0);
    assert_eq!(summary["return_percentage"], 25.0);
    assert_eq!(summary["net_sales_value"], 750.0);
    assert_eq!(summary["currency_code"], "AED");

    let salesman = &body["data"]["returnOnSales"]["data"][0];
    assert_eq!(salesman["salesman_code"], "S01");
    assert_eq!(salesman["return_percentage"], 25.0);
    assert_eq!(salesman["net_sales"], 750.0);

    // Metadata echoes the requested scope
    assert_eq!(body["metadata"]["dateRange"], "today");
    assert_eq!(body["metadata"]["filters"]["region"], "all");
}

#[tokio::test]
async fn repeated_request_is_served_from_cache_with_identical_data() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("BAD"), "P002", "S02", 75.0).await;

    let uri = "/api/returns-wastage?range=today";
    let (_, first) = get_json(&mut app, uri).await;
    assert_eq!(first["cached"], false);

    // A row added after the first request must NOT show up inside the TTL
    seed_line(&state.pool, "RETURN", Some("BAD"), "P003", "S02", 999.0).await;

    let (_, second) = get_json(&mut app, uri).await;
    assert_eq!(second["cached"], true);
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn different_filters_do_not_share_cache_entries() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("GOOD"), "P001", "S01", 10.0).await;

    let (_, all) = get_json(&mut app, "/api/returns-wastage?range=today").await;
    let (_, filtered) =
        get_json(&mut app, "/api/returns-wastage?range=today&salesman=S99").await;

    assert_eq!(all["cached"], false);
    assert_eq!(filtered["cached"], false);
    assert_eq!(all["data"]["periodReturns"]["summary"]["return_count"], 1);
    assert_eq!(
        filtered["data"]["periodReturns"]["summary"]["return_count"],
        0
    );
}

#[tokio::test]
async fn refresh_invalidates_the_cache() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("GOOD"), "P001", "S01", 10.0).await;

    let uri = "/api/returns-wastage?range=today";
    let (_, first) = get_json(&mut app, uri).await;
    assert_eq!(first["cached"], false);

    let (status, refresh) = post_json(&mut app, "/api/returns-wastage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refresh["success"], true);

    let (_, after) = get_json(&mut app, uri).await;
    assert_eq!(after["cached"], false);
}

#[tokio::test]
async fn dimension_filters_narrow_every_facet() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("GOOD"), "P001", "S01", 100.0).await;
    seed_line(&state.pool, "RETURN", Some("BAD"), "P002", "S02", 40.0).await;

    let (_, body) =
        get_json(&mut app, "/api/returns-wastage?range=today&salesman=S01").await;

    let summary = &body["data"]["periodReturns"]["summary"];
    assert_eq!(summary["return_count"], 1);
    assert_eq!(summary["return_value"], 100.0);
    assert_eq!(
        body["data"]["returnOnSales"]["data"].as_array().unwrap().len(),
        1
    );
    assert_eq!(
        body["data"]["goodReturnsDetail"]["data"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        body["data"]["badReturnsDetail"]["data"]
            .as_array()
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn filters_endpoint_lists_dimensions_with_returns() {
    let (mut app, state) = test_app().await;
    seed_line(&state.pool, "RETURN", Some("GOOD"), "P001", "S01", 10.0).await;
    seed_line(&state.pool, "SALE", None, "P009", "S09", 10.0).await;

    let (status, body) =
        get_json(&mut app, "/api/returns-wastage/filters?range=today").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["regions"][0]["code"], "DXB");
    assert_eq!(body["routes"][0]["code"], "R100");
    // S09 only sold, never processed a return — not offered as a filter
    let salesmen = body["salesmen"].as_array().unwrap();
    assert_eq!(salesmen.len(), 1);
    assert_eq!(salesmen[0]["code"], "S01");
}

#[tokio::test]
async fn unknown_range_token_falls_back_instead_of_failing() {
    let (mut app, _state) = test_app().await;

    let (status, body) = get_json(&mut app, "/api/returns-wastage?range=fortnight").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // lastMonth fallback: the resolved range is the full previous month
    let start = body["metadata"]["startDate"].as_str().unwrap();
    let end = body["metadata"]["endDate"].as_str().unwrap();
    assert!(start.ends_with("-01"));
    assert!(end < today().as_str());
}

#[tokio::test]
async fn data_source_failure_surfaces_structured_error() {
    let (mut app, state) = test_app().await;
    sqlx::query("DROP TABLE transaction_line")
        .execute(&state.pool)
        .await
        .expect("drop table");

    let (status, body) = get_json(&mut app, "/api/returns-wastage?range=today").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "database_error");
    assert!(body["message"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn report_sets_cache_control_headers() {
    let (mut app, _state) = test_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/returns-wastage?range=today")
        .body(Body::empty())
        .expect("request");
    let response = app.call(request).await.expect("response");

    let cache_control = response
        .headers()
        .get(http::header::CACHE_CONTROL)
        .expect("cache-control header")
        .to_str()
        .unwrap();
    assert!(cache_control.contains("s-maxage=300"));
    assert!(cache_control.contains("stale-while-revalidate=600"));
    assert!(cache_control.contains("max-age=180"));
}
