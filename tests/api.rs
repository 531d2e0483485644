//! End-to-end tests for the HTTP API.

use axum::extract::Path;
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

mod common;
use common::{empty_request, json_request, quiet_config, send, test_app, CLEAN, OTHER, THIRD};

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(&quiet_config());
    let (status, _, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_check_unknown_address_with_sources_off() {
    let (app, _) = test_app(&quiet_config());

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/check", &json!({"address": CLEAN})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["address"], CLEAN);
    assert_eq!(body["risk"], json!({"score": 40, "label": "Medium"}));
    assert_eq!(body["details"]["local"]["matches"], json!([]));
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.contains("Helius: off"));
    assert!(summary.contains("GoPlus: off"));
}

#[tokio::test]
async fn test_every_check_appends_matching_history() {
    let (app, _) = test_app(&quiet_config());

    send(
        &app,
        json_request(Method::POST, "/api/blacklist", &json!({"address": OTHER, "reason": "drainer"})),
    )
    .await;

    let mut responses = Vec::new();
    for address in [CLEAN, OTHER] {
        let (_, _, body) = send(
            &app,
            json_request(Method::POST, "/api/check", &json!({"address": address})),
        )
        .await;
        responses.push(body);
    }

    let (_, _, history) = send(&app, empty_request(Method::GET, "/api/history")).await;
    let items = history["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    // Newest first.
    for (item, response) in items.iter().zip(responses.iter().rev()) {
        assert_eq!(item["address"], response["address"]);
        assert_eq!(item["risk_score"], response["risk"]["score"]);
        assert_eq!(item["risk_label"], response["risk"]["label"]);
        assert_eq!(item["summary"], response["summary"]);
        assert_eq!(item["details"], response["details"]);
        assert_eq!(item["errors"], json!([]));
    }
    assert_eq!(items[0]["risk_score"], 90);
    assert_eq!(items[0]["risk_label"], "High");
}

#[tokio::test]
async fn test_check_rejects_invalid_address_without_writing() {
    let (app, _) = test_app(&quiet_config());

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/check", &json!({"address": "0xdeadbeef"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"ok": false, "error": "Invalid Solana address"}));

    let (_, _, history) = send(&app, empty_request(Method::GET, "/api/history")).await;
    assert_eq!(history["items"], json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = test_app(&quiet_config());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/check")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());

    let (status, _, _) = send(&app, json_request(Method::POST, "/api/check", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reputation_without_credentials_is_client_error() {
    let (app, _) = test_app(&quiet_config());

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/check", &json!({"address": CLEAN, "useGoPlus": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("GoPlus"));

    let (_, _, history) = send(&app, empty_request(Method::GET, "/api/history")).await;
    assert_eq!(history["items"], json!([]));
}

#[tokio::test]
async fn test_blacklist_upsert_never_duplicates() {
    let (app, _) = test_app(&quiet_config());

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/blacklist", &json!({"address": CLEAN})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    send(
        &app,
        json_request(
            Method::POST,
            "/api/blacklist",
            &json!({"address": CLEAN, "reason": "phishing", "source": "report"}),
        ),
    )
    .await;

    let (_, _, list) = send(&app, empty_request(Method::GET, "/api/blacklist")).await;
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["address"], CLEAN);
    assert_eq!(items[0]["reason"], "phishing");
    assert_eq!(items[0]["source"], "report");
    assert_eq!(list["limit"], 500);
    assert_eq!(list["offset"], 0);
}

#[tokio::test]
async fn test_manual_upsert_defaults() {
    let (app, _) = test_app(&quiet_config());
    send(&app, json_request(Method::POST, "/api/blacklist", &json!({"address": CLEAN}))).await;

    let (_, _, list) = send(&app, empty_request(Method::GET, "/api/blacklist")).await;
    assert_eq!(list["items"][0]["reason"], "");
    assert_eq!(list["items"][0]["source"], "manual");

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/blacklist", &json!({"address": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"ok": false, "error": "Invalid address"}));
}

#[tokio::test]
async fn test_import_drops_malformed_rows() {
    let (app, _) = test_app(&quiet_config());

    let rows = json!([
        {"address": CLEAN, "reason": "scam"},
        {"pubkey": format!("  {OTHER} ")},
        [THIRD],
        {"address": "not-base58-0OIl"},
        42
    ]);
    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/blacklist/import", &json!({"addresses": rows})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "imported": 3}));

    let (_, _, list) = send(&app, empty_request(Method::GET, "/api/blacklist")).await;
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i["source"] == "import"));
}

#[tokio::test]
async fn test_import_requires_array() {
    let (app, _) = test_app(&quiet_config());
    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/blacklist/import", &json!({"addresses": CLEAN})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"ok": false, "error": "addresses[] required"}));
}

#[tokio::test]
async fn test_delete_entry() {
    let (app, _) = test_app(&quiet_config());
    send(&app, json_request(Method::POST, "/api/blacklist", &json!({"address": CLEAN}))).await;

    let uri = format!("/api/blacklist/{}", CLEAN);
    let (status, _, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "removed": true}));

    let (_, _, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(body["removed"], false);

    let (status, _, _) = send(&app, empty_request(Method::DELETE, "/api/blacklist/bogus")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_caps_and_offsets() {
    let (app, _) = test_app(&quiet_config());
    for address in [CLEAN, OTHER, THIRD] {
        send(&app, json_request(Method::POST, "/api/blacklist", &json!({"address": address}))).await;
    }

    let (_, _, page) = send(&app, empty_request(Method::GET, "/api/blacklist?limit=2&offset=1")).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["offset"], 1);

    let (_, _, page) = send(&app, empty_request(Method::GET, "/api/blacklist?limit=99999")).await;
    assert_eq!(page["limit"], 2000);

    let (_, _, page) = send(&app, empty_request(Method::GET, "/api/history?limit=99999&offset=-5")).await;
    assert_eq!(page["limit"], 500);
    assert_eq!(page["offset"], 0);

    let (_, _, page) = send(&app, empty_request(Method::GET, "/api/history")).await;
    assert_eq!(page["limit"], 100);
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let (app, _) = test_app(&quiet_config());

    let (_, headers, _) = send(&app, empty_request(Method::GET, "/health")).await;
    let generated = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "trace-me");
}

#[tokio::test]
async fn test_security_headers_and_extension_cors() {
    let (app, _) = test_app(&quiet_config());

    let request = Request::builder()
        .uri("/health")
        .header("origin", "chrome-extension://abcdefghijklmnop")
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "chrome-extension://abcdefghijklmnop"
    );

    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://evil.example")
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_rate_limit_applies_to_api_only() {
    let mut config = quiet_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_window = 2;
    let (app, _) = test_app(&config);

    let limited = |ip: &str| {
        Request::builder()
            .uri("/api/history")
            .header("x-forwarded-for", ip)
            .body(axum::body::Body::empty())
            .unwrap()
    };

    assert_eq!(send(&app, limited("198.51.100.1")).await.0, StatusCode::OK);
    assert_eq!(send(&app, limited("198.51.100.1")).await.0, StatusCode::OK);
    let (status, _, body) = send(&app, limited("198.51.100.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["ok"], false);

    // Other clients and non-API routes are unaffected.
    assert_eq!(send(&app, limited("198.51.100.2")).await.0, StatusCode::OK);
    for _ in 0..5 {
        assert_eq!(send(&app, empty_request(Method::GET, "/health")).await.0, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_degraded_activity_source_still_answers() {
    let helius = Router::new()
        .route(
            "/v0/addresses/{address}/transactions",
            get(|Path(_): Path<String>| async {
                Json(json!([{"signature": "s1"}, {"signature": "s2"}]))
            }),
        )
        .route(
            "/v0/addresses/{address}/balances",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base_url = common::spawn_upstream(helius).await;

    let mut config = quiet_config();
    config.helius.api_key = "test-key".to_string();
    config.helius.base_url = base_url;
    let (app, _) = test_app(&config);

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/check", &json!({"address": CLEAN})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["summary"],
        "Helius TX: 2 · Helius Bal: error · GoPlus: off · Risk: Low (0)"
    );
    assert_eq!(body["details"]["helius"]["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["details"]["helius"]["balances"],
        json!({"error": "upstream returned status 500"})
    );
}
