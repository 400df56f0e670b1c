//! Key-set route integration tests

mod common;

use axum::http::StatusCode;
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn test_key_set_document() {
    let response = get(fixture_context(), "/keys").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");

    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "keys": [{
                "kty": "oct",
                "k": "ABEiM0RVZneImaq7zN3u/w==",
                "kid": "ASNFZ4mrze8BI0VniavN7w==",
            }]
        })
    );
}

#[tokio::test]
async fn test_empty_key_returns_500_without_json() {
    let ctx = context(StaticManifest::new(FIXTURE_MPD), StaticKeys::new("", "abc"));

    let response = get(ctx, "/keys").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(content_type(&response), "application/json");
    let body = body_to_string(response.into_body()).await;
    assert!(serde_json::from_str::<serde_json::Value>(&body).is_err());
    assert!(!body.contains("\"keys\""));
}

#[tokio::test]
async fn test_dashed_kid_is_normalized() {
    let ctx = context(
        StaticManifest::new(FIXTURE_MPD),
        StaticKeys::new(KEY_HEX, "aa-bb-cc"),
    );

    let response = get(ctx, "/keys").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    // base64 of 0xaa 0xbb 0xcc
    assert_eq!(json["keys"][0]["kid"], "qrvM");
}

#[tokio::test]
async fn test_invalid_hex_returns_500() {
    let ctx = context(StaticManifest::new(FIXTURE_MPD), StaticKeys::new("xyz", KID_HEX));

    let response = get(ctx, "/keys").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_key_service_unavailable_returns_500() {
    let ctx = context(StaticManifest::new(FIXTURE_MPD), Arc::new(UnavailableKeys));

    let response = get(ctx, "/keys").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_keys_route_does_not_need_manifest() {
    let ctx = context(Arc::new(UnavailableManifest), StaticKeys::new(KEY_HEX, KID_HEX));

    let response = get(ctx, "/keys").await;
    assert_eq!(response.status(), StatusCode::OK);
}
