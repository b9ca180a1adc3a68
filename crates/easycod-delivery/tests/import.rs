//! Integration tests for `RateClient::import_rates`.
//!
//! Each test stands up a `wiremock` server and points the credential's
//! `api_url` override at it, so no real provider is contacted.

use easycod_core::{FeeParsing, ProviderCredential};
use easycod_delivery::{DeliveryError, RateClient, RateClientConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> RateClient {
    test_client_with(FeeParsing::Lenient)
}

fn test_client_with(fee_parsing: FeeParsing) -> RateClient {
    RateClient::new(RateClientConfig {
        timeout_secs: Some(5),
        user_agent: "easycod-test/0.1".to_string(),
        fee_parsing,
        maystro_max_concurrent_regions: 8,
    })
    .expect("failed to build test RateClient")
}

/// Mounts a catch-all mock that fails verification if any request arrives.
async fn expect_no_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Token + GUID (Noest)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn noest_single_region_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/fees"))
        .and(query_param("api_token", "abc"))
        .and(query_param("user_guid", "xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tarifs": {
                "delivery": {
                    "16": { "wilaya_id": 16, "tarif": "350", "tarif_stopdesk": "200" }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("noest", "abc")
        .with_guid("xyz")
        .with_api_url(server.uri());
    let outcome = test_client()
        .import_rates(&credential)
        .await
        .expect("import should succeed");

    assert_eq!(outcome.provider, "noest");
    assert!(outcome.failed_regions.is_empty());
    assert_eq!(outcome.rates.len(), 1);
    let rate = &outcome.rates[0];
    assert_eq!(rate.region_id, 16);
    assert_eq!(rate.region_name_ascii, "Alger");
    assert_eq!(rate.region_name_local, "الجزائر");
    assert!((rate.home_delivery_fee - 350.0).abs() < f64::EPSILON);
    assert!((rate.stop_desk_fee - 200.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn noest_returns_one_rate_per_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/fees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tarifs": {
                "delivery": {
                    "1": { "wilaya_id": 1, "tarif": "1100", "tarif_stopdesk": "800" },
                    "16": { "wilaya_id": 16, "tarif": 350, "tarif_stopdesk": 200 },
                    "62": { "wilaya_id": 62, "tarif": "oops" }
                },
                "return": { "16": { "wilaya_id": 16, "tarif": "100" } }
            }
        })))
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("noest", "abc")
        .with_guid("xyz")
        .with_api_url(server.uri());
    let outcome = test_client().import_rates(&credential).await.unwrap();

    assert_eq!(outcome.rates.len(), 3);
    let unknown = outcome
        .rates
        .iter()
        .find(|r| r.region_id == 62)
        .expect("unknown region kept");
    assert_eq!(unknown.region_name_ascii, "Wilaya 62");
    assert!(unknown.home_delivery_fee.abs() < f64::EPSILON);
    assert!(outcome
        .rates
        .iter()
        .all(|r| r.home_delivery_fee >= 0.0 && r.stop_desk_fee >= 0.0));
}

#[tokio::test]
async fn noest_without_guid_is_rejected_before_fetch() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let credential = ProviderCredential::new("noest", "abc").with_api_url(server.uri());
    let err = test_client().import_rates(&credential).await.unwrap_err();

    assert!(matches!(err, DeliveryError::Validation(_)), "got: {err:?}");
}

#[tokio::test]
async fn strict_parsing_rejects_unreadable_fee() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/fees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tarifs": { "delivery": { "5": { "wilaya_id": 5, "tarif": "cheap" } } }
        })))
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("noest", "abc")
        .with_guid("xyz")
        .with_api_url(server.uri());
    let err = test_client_with(FeeParsing::Strict)
        .import_rates(&credential)
        .await
        .unwrap_err();

    assert!(
        matches!(err, DeliveryError::InvalidFee { region_id: 5, .. }),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Unsupported provider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_provider_is_rejected_before_fetch() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let credential = ProviderCredential::new("unknown-co", "abc").with_api_url(server.uri());
    let err = test_client().import_rates(&credential).await.unwrap_err();

    assert!(
        matches!(err, DeliveryError::UnsupportedProvider(ref id) if id == "unknown-co"),
        "got: {err:?}"
    );
    assert!(err.to_string().contains("unsupported provider"));
}

// ---------------------------------------------------------------------------
// Bearer (EcoTrack family)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ecotrack_flat_array_is_normalized_in_provider_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/fees"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "livraison": [
                { "wilaya_id": 31, "tarif": "600", "tarif_stopdesk": "400" },
                { "wilaya_id": 9, "tarif": "450", "tarif_stopdesk": null }
            ],
            "pickup": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("dhd", "tok-123").with_api_url(server.uri());
    let outcome = test_client().import_rates(&credential).await.unwrap();

    assert_eq!(outcome.provider, "dhd");
    let ids: Vec<u16> = outcome.rates.iter().map(|r| r.region_id).collect();
    assert_eq!(ids, vec![31, 9]);
    assert_eq!(outcome.rates[0].region_name_ascii, "Oran");
    assert!(!outcome.rates[1].supports_stop_desk());
}

#[tokio::test]
async fn ecotrack_unauthorized_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/fees"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthenticated."}"#),
        )
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("ecotrack", "bad").with_api_url(server.uri());
    let err = test_client().import_rates(&credential).await.unwrap_err();

    match err {
        DeliveryError::UpstreamHttp {
            provider,
            status,
            body,
        } => {
            assert_eq!(provider, "ecotrack");
            assert_eq!(status, 401);
            assert!(body.contains("Unauthenticated."));
        }
        other => panic!("expected UpstreamHttp, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/fees"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("ecotrack", "tok").with_api_url(server.uri());
    let err = test_client().import_rates(&credential).await.unwrap_err();

    assert!(matches!(err, DeliveryError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    let credential =
        ProviderCredential::new("ecotrack", "tok").with_api_url("http://127.0.0.1:1");
    let err = test_client().import_rates(&credential).await.unwrap_err();

    assert!(matches!(err, DeliveryError::Network { .. }), "got: {err:?}");
    assert!(err.to_string().starts_with("import failed"));
}

#[tokio::test]
async fn network_error_does_not_expose_query_credentials() {
    let credential = ProviderCredential::new("noest", "SUPERSECRETTOKEN")
        .with_guid("SECRETGUID")
        .with_api_url("http://127.0.0.1:1");
    let err = test_client().import_rates(&credential).await.unwrap_err();

    assert!(matches!(err, DeliveryError::Network { .. }), "got: {err:?}");
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("SUPERSECRETTOKEN"), "leaked token: {rendered}");
    assert!(!rendered.contains("SECRETGUID"), "leaked guid: {rendered}");
}

// ---------------------------------------------------------------------------
// Maystro fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn maystro_drops_only_the_failing_region() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stores/delivery_fees/"))
        .and(query_param("commune", "1601"))
        .and(query_param("delivery_type", "1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/stores/delivery_fees/"))
        .and(header("authorization", "Token m-tok"))
        .and(query_param("delivery_type", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": 500 })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/stores/delivery_fees/"))
        .and(header("authorization", "Token m-tok"))
        .and(query_param("delivery_type", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("300")))
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("maystro", "m-tok").with_api_url(server.uri());
    let outcome = test_client()
        .import_rates(&credential)
        .await
        .expect("partial failure must not fail the batch");

    assert_eq!(outcome.rates.len(), 57);
    assert_eq!(outcome.failed_regions, vec![16]);
    assert!(outcome.is_partial());
    assert!(outcome.rates.iter().all(|r| r.region_id != 16));
    let oran = outcome.rates.iter().find(|r| r.region_id == 31).unwrap();
    assert!((oran.home_delivery_fee - 500.0).abs() < f64::EPSILON);
    assert!((oran.stop_desk_fee - 300.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn maystro_reports_every_region_failed_without_erroring() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stores/delivery_fees/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let credential = ProviderCredential::new("maystro", "bad").with_api_url(server.uri());
    let outcome = test_client()
        .import_rates(&credential)
        .await
        .expect("region failures must not fail the batch");

    assert!(outcome.rates.is_empty());
    assert_eq!(outcome.failed_regions, (1..=58).collect::<Vec<u16>>());
}
