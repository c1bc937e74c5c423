//! Contract Test: Cloudflare API Requests
//!
//! Each operation sends exactly one authenticated request with the expected
//! method, path, parameters and body, and maps the envelope onto the error
//! taxonomy.

use cfdns_core::traits::DnsApi;
use cfdns_core::{Credentials, DnsRecord, Error, RecordFilter, ZoneFilter};
use cfdns_provider_cloudflare::CloudflareClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> CloudflareClient {
    let credentials = Credentials::new("user@example.com", "test_key").unwrap();
    CloudflareClient::new(credentials)
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap()
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    }))
}

fn record() -> DnsRecord {
    DnsRecord {
        id: "r1".to_string(),
        record_type: "A".to_string(),
        name: "host.example.com".to_string(),
        content: "203.0.113.5".to_string(),
        proxiable: true,
        proxied: false,
        ttl: 120,
        locked: false,
        zone_id: "z1".to_string(),
        zone_name: "example.com".to_string(),
        created_on: "2014-01-01T05:20:00.12345Z".to_string(),
        modified_on: "2014-01-01T05:20:00.12345Z".to_string(),
    }
}

#[tokio::test]
async fn list_zones_sends_auth_headers_and_active_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("name", "example.com"))
        .and(query_param("status", "active"))
        .and(header("X-Auth-Email", "user@example.com"))
        .and(header("X-Auth-Key", "test_key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ok(json!([{ "id": "z1", "name": "example.com", "status": "active" }])))
        .expect(1)
        .mount(&server)
        .await;

    let zones = client_for(&server)
        .await
        .list_zones(&ZoneFilter::by_name("example.com"))
        .await
        .unwrap();

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].id, "z1");
    assert_eq!(zones[0].name, "example.com");
}

#[tokio::test]
async fn list_zones_omits_unset_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .list_zones(&ZoneFilter::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs, vec![("status".to_string(), "active".to_string())]);
}

#[tokio::test]
async fn list_dns_records_filters_by_type_and_name() {
    let server = MockServer::start().await;
    let mut listed = serde_json::to_value(record()).unwrap();
    listed["meta"] = json!({ "auto_added": false });

    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .and(query_param("type", "A"))
        .and(query_param("name", "host.example.com"))
        .respond_with(ok(json!([listed])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server)
        .await
        .list_dns_records("z1", &RecordFilter::a_record("host.example.com"))
        .await
        .unwrap();

    assert_eq!(records, vec![record()]);
}

#[tokio::test]
async fn list_dns_records_requires_zone_id() {
    let server = MockServer::start().await;

    let err = client_for(&server)
        .await
        .list_dns_records("", &RecordFilter::a_record("host.example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_dns_record_puts_full_record() {
    let server = MockServer::start().await;
    let expected_body = serde_json::to_value(record()).unwrap();

    Mock::given(method("PUT"))
        .and(path("/zones/z1/dns_records/r1"))
        .and(body_json(&expected_body))
        .respond_with(ok(expected_body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .update_dns_record(&record())
        .await
        .unwrap();
}

#[tokio::test]
async fn update_dns_record_error_carries_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/zones/z1/dns_records/r1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 9005, "message": "Content for A record is invalid." }],
            "messages": [],
            "result": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .update_dns_record(&record())
        .await
        .unwrap_err();

    match &err {
        Error::Api {
            operation,
            errors,
            payload,
        } => {
            assert_eq!(operation, "Update DNS record");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code, 9005);
            let payload = payload.as_deref().unwrap();
            assert!(payload.contains("\"content\":\"203.0.113.5\""));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.to_string().contains("Code 9005: Content for A record is invalid."));
}

#[tokio::test]
async fn update_dns_record_requires_ids() {
    let server = MockServer::start().await;
    let mut no_id = record();
    no_id.id.clear();

    let err = client_for(&server)
        .await
        .update_dns_record(&no_id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn purge_sends_purge_everything() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/zones/z1/purge_cache"))
        .and(body_json(json!({ "purge_everything": true })))
        .respond_with(ok(json!({ "id": "z1" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .purge_all_cached_files("z1")
        .await
        .unwrap();
}

#[tokio::test]
async fn unsuccessful_envelope_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [
                { "code": 6003, "message": "Invalid request headers" },
                { "code": 6103, "message": "Invalid format for X-Auth-Key header" }
            ],
            "messages": [],
            "result": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_zones(&ZoneFilter::by_name("example.com"))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "List zones error: Code 6003: Invalid request headers, Code 6103: Invalid format for X-Auth-Key header"
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_zones(&ZoneFilter::by_name("example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    drop(server);

    let err = client
        .list_zones(&ZoneFilter::by_name("example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Request(_)), "got {err:?}");
    assert!(err.is_transport());
}
