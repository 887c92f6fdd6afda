//! Integration tests for paged collections

use super::*;
use integrations_omada::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn devices(start: usize, count: usize) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| json!({"mac": format!("AA-BB-CC-00-{:02X}-{:02X}", i / 256, i % 256)}))
            .collect(),
    )
}

#[tokio::test]
async fn test_total_reported_on_first_page_only() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    let pages = [
        ("1", json!({"totalRows": 447, "currentPage": 1, "data": devices(0, 200)})),
        ("2", json!({"currentPage": 2, "data": devices(200, 200)})),
        ("3", json!({"currentPage": 3, "data": devices(400, 47)})),
    ];
    for (page, result) in pages {
        Mock::given(method("GET"))
            .and(path(api_path("sites/s1/devices")))
            .and(query_param("page", page))
            .and(query_param("pageSize", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(result)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = client(&server).devices().list("s1").await.unwrap();
    assert_eq!(all.len(), 447);
    assert_eq!(all[446].mac, "AA-BB-CC-00-01-BE");
}

#[tokio::test]
async fn test_missing_total_stops_on_empty_page() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    let pages = [
        ("1", devices(0, 3)),
        ("2", devices(3, 3)),
        ("3", json!([])),
    ];
    for (page, data) in pages {
        Mock::given(method("GET"))
            .and(path(api_path("sites/s1/clients")))
            .and(query_param("page", page))
            .and(query_param("pageSize", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"data": data}))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_builder(&server).page_size(3).build().unwrap();
    let all = client.clients().list("s1").await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_failing_page_discards_collection() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "totalRows": 400,
            "data": (0..200).map(|i| json!({"siteId": i.to_string(), "name": "s"})).collect::<Vec<_>>()
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("sites")))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).sites().list().await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
}

#[tokio::test]
async fn test_threat_filters_reach_every_page() {
    let server = setup_mock_server().await;
    mount_token(&server, "AT-1", 1).await;

    for (page, ids) in [("1", vec!["t-1", "t-2"]), ("2", vec!["t-3"])] {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| json!({"id": id, "severity": 2, "archived": false}))
            .collect();
        Mock::given(method("GET"))
            .and(path(api_path("sites/s1/threat-management/threats")))
            .and(query_param("page", page))
            .and(query_param("pageSize", "2"))
            .and(query_param("severity", "2"))
            .and(query_param("archived", "false"))
            .and(query_param("startTime", "1700000000000"))
            .and(query_param("endTime", "1700086400000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "totalRows": 3,
                "data": data
            }))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_builder(&server).page_size(2).build().unwrap();
    let query = ThreatQuery::new()
        .between(1_700_000_000_000, 1_700_086_400_000)
        .severity(2)
        .archived(false);
    let threats = client.threats().list("s1", &query).await.unwrap();

    let ids: Vec<&str> = threats.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-1", "t-2", "t-3"]);
}
