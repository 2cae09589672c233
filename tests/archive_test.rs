//! Integration tests for the archive provider against a mock backend.

mod common;

use assert_matches::assert_matches;
use common::TestArchive;
use kinsearch::search::{ArchiveEndpoint, PersonProvider, RefineParams, SearchLimits};
use kinsearch::SearchError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn person(id: &str, name: &str, dates: &str) -> serde_json::Value {
    json!({
        "id": id,
        "objectType": "Agent",
        "objectSubType": "Person",
        "caption": name,
        "metadata": {"dates": dates},
        "_links": {"html": {"href": format!("https://archive.example/{id}")}}
    })
}

// ---------------------------------------------------------------------------
// Successful searches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_returns_people_only() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("name", "Lindqvist"))
        .and(query_param("limit", "150"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                person("SE/RA/1", "Lindqvist, Erik", "1661 - 1704"),
                {"id": "SE/RA/2", "type": "Archival series", "caption": "Lindqvistska släktarkivet"},
                {"id": "SE/RA/3", "caption": "Församlingens kyrka, ritning"},
                {"id": "SE/RA/4", "caption": "Lindqvist, Maria"}
            ]
        })))
        .expect(1)
        .mount(&archive.server)
        .await;

    let results = archive.provider.search("Lindqvist").await.unwrap();
    let ids: Vec<&str> = results.iter().map(|c| c.id()).collect();
    assert_eq!(ids, ["SE/RA/1", "SE/RA/4"]);

    assert_eq!(results[0].birth_year(), Some(1661));
    assert_eq!(results[0].death_year(), Some(1704));
    assert!(results[0].why().iter().any(|w| w == "type: agent/person"));
    assert!(results[1]
        .why()
        .iter()
        .any(|w| w == "fallback: name pattern (low confidence)"));

    for c in &results {
        assert!(c.url().is_empty() || c.url().starts_with("http"));
    }
}

#[tokio::test]
async fn persons_endpoint_and_hits_envelope() {
    let archive = TestArchive::start_with(ArchiveEndpoint::Persons, SearchLimits::default()).await;
    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"total": 1, "hits": [person("p1", "Anna Svensson", "1800")]}
        })))
        .mount(&archive.server)
        .await;

    let results = archive.provider.search("Anna").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].birth_year(), Some(1800));
    assert_eq!(results[0].death_year(), None);
}

#[tokio::test]
async fn ceiling_applies_to_large_upstream_pages() {
    let limits = SearchLimits {
        min_query_len: 2,
        max_results: 25,
    };
    let archive = TestArchive::start_with(ArchiveEndpoint::Records, limits).await;
    let items: Vec<_> = (0..300)
        .map(|i| person(&format!("r{i}"), "Anna Svensson", ""))
        .collect();
    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": items })))
        .mount(&archive.server)
        .await;

    let results = archive.provider.search("Anna").await.unwrap();
    assert_eq!(results.len(), 25);
}

#[tokio::test]
async fn refine_forwards_constraints() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("name", "Anna Svensson"))
        .and(query_param("birthYear", "1800"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                person("a", "Anna Svensson", "1800 - 1870"),
                person("b", "Anna Svensson", "1799 - 1870")
            ]
        })))
        .expect(1)
        .mount(&archive.server)
        .await;

    let params = RefineParams {
        name: "Anna Svensson".into(),
        birth_year: Some(1800),
        ..Default::default()
    };
    let results = archive.provider.refine(&params).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), "a");
}

// ---------------------------------------------------------------------------
// Query floor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_queries_never_reach_network() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&archive.server)
        .await;

    for query in ["", " ", "K", " k "] {
        assert!(archive.provider.search(query).await.unwrap().is_empty());
    }
    assert_eq!(archive.fetcher.calls(), 0);
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unrecognized_envelope_is_bad_payload() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"entries": [person("1", "Anna", "")]})),
        )
        .mount(&archive.server)
        .await;

    assert_matches!(
        archive.provider.search("Anna").await,
        Err(SearchError::BadPayload)
    );
}

#[tokio::test]
async fn invalid_json_is_bad_json() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&archive.server)
        .await;

    assert_matches!(
        archive.provider.search("Anna").await,
        Err(SearchError::BadJson)
    );
}

#[tokio::test]
async fn error_status_is_upstream_http() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&archive.server)
        .await;

    let err = archive.provider.search("Anna").await.unwrap_err();
    assert_eq!(err, SearchError::UpstreamHttp(503));
    assert_eq!(err.code(), "UPSTREAM_HTTP_503");
    // No automatic retry.
    assert_eq!(archive.fetcher.calls(), 1);
}

#[tokio::test]
async fn slow_upstream_is_network_or_timeout() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&archive.server)
        .await;

    let started = std::time::Instant::now();
    assert_matches!(
        archive.provider.search("Anna").await,
        Err(SearchError::NetworkOrTimeout)
    );
    assert!(started.elapsed() < Duration::from_secs(2));
}

// ---------------------------------------------------------------------------
// Registry integration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auto_selects_archive_and_demo_stays_offline() {
    let archive = TestArchive::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [person("x1", "Karl Svensson", "")]
        })))
        .mount(&archive.server)
        .await;

    let registry = archive.registry();
    let auto = registry.pick("auto");
    assert_eq!(auto.id(), "archive");
    assert_eq!(auto.search("Karl").await.unwrap()[0].id(), "x1");

    let demo = registry.pick("demo");
    let demo_results = demo.search("Karl").await.unwrap();
    assert!(!demo_results.is_empty());
    assert!(demo_results.iter().all(|c| c.source() == "Demo"));
    assert_eq!(archive.fetcher.calls(), 1);
}
