//! Integration tests for paginated ESearch using mocked HTTP responses
//!
//! These tests drive `fetch_ids` against a wiremock server standing in for
//! NCBI E-utilities.

use pubmed_authorscan::{ClientConfig, PubMedClient, PubMedError};
use std::time::{Duration, Instant};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// ESearch JSON page with `count` total hits
fn esearch_page(ids: &[String], count: usize, retstart: usize) -> String {
    let id_list: Vec<String> = ids.iter().map(|id| format!("\"{}\"", id)).collect();
    format!(
        r#"{{
            "header": {{"type": "esearch", "version": "0.3"}},
            "esearchresult": {{
                "count": "{}",
                "retmax": "{}",
                "retstart": "{}",
                "idlist": [{}]
            }}
        }}"#,
        count,
        ids.len(),
        retstart,
        id_list.join(",")
    )
}

fn pmids(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|n| (39_000_000 + n).to_string()).collect()
}

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_throttle_interval(Duration::ZERO)
        .with_resolver_delay(Duration::ZERO);
    PubMedClient::with_config(config).unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_paginates_until_total_reached() {
    let mock_server = MockServer::start().await;

    for (retstart, end) in [(0, 100), (100, 200), (200, 250)] {
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("term", "pharma"))
            .and(query_param("retmax", "100"))
            .and(query_param("retstart", retstart.to_string()))
            .and(query_param("retmode", "json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(esearch_page(&pmids(retstart..end), 250, retstart)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = create_mock_client(&mock_server);
    let ids = client.fetch_ids("pharma").await.unwrap();

    assert_eq!(ids.len(), 250);
    assert_eq!(ids, pmids(0..250));
}

#[tokio::test]
#[traced_test]
async fn test_single_page_with_custom_page_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "20"))
        .and(query_param("retstart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_page(&pmids(0..7), 7, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = client
        .fetch_ids_with_page_size("pharma", 20)
        .await
        .unwrap();

    assert_eq!(ids, pmids(0..7));
}

#[tokio::test]
#[traced_test]
async fn test_zero_hits_makes_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_page(&[], 0, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = client.fetch_ids("no such topic").await.unwrap();

    assert!(ids.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_query_is_normalized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", "cancer immunotherapy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_page(&pmids(0..1), 1, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = client.fetch_ids("  cancer\nimmunotherapy ").await.unwrap();

    assert_eq!(ids.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_api_params_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("api_key", "test_key"))
        .and(query_param("email", "dev@example.com"))
        .and(query_param("tool", "authorscan-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_page(&pmids(0..2), 2, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_api_key("test_key")
        .with_email("dev@example.com")
        .with_tool("authorscan-tests")
        .with_throttle_interval(Duration::ZERO);
    let client = PubMedClient::with_config(config).unwrap();

    assert_eq!(client.fetch_ids("pharma").await.unwrap().len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_malformed_page_aborts_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_page(&pmids(0..100), 150, 0)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.fetch_ids("pharma").await;

    match result {
        Err(PubMedError::MalformedResponse { endpoint, .. }) => assert_eq!(endpoint, "esearch"),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[tokio::test]
#[traced_test]
async fn test_server_error_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.fetch_ids("pharma").await;

    assert!(matches!(
        result,
        Err(PubMedError::ApiError { status: 500, .. })
    ));
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"esearchresult": {"ERROR": "Invalid query syntax"}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.fetch_ids("pharma[[").await;

    match result {
        Err(PubMedError::ApiError { message, .. }) => assert_eq!(message, "Invalid query syntax"),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
#[traced_test]
async fn test_throttle_after_every_page() {
    let mock_server = MockServer::start().await;

    for (retstart, end) in [(0, 100), (100, 200), (200, 250)] {
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("retstart", retstart.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(esearch_page(&pmids(retstart..end), 250, retstart)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let interval = Duration::from_millis(300);
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_throttle_interval(interval);
    let client = PubMedClient::with_config(config).unwrap();

    let started = Instant::now();
    let ids = client.fetch_ids("pharma").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(ids.len(), 250);
    // Three pages, three pauses
    assert!(elapsed >= interval * 3, "elapsed {:?}", elapsed);
    assert!(elapsed < interval * 4, "elapsed {:?}", elapsed);
}
