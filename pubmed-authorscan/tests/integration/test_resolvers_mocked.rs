//! Integration tests for the CrossRef and Europe PMC email resolvers
//!
//! Each resolver is exercised against a wiremock server, both on its own and
//! through a `ResolverChain`.

use pubmed_authorscan::{
    ArticleIds, ClientConfig, CrossRefResolver, EmailResolver, EuropePmcEmailsResolver,
    EuropePmcSearchResolver, PubMedError, ResolverChain,
};
use rstest::rstest;
use std::time::Duration;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn respond(mock_server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_crossref_email_by_doi() {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/works/10.1016/j.cell.2024.01.001",
        ResponseTemplate::new(200).set_body_string(
            r#"{"status": "ok", "message-type": "work", "message": {
                "DOI": "10.1016/j.cell.2024.01.001",
                "author": [
                    {"given": "Jane", "family": "Doe", "sequence": "first", "affiliation": [{"name": "Acme Pharma"}]},
                    {"given": "Rich", "family": "Roe", "email": ["roe@acme.com"], "affiliation": []}
                ]
            }}"#,
        ),
    )
    .await;

    let resolver = CrossRefResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let email = resolver.lookup("10.1016/j.cell.2024.01.001").await.unwrap();

    assert_eq!(email.as_deref(), Some("roe@acme.com"));
}

#[tokio::test]
#[traced_test]
async fn test_crossref_mailto_fallback() {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/works/10.1000/mailto",
        ResponseTemplate::new(200).set_body_string(
            r#"{"message": {"author": [
                {"family": "Doe", "affiliation": [{"name": "Acme Pharma, Basel, mailto:doe@acme.ch"}]}
            ]}}"#,
        ),
    )
    .await;

    let resolver = CrossRefResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let email = resolver.lookup("10.1000/mailto").await.unwrap();

    assert_eq!(email.as_deref(), Some("doe@acme.ch"));
}

#[tokio::test]
#[traced_test]
async fn test_crossref_sici_doi_is_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/works/10.1002/%28SICI%291097-4636%28199603%2931%3A3%3C343%3A%3AAID-JBM9%3E3.0.CO%3B2-%23",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"message": {"author": [{"family": "Doe", "email": "doe@acme.com"}]}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = CrossRefResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let email = resolver
        .lookup("10.1002/(SICI)1097-4636(199603)31:3<343::AID-JBM9>3.0.CO;2-#")
        .await
        .unwrap();

    assert_eq!(email.as_deref(), Some("doe@acme.com"));
}

#[tokio::test]
#[traced_test]
async fn test_europe_pmc_search_by_pmid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "EXT_ID:12345 AND SRC:MED"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"version": "6.9", "hitCount": 1, "resultList": {"result": [{
                "id": "12345", "source": "MED", "pmid": "12345",
                "authorList": {"author": [{"fullName": "Doe J", "email": "doe@acme-bio.com"}]}
            }]}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver =
        EuropePmcSearchResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let email = resolver.lookup("12345").await.unwrap();

    assert_eq!(email.as_deref(), Some("doe@acme-bio.com"));
}

#[tokio::test]
#[traced_test]
async fn test_europe_pmc_emails_endpoint() {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/MED/12345/emails/json",
        ResponseTemplate::new(200)
            .set_body_string(r#"{"emailList": {"email": ["first@acme.com", "second@acme.com"]}}"#),
    )
    .await;

    let resolver =
        EuropePmcEmailsResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let email = resolver.lookup("12345").await.unwrap();

    assert_eq!(email.as_deref(), Some("first@acme.com"));
}

#[rstest]
#[case::not_found(404)]
#[case::server_error(500)]
#[case::unavailable(503)]
#[tokio::test]
async fn test_error_status_is_reported(#[case] status: u16) {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/MED/1/emails/json",
        ResponseTemplate::new(status),
    )
    .await;

    let resolver =
        EuropePmcEmailsResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let result = resolver.lookup("1").await;

    match result {
        Err(PubMedError::ApiError { status: got, .. }) => assert_eq!(got, status),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
#[traced_test]
async fn test_malformed_body_is_reported() {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/works/10.1000/broken",
        ResponseTemplate::new(200).set_body_string("<html>Service Unavailable</html>"),
    )
    .await;

    let resolver = CrossRefResolver::new(reqwest::Client::new(), &mock_server.uri(), TIMEOUT);
    let result = resolver.lookup("10.1000/broken").await;

    assert!(matches!(result, Err(PubMedError::JsonError(_))));
}

#[tokio::test]
#[traced_test]
async fn test_slow_resolver_times_out() {
    let mock_server = MockServer::start().await;
    respond(
        &mock_server,
        "/MED/2/emails/json",
        ResponseTemplate::new(200)
            .set_body_string(r#"{"emailList": {"email": ["late@acme.com"]}}"#)
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let resolver = EuropePmcEmailsResolver::new(
        reqwest::Client::new(),
        &mock_server.uri(),
        Duration::from_millis(100),
    );
    let result = resolver.lookup("2").await;

    assert!(matches!(result, Err(PubMedError::RequestError(_))));
}

#[tokio::test]
#[traced_test]
async fn test_chain_absorbs_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crossref/works/10.1000/x"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/europepmc/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/europepmc/MED/42/emails/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"emailList": {"email": []}}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_crossref_base_url(format!("{}/crossref", mock_server.uri()))
        .with_europe_pmc_base_url(format!("{}/europepmc", mock_server.uri()))
        .with_resolver_delay(Duration::ZERO);
    let chain = ResolverChain::from_config(&config, reqwest::Client::new());

    let ids = ArticleIds {
        doi: Some("10.1000/x"),
        pmid: Some("42"),
    };
    assert_eq!(chain.resolve(&ids).await, None);
}

#[tokio::test]
#[traced_test]
async fn test_chain_stops_at_first_hit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crossref/works/10.1000/y"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/europepmc/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultList": {"result": [{"affiliation": "Acme Inc, Boston. doe@acme.com"}]}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/europepmc/MED/43/emails/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_crossref_base_url(format!("{}/crossref", mock_server.uri()))
        .with_europe_pmc_base_url(format!("{}/europepmc", mock_server.uri()))
        .with_resolver_delay(Duration::ZERO);
    let chain = ResolverChain::from_config(&config, reqwest::Client::new());

    let ids = ArticleIds {
        doi: Some("10.1000/y"),
        pmid: Some("43"),
    };
    assert_eq!(chain.resolve(&ids).await, Some("doe@acme.com".to_string()));
}
