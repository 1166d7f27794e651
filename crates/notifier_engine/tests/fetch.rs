use std::time::Duration;

use notifier_engine::{CatalogFetcher, FailureKind, FetchSettings, ReqwestCatalogFetcher};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_parsed_json() {
    let server = MockServer::start().await;
    let body = json!({ "data": { "Catalog": { "searchStore": { "elements": [] } } } });
    Mock::given(method("GET"))
        .and(path("/freeGamesPromotions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let url = format!("{}/freeGamesPromotions", server.uri());
    let fetcher = ReqwestCatalogFetcher::new(url, FetchSettings::default());

    let value = fetcher.fetch().await.expect("fetch ok");
    assert_eq!(value, body);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = ReqwestCatalogFetcher::new(
        format!("{}/missing", server.uri()),
        FetchSettings::default(),
    );
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestCatalogFetcher::new(format!("{}/slow", server.uri()), settings);

    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .insert_header("Content-Length", "11")
                .set_body_string("[1,2,3,4,5]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestCatalogFetcher::new(format!("{}/large", server.uri()), settings);

    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let fetcher =
        ReqwestCatalogFetcher::new(format!("{}/html", server.uri()), FetchSettings::default());
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBody);
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let fetcher = ReqwestCatalogFetcher::new("not a url", FetchSettings::default());
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
