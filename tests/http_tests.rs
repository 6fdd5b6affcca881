use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use mu_talker::cache::MemoryCache;
use mu_talker::error::TalkerError;
use mu_talker::fetch::Fetcher;
use mu_talker::http::{HttpTransport, ReqwestTransport};
use mu_talker::settings::MangaUpdatesSettings;
use mu_talker::talker::MangaUpdates;

fn talker_for(server: &MockServer) -> MangaUpdates {
    let settings = MangaUpdatesSettings {
        api_url: server.url("/v1/"),
        ..Default::default()
    };
    MangaUpdates::with_transport(
        settings,
        Arc::new(ReqwestTransport::default()),
        Arc::new(MemoryCache::new()),
    )
}

#[tokio::test]
async fn transport_exposes_status_body_and_reset_header() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/");
            then.status(429)
                .header("x-ratelimit-retry-after", "12345")
                .body("slow down");
        })
        .await;

    let transport = ReqwestTransport::default();
    let response = transport.get(&server.url("/v1/")).await.unwrap();
    assert_eq!(response.status, 429);
    assert_eq!(response.body, "slow down");
    assert_eq!(response.ratelimit_reset, Some(12345));
}

#[tokio::test]
async fn fetcher_fails_a_real_404_on_the_first_attempt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/series/999999");
            then.status(404)
                .json_body(json!({"status": "exception", "reason": "Series not found"}));
        })
        .await;

    let fetcher = Fetcher::new(Arc::new(ReqwestTransport::default()));
    let err = fetcher
        .get(&server.url("/v1/series/999999"))
        .await
        .unwrap_err();
    assert!(matches!(err, TalkerError::Network(_)), "got {err:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn search_round_trips_over_real_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/series/search")
                .json_body_partial(r#"{"search": "berserk", "page": 1}"#);
            then.status(200).json_body(json!({
                "total_hits": 1,
                "page": 1,
                "per_page": 100,
                "results": [{
                    "record": {
                        "series_id": 33,
                        "title": "Berserk",
                        "url": "https://www.mangaupdates.com/series/33",
                        "image": {"url": {"original": "https://cdn/33.jpg"}},
                        "type": "Manga",
                        "completed": true,
                        "latest_chapter": 364
                    },
                    "hit_title": "Berserk"
                }]
            }));
        })
        .await;

    let talker = talker_for(&server);
    let results = talker
        .search_for_series("Berserk!", None, false, false, 90)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Berserk");
    mock.assert_async().await;
}

#[tokio::test]
async fn series_detail_round_trips_over_real_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/series/33");
            then.status(200).json_body(json!({
                "series_id": 33,
                "title": "Berserk",
                "url": "https://www.mangaupdates.com/series/33",
                "image": {"url": {"original": "https://cdn/33.jpg"}},
                "type": "Manga",
                "year": "1989",
                "completed": true,
                "latest_chapter": 364
            }));
        })
        .await;

    let talker = talker_for(&server);
    let md = talker.fetch_series_metadata(33).await.unwrap();
    assert_eq!(md.series.as_deref(), Some("Berserk"));
    assert_eq!(md.year, Some(1989));
}

#[tokio::test]
async fn check_status_reports_validity_without_raising() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/");
            then.status(200).json_body(json!({"status": "success"}));
        })
        .await;

    let talker = talker_for(&server);
    let (message, ok) = talker.check_status(Some(&server.url("/v1/"))).await;
    assert!(ok, "{message}");

    let (message, ok) = talker.check_status(Some(&server.url("/missing/"))).await;
    assert!(!ok, "{message}");
}
