//! Tenor client behavior against a mocked server.

use mockito::{Matcher, Server};
use serde_json::json;
use styletalk_client::{Error, TenorClient};

fn tenor_body(id: &str) -> String {
    json!({
        "results": [
            {
                "id": id,
                "title": "excited",
                "media_formats": {
                    "gif": {"url": format!("https://media.tenor.com/{}.gif", id), "dims": [498, 280]},
                    "tinygif": {"url": format!("https://media.tenor.com/{}-tiny.gif", id), "dims": [220, 124]}
                }
            },
            {
                "id": "broken",
                "title": "no full-size rendition",
                "media_formats": {
                    "tinygif": {"url": "https://media.tenor.com/broken-tiny.gif", "dims": [220, 124]}
                }
            }
        ]
    })
    .to_string()
}

fn client(server: &mockito::ServerGuard) -> TenorClient {
    TenorClient::with_api_key("test-key").with_base_url(server.url())
}

#[tokio::test]
async fn search_is_memoized_per_query_and_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tenor_body("abc123"))
        .expect(1)
        .create_async()
        .await;

    let tenor = client(&server);

    let first = tenor.search("office cats", 5).await.unwrap();
    assert_eq!(first.len(), 1, "results without a gif rendition are dropped");
    assert_eq!(first[0].id, "abc123");
    assert_eq!(first[0].preview, "https://media.tenor.com/abc123-tiny.gif");
    assert_eq!((first[0].width, first[0].height), (498, 280));

    let second = tenor.search("office cats", 5).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(tenor.cached_lookups(), 1);

    mock.assert_async().await;
}

#[tokio::test]
async fn different_limits_are_distinct_lookups() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tenor_body("xyz"))
        .expect(2)
        .create_async()
        .await;

    let tenor = client(&server);
    tenor.search("vibes", 3).await.unwrap();
    tenor.search("vibes", 8).await.unwrap();
    assert_eq!(tenor.cached_lookups(), 2);

    mock.assert_async().await;
}

#[tokio::test]
async fn search_by_tone_is_memoized_and_unknown_tones_fall_back() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tenor_body("tone1"))
        .expect(2)
        .create_async()
        .await;

    let tenor = client(&server);

    // Memoized per (tone, limit): one request for two calls.
    tenor.search_by_tone("genz", 5).await.unwrap();
    tenor.search_by_tone("genz", 5).await.unwrap();

    // Unknown tone still resolves (casual fallback queries).
    let gifs = tenor.search_by_tone("sarcastic-pirate", 5).await.unwrap();
    assert!(!gifs.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn featured_is_never_memoized() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/featured")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tenor_body("feat"))
        .expect(2)
        .create_async()
        .await;

    let tenor = client(&server);
    tenor.featured(10).await.unwrap();
    tenor.featured(10).await.unwrap();
    assert_eq!(tenor.cached_lookups(), 0);

    mock.assert_async().await;
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tenor_body("again"))
        .expect(2)
        .create_async()
        .await;

    let tenor = client(&server);
    tenor.search("mood", 5).await.unwrap();
    tenor.clear_cache();
    tenor.search("mood", 5).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn api_errors_surface_with_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let tenor = client(&server);
    match tenor.search("anything", 5).await {
        Err(Error::Api { status, .. }) => assert_eq!(status, 429),
        other => panic!("expected Api error, got {:?}", other.map(|g| g.len())),
    }
    // Failures are never memoized.
    assert_eq!(tenor.cached_lookups(), 0);
}
