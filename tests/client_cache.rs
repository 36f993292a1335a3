//! Client/cache interplay against a mocked backend.

use mockito::{Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use styletalk_client::cache::{MemoryBackend, ResponseCache};
use styletalk_client::types::{TextRewriteMultipleRequest, TextRewriteRequest, ToneShiftRequest};
use styletalk_client::{Error, StyleTalkClient};

async fn client_with_cache(server: &ServerGuard) -> StyleTalkClient {
    StyleTalkClient::builder()
        .with_base_url(server.url())
        .with_api_token("test-token")
        .with_cache(ResponseCache::with_defaults(Arc::new(MemoryBackend::new())))
        .build()
        .unwrap()
}

fn shift_body() -> String {
    json!({
        "success": true,
        "original_text": "hey, need that report asap",
        "transformed_text": "Could you please send the report at your earliest convenience?",
        "target_tone": "formal",
        "tone_description": "formal and polite",
        "model_used": "llama-3.3-70b-versatile",
        "usage": {"prompt_tokens": 42, "completion_tokens": 17, "total_tokens": 59}
    })
    .to_string()
}

#[tokio::test]
async fn shift_tone_hits_network_once_then_serves_from_cache() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tone/shift")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(shift_body())
        .expect(1)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = ToneShiftRequest::new("hey, need that report asap", "formal");

    let first = client.shift_tone(&request).await.unwrap();
    assert!(!first.is_cached());
    assert_eq!(first.cache_hit_count, None);

    let second = client.shift_tone(&request).await.unwrap();
    assert!(second.is_cached());
    assert_eq!(second.cache_hit_count, Some(1));
    assert_eq!(second.transformed_text, first.transformed_text);

    // Normalized variants of the same request also hit the cache.
    let variant = ToneShiftRequest::new("  HEY, need that report ASAP ", "FORMAL");
    let third = client.shift_tone(&variant).await.unwrap();
    assert!(third.is_cached());
    assert_eq!(third.cache_hit_count, Some(2));

    mock.assert_async().await;
}

#[tokio::test]
async fn api_errors_propagate_and_store_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tone/shift")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "model unavailable"}).to_string())
        .expect(2)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = ToneShiftRequest::new("hello", "formal");

    for _ in 0..2 {
        match client.shift_tone(&request).await {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model unavailable");
            }
            other => panic!("expected Api error, got {:?}", other.map(|r| r.success)),
        }
    }

    assert_eq!(client.cache().unwrap().stats().total_entries, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn unsuccessful_payload_is_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tone/shift")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": false,
                "original_text": "hello",
                "transformed_text": "",
                "target_tone": "formal",
                "error": "text too long"
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = ToneShiftRequest::new("hello", "formal");

    let first = client.shift_tone(&request).await.unwrap();
    assert!(!first.success);
    // Second call goes to the network again: failures are never stored.
    let second = client.shift_tone(&request).await.unwrap();
    assert!(!second.is_cached());

    mock.assert_async().await;
}

#[tokio::test]
async fn quick_shift_caches_like_shift_tone() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tone/quick-shift")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(shift_body())
        .expect(1)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = ToneShiftRequest::new("hey, need that report asap", "formal");

    assert!(!client.quick_shift(&request).await.unwrap().is_cached());
    assert!(client.quick_shift(&request).await.unwrap().is_cached());
    mock.assert_async().await;
}

#[tokio::test]
async fn rewrite_caches_by_text_and_tone() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/text/rewrite")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "original": "ngl this is fine",
                "rewritten": "Honestly, this is acceptable.",
                "tone": "formal",
                "emotion": "neutral",
                "intent": "inform"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = TextRewriteRequest::new("ngl this is fine", "formal");

    let first = client.rewrite(&request).await.unwrap();
    assert!(!first.is_cached());
    let second = client.rewrite(&request).await.unwrap();
    assert!(second.is_cached());
    assert_eq!(second.cache_hit_count, Some(1));
    assert_eq!(second.rewritten, first.rewritten);

    mock.assert_async().await;
}

#[tokio::test]
async fn mismatched_cached_shape_degrades_to_refetch() {
    let mut server = Server::new_async().await;
    let shift_mock = server
        .mock("POST", "/api/tone/shift")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(shift_body())
        .expect(1)
        .create_async()
        .await;
    let rewrite_mock = server
        .mock("POST", "/api/text/rewrite")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "original": "hey, need that report asap",
                "rewritten": "Please send the report.",
                "tone": "formal"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;

    // Same (text, tone), two different endpoints. The rewrite call finds
    // the tone-shift payload under its key, cannot deserialize it, and
    // falls through to the network instead of erroring.
    let shift = ToneShiftRequest::new("hey, need that report asap", "formal");
    client.shift_tone(&shift).await.unwrap();

    let rewrite = TextRewriteRequest::new("hey, need that report asap", "formal");
    let response = client.rewrite(&rewrite).await.unwrap();
    assert!(!response.is_cached());
    assert_eq!(response.rewritten, "Please send the report.");

    shift_mock.assert_async().await;
    rewrite_mock.assert_async().await;
}

#[tokio::test]
async fn rewrite_multiple_is_a_plain_passthrough() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/text/rewrite-multiple")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "original": "hello",
                "emotion": "neutral",
                "intent": "greet",
                "total_variations": 2,
                "variations": [
                    {"tone": "formal", "rewritten": "Greetings."},
                    {"tone": "genz", "rewritten": "yo fr", "cached": true, "cache_hit_count": 3}
                ]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let request = TextRewriteMultipleRequest {
        text: "hello".to_string(),
        tones: vec!["formal".to_string(), "genz".to_string()],
        use_cache: Some(true),
    };

    let response = client.rewrite_multiple(&request).await.unwrap();
    assert_eq!(response.total_variations, 2);
    assert_eq!(response.variations[1].cache_hit_count, Some(3));

    // The aggregate is never cached client-side.
    client.rewrite_multiple(&request).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn rewrite_variations_fans_out_per_tone() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/text/rewrite")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "original": "hello",
                "rewritten": "variant",
                "tone": "any"
            })
            .to_string(),
        )
        .expect(3)
        .create_async()
        .await;

    let client = client_with_cache(&server).await;
    let results = client
        .rewrite_variations("hello", &["formal", "casual", "genz"])
        .await;

    assert_eq!(results.len(), 3);
    for result in results {
        assert!(result.unwrap().success);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn available_tones_and_health_parse() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tone/tones")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "tones": {"formal": "formal and polite", "genz": "Gen-Z style"},
                "total": 2
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "healthy", "message": "ok"}).to_string())
        .create_async()
        .await;

    let client = client_with_cache(&server).await;

    let tones = client.available_tones().await.unwrap();
    assert_eq!(tones.total, 2);
    assert_eq!(tones.tones["formal"], "formal and polite");

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn backend_cache_endpoints_pass_through() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tone/cache/stats")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"success": true, "entries": 12, "hits": 80}).to_string())
        .create_async()
        .await;
    server
        .mock("DELETE", "/api/tone/cache/clear")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"success": true, "cleared": 12}).to_string())
        .create_async()
        .await;

    let client = client_with_cache(&server).await;

    let stats = client.backend_cache_stats().await.unwrap();
    assert_eq!(stats["entries"], 12);

    let cleared = client.clear_backend_cache().await.unwrap();
    assert_eq!(cleared["cleared"], 12);
}

#[tokio::test]
async fn without_a_cache_every_call_fetches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tone/shift")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(shift_body())
        .expect(2)
        .create_async()
        .await;

    let client = StyleTalkClient::builder()
        .with_base_url(server.url())
        .with_api_token("test-token")
        .build()
        .unwrap();
    assert!(client.cache().is_none());

    let request = ToneShiftRequest::new("hey, need that report asap", "formal");
    client.shift_tone(&request).await.unwrap();
    let second = client.shift_tone(&request).await.unwrap();
    assert!(!second.is_cached());

    mock.assert_async().await;
}
