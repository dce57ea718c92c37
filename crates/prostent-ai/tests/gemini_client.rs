use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use prostent_ai::{CompletionProvider, ContextTurn, GeminiClient, GeminiConfig, ProviderFailure, Speaker};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Seen {
    request: Arc<Mutex<Option<(String, Option<String>, Value)>>>,
}

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: String, timeout_secs: u64) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        base_url,
        model: "gemini-pro".to_string(),
        api_key: "test-key".to_string(),
        timeout_secs,
    })
    .unwrap()
}

fn transcript() -> Vec<ContextTurn> {
    vec![
        ContextTurn::new(Speaker::User, "hi"),
        ContextTurn::new(Speaker::Model, "hello"),
        ContextTurn::new(Speaker::User, "bye"),
    ]
}

#[tokio::test]
async fn complete_sends_transcript_and_returns_text() {
    let seen = Seen::default();
    let router = Router::new()
        .fallback(
            |State(seen): State<Seen>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *seen.request.lock().unwrap() = Some((uri.path().to_string(), key, body));
                Json(json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "See you!"}]}}]
                }))
            },
        )
        .with_state(seen.clone());
    let base = serve(router).await;

    let reply = client_for(base, 5).complete(&transcript()).await.unwrap();
    assert_eq!(reply, "See you!");

    let (path, key, body) = seen.request.lock().unwrap().take().expect("request recorded");
    assert_eq!(path, "/v1beta/models/gemini-pro:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));

    let contents = body["contents"].as_array().unwrap();
    let roles: Vec<&str> = contents.iter().map(|c| c["role"].as_str().unwrap()).collect();
    let texts: Vec<&str> = contents
        .iter()
        .map(|c| c["parts"][0]["text"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
    assert_eq!(texts, vec!["hi", "hello", "bye"]);
}

#[tokio::test]
async fn http_error_becomes_status_failure() {
    let router = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
    });
    let base = serve(router).await;

    match client_for(base, 5).complete(&transcript()).await {
        Err(ProviderFailure::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let router = Router::new().fallback(|| async { "<html>not json</html>" });
    let base = serve(router).await;

    let result = client_for(base, 5).complete(&transcript()).await;
    assert!(matches!(result, Err(ProviderFailure::Malformed(_))), "got {result:?}");
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client_for(format!("http://{}", addr), 5)
        .complete(&transcript())
        .await;
    assert!(matches!(result, Err(ProviderFailure::Transport(_))), "got {result:?}");
}

#[tokio::test]
async fn slow_provider_times_out() {
    let router = Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({"candidates": []}))
    });
    let base = serve(router).await;

    let result = client_for(base, 1).complete(&transcript()).await;
    assert!(matches!(result, Err(ProviderFailure::Timeout)), "got {result:?}");
}

#[tokio::test]
async fn missing_api_key_fails_without_calling_out() {
    let client = GeminiClient::new(GeminiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..GeminiConfig::default()
    })
    .unwrap();

    let result = client.complete(&transcript()).await;
    assert!(matches!(result, Err(ProviderFailure::Config(_))), "got {result:?}");
}
