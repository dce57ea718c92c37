use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use prostent_types::VoiceSettings;
use prostent_voice::{TtsConfig, TtsService, VoiceError, MAX_TTS_INPUT_BYTES};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mpeg-frames";

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<(Option<String>, Value)>>>,
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

/// Fake provider answering every request with `status` and `body`.
async fn fake_provider(status: StatusCode, body: &'static [u8]) -> (String, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new()
        .fallback(
            move |State(rec): State<Recorder>, headers: HeaderMap, Json(payload): Json<Value>| async move {
                rec.hits.fetch_add(1, Ordering::SeqCst);
                let key = headers
                    .get("api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *rec.last.lock().unwrap() = Some((key, payload));
                (status, body).into_response()
            },
        )
        .with_state(recorder.clone());
    (serve(router).await, recorder)
}

fn service(base_url: String) -> TtsService {
    TtsService::new(TtsConfig {
        base_url,
        api_key: "murf-key".to_string(),
        ..TtsConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn synthesize_returns_audio_and_sends_voice() {
    let (base, rec) = fake_provider(StatusCode::OK, FAKE_MP3).await;
    let tts = service(base);
    let voice = VoiceSettings {
        voice_id: "en-GB-sophia".to_string(),
        rate: 1.25,
        pitch: 0.9,
        emotion: "Calm".to_string(),
    };

    let audio = tts.synthesize("Hello there", &voice).await.unwrap();
    assert_eq!(audio, FAKE_MP3);

    let (key, body) = rec.last.lock().unwrap().take().unwrap();
    assert_eq!(key.as_deref(), Some("murf-key"));
    assert_eq!(body["voiceId"], "en-GB-sophia");
    assert_eq!(body["text"], "Hello there");
    assert_eq!(body["rate"], 1.25);
    assert_eq!(body["emotion"], "Calm");
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized() {
    let (base, _) = fake_provider(StatusCode::UNAUTHORIZED, b"{}").await;
    let result = service(base)
        .synthesize("Hello", &VoiceSettings::default())
        .await;
    assert!(matches!(result, Err(VoiceError::Unauthorized)), "got {result:?}");
}

#[tokio::test]
async fn bad_request_maps_to_invalid_parameters() {
    let (base, _) = fake_provider(StatusCode::BAD_REQUEST, br#"{"message":"bad voice"}"#).await;
    match service(base).synthesize("Hello", &VoiceSettings::default()).await {
        Err(VoiceError::InvalidParameters(msg)) => assert_eq!(msg, "bad voice"),
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_maps_to_upstream() {
    let (base, _) = fake_provider(StatusCode::BAD_GATEWAY, b"gateway down").await;
    match service(base).synthesize("Hello", &VoiceSettings::default()).await {
        Err(VoiceError::Upstream { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "gateway down");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_or_oversized_text_never_reaches_provider() {
    let (base, rec) = fake_provider(StatusCode::OK, FAKE_MP3).await;
    let tts = service(base);

    let blank = tts.synthesize("   ", &VoiceSettings::default()).await;
    assert!(matches!(blank, Err(VoiceError::EmptyText)));

    let huge = "a".repeat(MAX_TTS_INPUT_BYTES + 1);
    let too_long = tts.synthesize(&huge, &VoiceSettings::default()).await;
    assert!(matches!(too_long, Err(VoiceError::TextTooLong { .. })));

    assert_eq!(rec.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn probe_reports_health() {
    let (base, rec) = fake_provider(StatusCode::OK, FAKE_MP3).await;
    service(base).probe().await.expect("healthy provider");

    let (_, body) = rec.last.lock().unwrap().take().unwrap();
    assert_eq!(body["text"], "Test");
    assert_eq!(body["voiceId"], "en-US-thomas");

    let (base, _) = fake_provider(StatusCode::SERVICE_UNAVAILABLE, b"maintenance").await;
    assert!(matches!(
        service(base).probe().await,
        Err(VoiceError::Upstream { status: 503, .. })
    ));
}

#[tokio::test]
async fn missing_key_is_config_error() {
    let tts = TtsService::new(TtsConfig::default()).unwrap();
    assert!(!tts.is_configured());
    assert!(matches!(tts.probe().await, Err(VoiceError::Config(_))));
}
