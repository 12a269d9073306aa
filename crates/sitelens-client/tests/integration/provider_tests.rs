use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use sitelens_client::providers::MAX_OUTPUT_TOKENS;
use sitelens_client::{AnthropicAdapter, GeminiAdapter, OpenAiAdapter};
use sitelens_core::error::AppError;
use sitelens_core::models::PromptPair;
use sitelens_core::traits::Completer;

use crate::integration::common::{Recorder, spawn_stub};

fn prompt() -> PromptPair {
    PromptPair {
        system: "SYS".into(),
        user: "USER".into(),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
}

// ---------------------------------------------------------------------------
// OpenAI-compatible
// ---------------------------------------------------------------------------

fn openai_stub(recorder: Recorder) -> Router {
    Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.record(headers, body);
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "SUMMARY"}}]
                }))
            }
        }),
    )
}

#[tokio::test]
async fn openai_sends_system_and_user_messages() {
    let recorder = Recorder::default();
    let base = spawn_stub(openai_stub(recorder.clone())).await;
    let adapter = OpenAiAdapter::with_base_url("sk-test", "gpt-4o-mini", &format!("{base}/v1/")).unwrap();

    let text = adapter.complete(&prompt()).await.unwrap();

    assert_eq!(text, "SUMMARY");
    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(header(headers, "authorization"), "Bearer sk-test");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "SYS"},
            {"role": "user", "content": "USER"}
        ])
    );
}

#[tokio::test]
async fn ollama_uses_placeholder_key() {
    let recorder = Recorder::default();
    let base = spawn_stub(openai_stub(recorder.clone())).await;
    let adapter = OpenAiAdapter::ollama("llama3.2", &format!("{base}/v1")).unwrap();

    adapter.complete(&prompt()).await.unwrap();

    let (headers, body) = &recorder.requests()[0];
    assert_eq!(header(headers, "authorization"), "Bearer ollama");
    assert_eq!(body["model"], "llama3.2");
}

#[tokio::test]
async fn openai_error_body_becomes_llm_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"message": "Incorrect API key provided"}})),
            )
        }),
    );
    let base = spawn_stub(app).await;
    let adapter = OpenAiAdapter::with_base_url("bad", "gpt-4o-mini", &format!("{base}/v1")).unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    match err {
        AppError::LlmError {
            message,
            status_code,
        } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_maps_to_dedicated_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base = spawn_stub(app).await;
    let adapter = OpenAiAdapter::with_base_url("k", "gpt-4o-mini", &format!("{base}/v1")).unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    assert!(matches!(err, AppError::RateLimitExceeded));
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let base = spawn_stub(app).await;
    let adapter = OpenAiAdapter::with_base_url("k", "gpt-4o-mini", &format!("{base}/v1")).unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    assert!(err.to_string().contains("Empty response"));
}

#[tokio::test]
async fn slow_completion_times_out() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": []}))
        }),
    );
    let base = spawn_stub(app).await;
    let adapter = OpenAiAdapter::with_base_url("k", "gpt-4o-mini", &format!("{base}/v1"))
        .unwrap()
        .with_timeout(Duration::from_secs(1))
        .unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    assert!(matches!(err, AppError::Timeout(1)), "{err}");
}

#[tokio::test]
async fn sub_second_timeout_reports_whole_seconds() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": []}))
        }),
    );
    let base = spawn_stub(app).await;
    let adapter = OpenAiAdapter::with_base_url("k", "gpt-4o-mini", &format!("{base}/v1"))
        .unwrap()
        .with_timeout(Duration::from_millis(500))
        .unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    assert_eq!(err.to_string(), "Request timed out after 1 seconds");
}

// ---------------------------------------------------------------------------
// Anthropic
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anthropic_uses_top_level_system_prompt() {
    let recorder = Recorder::default();
    let captured = recorder.clone();
    let app = Router::new().route(
        "/v1/messages",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = captured.clone();
            async move {
                recorder.record(headers, body);
                Json(json!({
                    "id": "msg_1",
                    "type": "message",
                    "content": [{"type": "text", "text": "CLAUDE"}]
                }))
            }
        }),
    );
    let base = spawn_stub(app).await;
    let adapter =
        AnthropicAdapter::with_base_url("sk-ant", "claude-3-haiku-20240307", &format!("{base}/v1"))
            .unwrap();

    let text = adapter.complete(&prompt()).await.unwrap();

    assert_eq!(text, "CLAUDE");
    let (headers, body) = &recorder.requests()[0];
    assert_eq!(header(headers, "x-api-key"), "sk-ant");
    assert_eq!(header(headers, "anthropic-version"), "2023-06-01");
    assert_eq!(body["system"], "SYS");
    assert_eq!(body["max_tokens"], MAX_OUTPUT_TOKENS);
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "USER"}])
    );
}

#[tokio::test]
async fn anthropic_overloaded_is_retryable_llm_error() {
    let app = Router::new().route(
        "/v1/messages",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}})),
            )
        }),
    );
    let base = spawn_stub(app).await;
    let adapter =
        AnthropicAdapter::with_base_url("k", "claude-3-haiku-20240307", &format!("{base}/v1")).unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("Overloaded"));
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

fn gemini_stub(recorder: Recorder, generate_status: StatusCode) -> Router {
    Router::new()
        .route(
            "/v1beta/models",
            get(|| async {
                Json(json!({
                    "models": [
                        {"name": "models/gemini-1.5-flash"},
                        {"name": "models/gemini-1.5-pro"}
                    ]
                }))
            }),
        )
        .route(
            "/v1beta/models/{*rest}",
            post(
                move |Path(rest): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let recorder = recorder.clone();
                    async move {
                        let mut body = body;
                        body["_path"] = Value::String(rest);
                        recorder.record(headers, body);
                        if generate_status.is_success() {
                            (
                                generate_status,
                                Json(json!({
                                    "candidates": [{"content": {"parts": [{"text": "GEMINI"}]}}]
                                })),
                            )
                        } else {
                            (
                                generate_status,
                                Json(json!({"error": {"code": 404, "message": "model not found"}})),
                            )
                        }
                    }
                },
            ),
        )
}

#[tokio::test]
async fn gemini_concatenates_prompts() {
    let recorder = Recorder::default();
    let base = spawn_stub(gemini_stub(recorder.clone(), StatusCode::OK)).await;
    let adapter =
        GeminiAdapter::with_base_url("g-key", "gemini-1.5-flash", &format!("{base}/v1beta")).unwrap();

    let text = adapter.complete(&prompt()).await.unwrap();

    assert_eq!(text, "GEMINI");
    let (headers, body) = &recorder.requests()[0];
    assert_eq!(header(headers, "x-goog-api-key"), "g-key");
    assert_eq!(body["_path"], "gemini-1.5-flash:generateContent");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "SYS\n\nUSER");
}

#[tokio::test]
async fn gemini_accepts_prefixed_model_names() {
    let recorder = Recorder::default();
    let base = spawn_stub(gemini_stub(recorder.clone(), StatusCode::OK)).await;
    let adapter =
        GeminiAdapter::with_base_url("k", "models/gemini-1.5-pro", &format!("{base}/v1beta")).unwrap();

    adapter.complete(&prompt()).await.unwrap();

    assert_eq!(recorder.requests()[0].1["_path"], "gemini-1.5-pro:generateContent");
}

#[tokio::test]
async fn gemini_error_is_typed_without_diagnostics() {
    let base = spawn_stub(gemini_stub(Recorder::default(), StatusCode::NOT_FOUND)).await;
    let adapter =
        GeminiAdapter::with_base_url("k", "gemini-ultra", &format!("{base}/v1beta")).unwrap();

    let err = adapter.complete(&prompt()).await.unwrap_err();

    match err {
        AppError::LlmError {
            message,
            status_code,
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "model not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn gemini_diagnostics_list_available_models() {
    let base = spawn_stub(gemini_stub(Recorder::default(), StatusCode::NOT_FOUND)).await;
    let adapter = GeminiAdapter::with_base_url("k", "gemini-ultra", &format!("{base}/v1beta"))
        .unwrap()
        .with_model_diagnostics(true);

    let err = adapter.complete(&prompt()).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Error with Gemini model 'gemini-ultra'"), "{msg}");
    assert!(msg.contains("models/gemini-1.5-flash, models/gemini-1.5-pro"), "{msg}");
    assert!(msg.contains("Original error: model not found"), "{msg}");
}

#[tokio::test]
async fn gemini_list_models() {
    let base = spawn_stub(gemini_stub(Recorder::default(), StatusCode::OK)).await;
    let adapter =
        GeminiAdapter::with_base_url("k", "gemini-pro", &format!("{base}/v1beta")).unwrap();

    let models = adapter.list_models().await.unwrap();

    assert_eq!(models, vec!["models/gemini-1.5-flash", "models/gemini-1.5-pro"]);
}
