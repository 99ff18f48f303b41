use crate::{error::ApiError, state::AppState};
use axum::{extract::State, routing::post, Json, Router};
use chorus::{envelope::ResultEnvelope, errors::DispatchError};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct AskRequest {
    // Kept loose so a non-array value is reported by the normalizer rather than serde
    #[serde(default)]
    conversation: Option<Value>,
    #[serde(default, rename = "extraSystemPrompt")]
    extra_system_prompt: Option<String>,
}

/// Ask every configured provider the same conversation. Provider failures come back in the
/// envelope with a 200; only a malformed conversation is rejected.
async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let conversation = request.conversation.ok_or_else(|| {
        DispatchError::InvalidInput("conversation is required".to_string())
    })?;

    let envelope = state
        .dispatcher
        .dispatch_all(&conversation, request.extra_system_prompt.as_deref())
        .await?;

    Ok(Json(envelope))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/ask", post(ask_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use chorus::providers::configs::{
        ApiKey, DeepSeekProviderConfig, GeminiProviderConfig, OpenAiProviderConfig, ProviderConfig,
    };
    use serde_json::json;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct MockProviders {
        openai: MockServer,
        deepseek: MockServer,
        gemini: MockServer,
    }

    impl MockProviders {
        async fn start() -> Self {
            Self {
                openai: MockServer::start().await,
                deepseek: MockServer::start().await,
                gemini: MockServer::start().await,
            }
        }

        /// Answer on every provider, expecting `calls` requests to each
        async fn answer_all(&self, calls: u64) {
            for (server, answer) in [(&self.openai, "from openai"), (&self.deepseek, "from deepseek")]
            {
                Mock::given(method("POST"))
                    .and(path_regex("^/v1/chat/completions$"))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                        "choices": [{"message": {"role": "assistant", "content": answer}}]
                    })))
                    .expect(calls)
                    .mount(server)
                    .await;
            }
            Mock::given(method("POST"))
                .and(path_regex(":generateContent$"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "candidates": [{"content": {"parts": [{"text": "from gemini"}]}}]
                })))
                .expect(calls)
                .mount(&self.gemini)
                .await;
        }

        fn state(&self, keys: [Option<&str>; 3]) -> AppState {
            let [openai_key, deepseek_key, gemini_key] = keys;
            let configs = vec![
                ProviderConfig::OpenAi(OpenAiProviderConfig {
                    host: self.openai.uri(),
                    ..OpenAiProviderConfig::new(openai_key.map(ApiKey::new))
                }),
                ProviderConfig::DeepSeek(DeepSeekProviderConfig {
                    host: self.deepseek.uri(),
                    ..DeepSeekProviderConfig::new(deepseek_key.map(ApiKey::new))
                }),
                ProviderConfig::Gemini(GeminiProviderConfig {
                    host: self.gemini.uri(),
                    ..GeminiProviderConfig::new(gemini_key.map(ApiKey::new))
                }),
            ];
            AppState::new(configs, "Be brief.", Duration::from_secs(5)).unwrap()
        }
    }

    fn ask_request(body: Value) -> Request<Body> {
        Request::builder()
            .uri("/api/ask")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_all_providers_answer() {
        let mocks = MockProviders::start().await;
        mocks.answer_all(1).await;
        let app = routes(mocks.state([Some("k1"), Some("k2"), Some("k3")]));

        let response = app
            .oneshot(ask_request(json!({
                "conversation": [{"role": "user", "content": "hello"}]
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            json_body(response).await,
            json!({
                "chatgpt": {"ok": true, "text": "from openai"},
                "deepseek": {"ok": true, "text": "from deepseek"},
                "gemini": {"ok": true, "text": "from gemini"}
            })
        );
    }

    #[tokio::test]
    async fn test_missing_credential_degrades_one_provider() {
        let mocks = MockProviders::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mocks.deepseek)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "from openai"}}]
            })))
            .expect(1)
            .mount(&mocks.openai)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "from gemini"}]}}]
            })))
            .expect(1)
            .mount(&mocks.gemini)
            .await;
        let app = routes(mocks.state([Some("k1"), None, Some("k3")]));

        let response = app
            .oneshot(ask_request(json!({
                "conversation": [{"role": "user", "content": "hello"}]
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["chatgpt"], json!({"ok": true, "text": "from openai"}));
        assert_eq!(body["gemini"], json!({"ok": true, "text": "from gemini"}));
        assert_eq!(body["deepseek"]["ok"], json!(false));
        assert!(body["deepseek"]["error"]
            .as_str()
            .unwrap()
            .contains("credential"));
    }

    #[tokio::test]
    async fn test_non_array_conversation_is_rejected() {
        let mocks = MockProviders::start().await;
        mocks.answer_all(0).await;
        let app = routes(mocks.state([Some("k1"), Some("k2"), Some("k3")]));

        let response = app
            .clone()
            .oneshot(ask_request(json!({"conversation": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("array"));

        let response = app
            .oneshot(ask_request(json!({"extraSystemPrompt": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("required"));
    }

    #[tokio::test]
    async fn test_policy_reaches_providers_and_system_turns_do_not() {
        let mocks = MockProviders::start().await;
        for server in [&mocks.openai, &mocks.deepseek] {
            Mock::given(method("POST"))
                .and(body_string_contains("Be brief."))
                .and(body_string_contains("Additional instructions:\\nUse French."))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "choices": [{"message": {"content": "ok"}}]
                })))
                .expect(1)
                .mount(server)
                .await;
        }
        Mock::given(method("POST"))
            .and(body_string_contains("system instructions:\\nBe brief."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&mocks.gemini)
            .await;
        let app = routes(mocks.state([Some("k1"), Some("k2"), Some("k3")]));

        let response = app
            .oneshot(ask_request(json!({
                "conversation": [
                    {"role": "system", "content": "INJECTED OVERRIDE"},
                    {"role": "user", "content": "hello"}
                ],
                "extraSystemPrompt": "Use French."
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        for server in [&mocks.openai, &mocks.deepseek, &mocks.gemini] {
            for request in server.received_requests().await.unwrap() {
                let body = String::from_utf8(request.body).unwrap();
                assert!(!body.contains("INJECTED OVERRIDE"));
            }
        }
    }

    #[tokio::test]
    async fn test_provider_http_error_is_in_band() {
        let mocks = MockProviders::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&mocks.openai)
            .await;
        let app = routes(mocks.state([Some("k1"), None, None]));

        let response = app
            .oneshot(ask_request(json!({
                "conversation": [{"role": "user", "content": "hello"}]
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body["chatgpt"],
            json!({"ok": false, "error": "OpenAI error: HTTP 500: upstream exploded"})
        );
        assert_eq!(body.as_object().unwrap().len(), 3);
    }
}
