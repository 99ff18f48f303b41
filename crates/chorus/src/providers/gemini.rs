use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::Provider;
use super::configs::{GeminiProviderConfig, GEMINI_API_KEY};
use super::utils::{handle_response, synthesized_preamble};
use crate::errors::ProviderError;
use crate::models::message::Conversation;
use crate::models::role::Role;
use crate::policy::PolicyText;

/// Google Gemini `generateContent`.
///
/// Gemini has no system role in `contents`, so the policy travels as a leading user turn
/// and assistant turns are relabeled `model`. The key is passed as a query parameter.
pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            config,
            timeout,
        })
    }

    fn messages_to_gemini_spec(policy: &PolicyText, conversation: &Conversation) -> Vec<Value> {
        let mut contents = Vec::with_capacity(conversation.len() + 1);
        contents.push(json!({
            "role": "user",
            "parts": [{"text": synthesized_preamble(policy)}]
        }));

        for message in conversation.iter() {
            let role = match message.role {
                Role::Assistant => "model",
                Role::User | Role::System => "user",
            };
            contents.push(json!({
                "role": role,
                "parts": [{"text": message.content}]
            }));
        }

        contents
    }

    fn response_text(response: &Value) -> String {
        response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    async fn post(&self, api_key: &str, payload: Value) -> Result<Value, ProviderError> {
        // The URL carries the key, so it must never reach a log line or error message
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        handle_response(response, self.timeout).await
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn display_name(&self) -> &str {
        "Gemini"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn complete(
        &self,
        policy: &PolicyText,
        conversation: &Conversation,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingCredential {
                env_var: GEMINI_API_KEY.to_string(),
            })?;

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = self.config.temperature {
            generation_config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = self.config.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(tokens));
        }

        let payload = json!({
            "contents": Self::messages_to_gemini_spec(policy, conversation),
            "generationConfig": generation_config
        });

        let response = self.post(api_key.expose(), payload).await?;
        Ok(Self::response_text(&response))
    }
}
