use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::base::Provider;
use super::configs::{OpenAiProviderConfig, OPENAI_API_KEY};
use super::utils::{handle_response, openai_chat_payload, openai_response_text};
use crate::errors::ProviderError;
use crate::models::message::Conversation;
use crate::policy::PolicyText;

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            config,
            timeout,
        })
    }

    fn build_payload(&self, policy: &PolicyText, conversation: &Conversation) -> Value {
        openai_chat_payload(
            &self.config.model,
            self.config.temperature,
            self.config.max_tokens,
            policy,
            conversation,
        )
    }

    async fn post(&self, api_key: &str, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        handle_response(response, self.timeout).await
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "chatgpt"
    }

    fn display_name(&self) -> &str {
        "OpenAI"
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
                env_var: OPENAI_API_KEY.to_string(),
            })?;

        let payload = self.build_payload(policy, conversation);
        let response = self.post(api_key.expose(), payload).await?;

        Ok(openai_response_text(&response))
    }
}
