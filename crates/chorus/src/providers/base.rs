use async_trait::async_trait;
use std::time::{Duration, Instant};

use super::utils::sanitize_markup;
use crate::envelope::ProviderResult;
use crate::errors::ProviderError;
use crate::models::message::Conversation;
use crate::policy::PolicyText;

/// Per-call budget used when the deployment does not configure one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base trait for LLM providers (OpenAI, DeepSeek, Gemini)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Key identifying this provider in the result envelope
    fn name(&self) -> &str;

    /// Human readable name used in error messages
    fn display_name(&self) -> &str;

    /// Budget for a single call, including connect and response body
    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Send the policy and conversation in this provider's wire format and return the raw answer text
    async fn complete(
        &self,
        policy: &PolicyText,
        conversation: &Conversation,
    ) -> Result<String, ProviderError>;

    /// Ask the provider under its deadline and fold every outcome into a [`ProviderResult`].
    ///
    /// Markup in the answer is stripped. Failures are reported as text, never propagated.
    async fn ask(&self, conversation: &Conversation, policy: &PolicyText) -> ProviderResult {
        let started = Instant::now();
        let budget = self.timeout();

        let outcome = match tokio::time::timeout(budget, self.complete(policy, conversation)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderError::Timeout(budget)),
        };

        match outcome {
            Ok(text) => {
                tracing::debug!(
                    provider = self.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "provider answered"
                );
                ProviderResult::success(sanitize_markup(&text))
            }
            Err(err) => {
                tracing::warn!(
                    provider = self.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "provider failed"
                );
                ProviderResult::failure(format!("{} error: {}", self.display_name(), err))
            }
        }
    }
}
