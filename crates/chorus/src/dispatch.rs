use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::envelope::{ProviderResult, ResultEnvelope};
use crate::errors::{DispatchError, ProviderError};
use crate::normalize::normalize;
use crate::policy::PolicyText;
use crate::providers::base::Provider;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory::get_provider;

/// Fans one conversation out to every configured provider and collects all outcomes.
///
/// Each provider runs in its own task, so a slow, failing or panicking provider never
/// delays or cancels the others beyond its own deadline.
#[derive(Clone)]
pub struct Dispatcher {
    providers: Vec<Arc<dyn Provider>>,
    base_policy: Arc<str>,
}

impl Dispatcher {
    pub fn new(providers: Vec<Arc<dyn Provider>>, base_policy: impl Into<String>) -> Self {
        Self {
            providers,
            base_policy: Arc::from(base_policy.into()),
        }
    }

    /// Build one adapter per config, all sharing the same per-call budget
    pub fn from_configs(
        configs: Vec<ProviderConfig>,
        base_policy: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let providers = configs
            .into_iter()
            .map(|config| get_provider(config, timeout).map(Arc::<dyn Provider>::from))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(providers, base_policy))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn policy(&self, addendum: Option<&str>) -> PolicyText {
        PolicyText::build(&self.base_policy, addendum)
    }

    /// Validate the raw conversation, then ask every provider concurrently.
    ///
    /// Only malformed input fails the request. Provider failures are reported in the envelope.
    pub async fn dispatch_all(
        &self,
        raw_conversation: &Value,
        policy_addendum: Option<&str>,
    ) -> Result<ResultEnvelope, DispatchError> {
        let conversation = Arc::new(normalize(raw_conversation)?);
        let policy = Arc::new(self.policy(policy_addendum));
        let started = Instant::now();

        tracing::info!(
            providers = self.providers.len(),
            turns = conversation.len(),
            "dispatching conversation"
        );

        let handles = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let conversation = Arc::clone(&conversation);
            let policy = Arc::clone(&policy);
            tokio::spawn(async move { provider.ask(&conversation, &policy).await })
        });
        let outcomes = join_all(handles).await;

        let mut envelope = ResultEnvelope::new();
        for (provider, outcome) in self.providers.iter().zip(outcomes) {
            let result = outcome.unwrap_or_else(|err| {
                tracing::error!(provider = provider.name(), error = %err, "provider task aborted");
                ProviderResult::failure(format!(
                    "{} error: {}",
                    provider.display_name(),
                    ProviderError::Internal
                ))
            });
            envelope.insert(provider.name(), result);
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            succeeded = envelope.iter().filter(|(_, r)| r.is_ok()).count(),
            "dispatch settled"
        );

        Ok(envelope)
    }
}
