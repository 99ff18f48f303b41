use chorus::{dispatch::Dispatcher, providers::configs::ProviderConfig};
use serde::Serialize;
use std::{sync::Arc, time::Duration};

/// A provider as advertised to clients. Never carries the credential itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub configured: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub providers: Arc<Vec<ProviderInfo>>,
}

impl AppState {
    pub fn new(
        configs: Vec<ProviderConfig>,
        base_policy: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let providers = configs
            .iter()
            .map(|config| ProviderInfo {
                name: config.provider_type().key().to_string(),
                configured: config.has_credential(),
            })
            .collect();
        let dispatcher = Dispatcher::from_configs(configs, base_policy, timeout)?;

        Ok(Self {
            dispatcher,
            providers: Arc::new(providers),
        })
    }
}
