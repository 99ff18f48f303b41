use super::{
    base::Provider,
    configs::{DeepSeekProviderConfig, GeminiProviderConfig, OpenAiProviderConfig, ProviderConfig},
    deepseek::DeepSeekProvider,
    gemini::GeminiProvider,
    openai::OpenAiProvider,
};
use anyhow::Result;
use std::time::Duration;
use strum_macros::EnumIter;

#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAi,
    DeepSeek,
    Gemini,
}

impl ProviderType {
    /// Key used in the result envelope and configuration
    pub fn key(&self) -> &'static str {
        match self {
            ProviderType::OpenAi => "chatgpt",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Gemini => "gemini",
        }
    }

    /// A config with default host and model and no credential
    pub fn default_config(&self) -> ProviderConfig {
        match self {
            ProviderType::OpenAi => ProviderConfig::OpenAi(OpenAiProviderConfig::new(None)),
            ProviderType::DeepSeek => ProviderConfig::DeepSeek(DeepSeekProviderConfig::new(None)),
            ProviderType::Gemini => ProviderConfig::Gemini(GeminiProviderConfig::new(None)),
        }
    }
}

impl ProviderConfig {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderConfig::OpenAi(_) => ProviderType::OpenAi,
            ProviderConfig::DeepSeek(_) => ProviderType::DeepSeek,
            ProviderConfig::Gemini(_) => ProviderType::Gemini,
        }
    }

    pub fn has_credential(&self) -> bool {
        match self {
            ProviderConfig::OpenAi(config) => config.api_key.is_some(),
            ProviderConfig::DeepSeek(config) => config.api_key.is_some(),
            ProviderConfig::Gemini(config) => config.api_key.is_some(),
        }
    }
}

pub fn get_provider(config: ProviderConfig, timeout: Duration) -> Result<Box<dyn Provider>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => {
            Ok(Box::new(OpenAiProvider::new(openai_config, timeout)?))
        }
        ProviderConfig::DeepSeek(deepseek_config) => {
            Ok(Box::new(DeepSeekProvider::new(deepseek_config, timeout)?))
        }
        ProviderConfig::Gemini(gemini_config) => {
            Ok(Box::new(GeminiProvider::new(gemini_config, timeout)?))
        }
    }
}
