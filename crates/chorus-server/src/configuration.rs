use crate::error::{to_env_var, ConfigError};
use chorus::{
    policy::DEFAULT_BASE_POLICY,
    providers::{
        base::DEFAULT_TIMEOUT,
        configs::{
            self, ApiKey, DeepSeekProviderConfig, GeminiProviderConfig, OpenAiProviderConfig,
            ProviderConfig,
        },
    },
};
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the browser client, served for any path not matched by the API
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct PolicySettings {
    #[serde(default = "default_policy")]
    pub base: String,
}

/// Settings for one provider. Not `Debug` since it holds the credential.
#[derive(Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
}

#[derive(Deserialize)]
pub struct ProvidersSettings {
    pub openai: ProviderSettings,
    pub deepseek: ProviderSettings,
    pub gemini: ProviderSettings,
}

impl ProvidersSettings {
    // Convert to the chorus ProviderConfig list, skipping disabled providers
    pub fn into_configs(self) -> Vec<ProviderConfig> {
        let mut configs = Vec::new();

        if self.openai.enabled {
            let s = self.openai;
            configs.push(ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: s.host,
                api_key: ApiKey::from_optional(s.api_key),
                model: s.model,
                temperature: s.temperature,
                max_tokens: s.max_tokens,
            }));
        }
        if self.deepseek.enabled {
            let s = self.deepseek;
            configs.push(ProviderConfig::DeepSeek(DeepSeekProviderConfig {
                host: s.host,
                api_key: ApiKey::from_optional(s.api_key),
                model: s.model,
                temperature: s.temperature,
                max_tokens: s.max_tokens,
            }));
        }
        if self.gemini.enabled {
            let s = self.gemini;
            configs.push(ProviderConfig::Gemini(GeminiProviderConfig {
                host: s.host,
                api_key: ApiKey::from_optional(s.api_key),
                model: s.model,
                temperature: s.temperature,
                max_tokens: s.max_tokens,
            }));
        }

        configs
    }
}

#[derive(Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub policy: PolicySettings,
    pub providers: ProvidersSettings,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let builder = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("timeout_secs", DEFAULT_TIMEOUT.as_secs())?
            .set_default("policy.base", default_policy())?
            // Provider defaults
            .set_default("providers.openai.host", configs::OPENAI_HOST)?
            .set_default("providers.openai.model", configs::OPENAI_MODEL)?
            .set_default("providers.openai.temperature", f64::from(configs::DEFAULT_TEMPERATURE))?
            .set_default("providers.deepseek.host", configs::DEEPSEEK_HOST)?
            .set_default("providers.deepseek.model", configs::DEEPSEEK_MODEL)?
            .set_default("providers.deepseek.temperature", f64::from(configs::DEFAULT_TEMPERATURE))?
            .set_default("providers.gemini.host", configs::GEMINI_HOST)?
            .set_default("providers.gemini.model", configs::GEMINI_MODEL)?
            .set_default("providers.gemini.temperature", f64::from(configs::DEFAULT_TEMPERATURE))?;

        let config = with_plain_env_defaults(builder)?
            // Optional chorus.toml in the working directory
            .add_source(File::with_name("chorus").required(false))
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("CHORUS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::from_deserialize(err)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("timeout_secs"),
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

/// The unprefixed variables (`OPENAI_API_KEY`, `PORT`, ...) are honored as defaults so a plain
/// `.env` works. The `CHORUS_` forms override them.
fn with_plain_env_defaults(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let plain = [
        ("providers.openai.api_key", configs::OPENAI_API_KEY),
        ("providers.deepseek.api_key", configs::DEEPSEEK_API_KEY),
        ("providers.gemini.api_key", configs::GEMINI_API_KEY),
        ("server.port", "PORT"),
    ];

    for (key, var) in plain {
        if let Ok(value) = env::var(var) {
            builder = builder.set_default(key, value)?;
        }
    }
    Ok(builder)
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_policy() -> String {
    DEFAULT_BASE_POLICY.to_string()
}

fn default_enabled() -> bool {
    true
}
