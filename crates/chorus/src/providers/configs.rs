use std::fmt;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const DEEPSEEK_API_KEY: &str = "DEEPSEEK_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEEPSEEK_HOST: &str = "https://api.deepseek.com";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A provider credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    /// Treat blank keys the same as missing ones
    pub fn from_optional(key: Option<String>) -> Option<Self> {
        key.filter(|k| !k.trim().is_empty()).map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// Unified enum to wrap different provider configurations
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
    DeepSeek(DeepSeekProviderConfig),
    Gemini(GeminiProviderConfig),
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            host: OPENAI_HOST.to_string(),
            api_key,
            model: OPENAI_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeepSeekProviderConfig {
    pub host: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl DeepSeekProviderConfig {
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            host: DEEPSEEK_HOST.to_string(),
            api_key,
            model: DEEPSEEK_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    pub host: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl GeminiProviderConfig {
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            host: GEMINI_HOST.to_string(),
            api_key,
            model: GEMINI_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
        }
    }
}
