use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The outcome of asking one provider.
///
/// Serializes as `{"ok": true, "text": ...}` or `{"ok": false, "error": ...}`. The fields are
/// private so a result is always exactly one of the two shapes. Deserializing rejects anything
/// else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProviderResult")]
pub struct ProviderResult {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProviderResult {
    pub fn success<S: Into<String>>(text: S) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Deserialize)]
struct RawProviderResult {
    ok: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawProviderResult> for ProviderResult {
    type Error = String;

    fn try_from(raw: RawProviderResult) -> Result<Self, Self::Error> {
        match (raw.ok, raw.text, raw.error) {
            (true, Some(text), None) => Ok(Self::success(text)),
            (false, None, Some(error)) => Ok(Self::failure(error)),
            (true, _, _) => Err("a successful result carries `text` and no `error`".to_string()),
            (false, _, _) => Err("a failed result carries `error` and no `text`".to_string()),
        }
    }
}

/// One [`ProviderResult`] per configured provider, keyed by provider name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultEnvelope(BTreeMap<String, ProviderResult>);

impl ResultEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, provider: S, result: ProviderResult) {
        self.0.insert(provider.into(), result);
    }

    pub fn get(&self, provider: &str) -> Option<&ProviderResult> {
        self.0.get(provider)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProviderResult)> {
        self.0.iter()
    }
}
