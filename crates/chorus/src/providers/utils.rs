use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::models::message::Conversation;
use crate::policy::PolicyText;

lazy_static! {
    static ref MARKUP_COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref MARKUP_TAG: Regex =
        Regex::new(r#"</?[A-Za-z][A-Za-z0-9:-]*(?:\s+[^<>]*)?/?>"#).unwrap();
}

/// Strip markup tags from provider output, leaving the text between them.
///
/// Comparisons such as `a < b` are left alone since a tag must start with a letter.
pub fn sanitize_markup(text: &str) -> String {
    let without_comments = MARKUP_COMMENT.replace_all(text, "");
    MARKUP_TAG.replace_all(&without_comments, "").to_string()
}

/// Leading user turn carrying the policy for providers without a native system role
pub fn synthesized_preamble(policy: &PolicyText) -> String {
    format!("system instructions:\n{}", policy)
}

/// Render the policy and conversation as an OpenAI chat-completions `messages` array.
///
/// The policy is always the first entry, in the native `system` role.
pub fn messages_to_openai_spec(policy: &PolicyText, conversation: &Conversation) -> Vec<Value> {
    let mut messages_spec = Vec::with_capacity(conversation.len() + 1);
    messages_spec.push(json!({
        "role": "system",
        "content": policy.as_str()
    }));

    for message in conversation.iter() {
        messages_spec.push(json!({
            "role": message.role.as_str(),
            "content": message.content
        }));
    }

    messages_spec
}

/// Chat-completions request body shared by the OpenAI-compatible adapters
pub fn openai_chat_payload(
    model: &str,
    temperature: Option<f32>,
    max_tokens: Option<i32>,
    policy: &PolicyText,
    conversation: &Conversation,
) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": messages_to_openai_spec(policy, conversation)
    });

    if let Some(obj) = payload.as_object_mut() {
        if let Some(temp) = temperature {
            obj.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = max_tokens {
            obj.insert("max_tokens".to_string(), json!(tokens));
        }
    }

    payload
}

/// Extract the answer from an OpenAI style response, treating a missing field as empty text
pub fn openai_response_text(response: &Value) -> String {
    response["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

/// Turn a non-2xx response into [`ProviderError::Http`] carrying the status and body
pub async fn handle_response(response: Response, budget: Duration) -> Result<Value, ProviderError> {
    let status = response.status();
    if status.is_success() {
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, budget))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&body)
            .map_err(|e| ProviderError::Transport(format!("invalid JSON in response: {}", e)));
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Http {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}
