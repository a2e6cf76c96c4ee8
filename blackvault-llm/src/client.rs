use std::env;
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Upper bound on one completion call; a hung provider surfaces as an
/// upstream failure instead of suspending the request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// OpenAI-compatible chat completion wire format.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the completion provider. Treated as an opaque dependency: one
/// request in, one reply string (or a failure) out, no retries.
#[derive(Clone, Debug)]
pub struct CompletionService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionService {
    /// Build the service from `OPENAI_*` variables, or return `None` when no
    /// API key is configured so the gateway can boot without a provider.
    pub fn from_env_optional() -> anyhow::Result<Option<Self>> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match api_key {
            Some(api_key) => Ok(Some(Self::new(api_key)?)),
            None => Ok(None),
        }
    }

    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let model = env::var("OPENAI_MODEL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build completion http client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Send the fixed system instruction plus the player prompt and return
    /// the provider's reply text.
    pub async fn generate_reply(&self, prompt: &str) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_owned(),
                    content: crate::prompt::system_prompt(),
                },
                ChatMessage {
                    role: "user".to_owned(),
                    content: prompt.to_owned(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, "requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("completion provider returned {status}: {body}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("failed to parse completion response")?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("completion response contained no choices")?;

        Ok(reply.trim().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRequest, ChatResponse};

    #[test]
    fn response_parsing_takes_the_first_choice() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Hi there" } },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
            ]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Hi there");
    }

    #[test]
    fn request_serializes_system_then_user() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo".to_owned(),
            messages: vec![
                ChatMessage {
                    role: "system".to_owned(),
                    content: "instruction".to_owned(),
                },
                ChatMessage {
                    role: "user".to_owned(),
                    content: "Hello".to_owned(),
                },
            ],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
    }
}
