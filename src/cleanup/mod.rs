pub mod local;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::settings::Settings;

pub use local::clean_locally;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that cleans OCR text from Aadhaar cards. \
     Fix OCR errors, normalize Aadhaar numbers into '1234 5678 9012' format (do not mask), \
     standardize dates into DD/MM/YYYY, and remove any garbage text.";

/// Client for the external text-cleanup service (Mistral chat completions).
/// `cleanup` is total: every failure degrades to [`local::clean_locally`].
#[derive(Debug, Clone)]
pub struct CleanupClient {
    client: reqwest::Client,
    base_url: String,
    key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl CleanupClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.cleanup_timeout_secs))
            .build()
            .with_context(|| "failed to build cleanup http client")?;
        Ok(Self {
            client,
            base_url: settings.cleanup_base_url.clone(),
            key: resolve_key(),
            model: settings.cleanup_model.clone(),
            max_tokens: settings.cleanup_max_tokens,
            temperature: settings.cleanup_temperature,
        })
    }

    pub async fn cleanup(&self, raw_text: &str) -> String {
        match self.request_cleanup(raw_text).await {
            Ok(text) => text,
            Err(err) => {
                warn!("cleanup service failed, using local cleaner: {:#}", err);
                local::clean_locally(raw_text)
            }
        }
    }

    async fn request_cleanup(&self, raw_text: &str) -> Result<String> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| anyhow!("MISTRAL_API_KEY is not set"))?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": raw_text},
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!(
                "cleanup API error ({}): {}",
                status,
                extract_api_error(&text).unwrap_or(text)
            ));
        }
        extract_content(&text)
    }
}

fn resolve_key() -> Option<String> {
    std::env::var("MISTRAL_API_KEY")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn extract_content(text: &str) -> Result<String> {
    let payload: ChatResponse =
        serde_json::from_str(text).with_context(|| "failed to parse cleanup response JSON")?;
    let content = payload
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .unwrap_or_default();
    if content.is_empty() {
        return Err(anyhow!("cleanup response content is empty"));
    }
    Ok(content.to_string())
}

fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<NestedError>,
    }

    #[derive(Deserialize)]
    struct NestedError {
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or_else(|| parsed.error.and_then(|error| error.message))
        .filter(|message| !message.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
