//! Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::generator::{GenerateError, TextGenerator};

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GenerateError> {
        let http = Client::builder().timeout(timeout).build()?;
        info!(base_url, model, "Gemini client configured");
        Ok(Self {
            model: model.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request_body(prompt: &str) -> serde_json::Value {
        let safety: Vec<_> = SAFETY_CATEGORIES
            .iter()
            .map(|category| {
                json!({
                    "category": category,
                    "threshold": "BLOCK_MEDIUM_AND_ABOVE",
                })
            })
            .collect();

        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "safetySettings": safety,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "complete: called");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout(self.timeout)
                } else {
                    GenerateError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "complete: provider returned error");
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = serde_json::from_str(&response.text().await?)?;
        body.text()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn text(self) -> Result<String, GenerateError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerateError::InvalidResponse(format!("prompt blocked: {reason}")));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerateError::InvalidResponse("No response from AI model".to_string()));
        }
        Ok(text)
    }
}
