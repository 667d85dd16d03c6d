//! Chat-completion client used to summarize individual pages.
//!
//! The hosted provider speaks the OpenAI-compatible `/chat/completions` protocol (Groq by
//! default). Each prompt is sent as a single user-role message to a fixed model. Failures are
//! returned as [`SummarizationClientError`] by the client and collapsed into a
//! [`SummaryOutcome::Failed`] by [`summarize_prompt`], so one bad page never aborts a document.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Prefix rendered in place of a page summary when the provider call fails.
pub const SUMMARY_ERROR_PREFIX: &str = "⚠️ Error during summarization: ";

/// Errors surfaced while requesting a page summary.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// No API credential was configured for the provider.
    #[error("missing API credential (set GROQ_API_KEY)")]
    MissingCredential,
    /// Provider was unreachable.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider rejected the request (auth, rate limiting, server errors).
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Send a fully constructed prompt and return the provider's textual reply.
    async fn complete(&self, prompt: &str) -> Result<String, SummarizationClientError>;

    /// Model identifier used for every request.
    fn model(&self) -> &str;
}

/// Outcome of summarizing one page.
///
/// Callers that only need display text use [`SummaryOutcome::display_text`]; callers that
/// care about failures can match on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum SummaryOutcome {
    /// The provider produced a summary.
    Summary(String),
    /// The provider call failed; carries the error detail.
    Failed(String),
}

impl SummaryOutcome {
    /// Text shown to the user for this page.
    pub fn display_text(&self) -> String {
        match self {
            Self::Summary(text) => text.clone(),
            Self::Failed(details) => format!("{SUMMARY_ERROR_PREFIX}{details}"),
        }
    }

    /// Whether the provider call failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Request a summary for `prompt`, converting any provider failure into an inline outcome.
pub async fn summarize_prompt(client: &dyn SummarizationClient, prompt: &str) -> SummaryOutcome {
    match client.complete(prompt).await {
        Ok(text) => SummaryOutcome::Summary(text),
        Err(error) => {
            tracing::warn!(error = %error, model = client.model(), "Summarization failed");
            SummaryOutcome::Failed(error.to_string())
        }
    }
}

/// Build the process-wide summarization client from configuration.
pub fn build_summarization_client(
    config: &Config,
) -> Result<Arc<dyn SummarizationClient>, SummarizationClientError> {
    let client = ChatCompletionClient::new(
        config.summarization_base_url.clone(),
        config.summarization_model.clone(),
        config.groq_api_key.clone(),
    )?;
    Ok(Arc::new(client))
}

/// OpenAI-compatible chat-completions client.
pub struct ChatCompletionClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatCompletionClient {
    /// Construct a client for `base_url` (e.g. `https://api.groq.com/openai/v1`).
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent(concat!("smartsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url,
            model,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

#[async_trait]
impl SummarizationClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, SummarizationClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizationClientError::MissingCredential)?;

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SummarizationClientError::GenerationFailed(format!(
                "rate limited by provider ({status})"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode chat completion: {error}"
            ))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("response contained no choices".into())
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
