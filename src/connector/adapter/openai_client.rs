use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{
    ChatMessage, Choice, CompletionInput, CompletionRequest, CompletionResponse, DomainError,
    Usage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const RESPONSES_PATH: &str = "/responses";
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completions budgets count hidden reasoning tokens against the visible
/// output limit, so the configured budget is scaled up on that endpoint.
pub const REASONING_TOKEN_MULTIPLIER: u32 = 4;

// ---- Responses API (flat prompt) ----

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    text: TextOptions<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<ReasoningOptions<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct TextOptions<'a> {
    verbosity: &'a str,
    format: FormatOptions<'a>,
}

#[derive(Serialize)]
struct FormatOptions<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct ReasoningOptions<'a> {
    effort: &'a str,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

#[derive(Deserialize)]
struct IncompleteDetails {
    reason: Option<String>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
    #[serde(default)]
    output_tokens_details: Option<ReasoningDetails>,
}

// ---- Chat Completions API (role list) ----

#[derive(Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    finish_reason: Option<String>,
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
    #[serde(default)]
    completion_tokens_details: Option<ReasoningDetails>,
}

#[derive(Deserialize)]
struct ReasoningDetails {
    reasoning_tokens: Option<u64>,
}

impl From<ResponsesResponse> for CompletionResponse {
    fn from(response: ResponsesResponse) -> Self {
        let finish_reason = response
            .incomplete_details
            .and_then(|d| d.reason)
            .or(response.status);

        let choices = response
            .output
            .into_iter()
            .filter(|item| item.kind == "message")
            .map(|item| {
                let text: String = item
                    .content
                    .into_iter()
                    .filter(|c| c.kind == "output_text")
                    .filter_map(|c| c.text)
                    .collect();
                Choice {
                    finish_reason: finish_reason.clone(),
                    text: Some(text),
                }
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            total_tokens: u.total_tokens,
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
            reasoning_tokens: u.output_tokens_details.and_then(|d| d.reasoning_tokens),
        });

        CompletionResponse { choices, usage }
    }
}

impl From<ChatCompletionsResponse> for CompletionResponse {
    fn from(response: ChatCompletionsResponse) -> Self {
        let choices = response
            .choices
            .into_iter()
            .map(|c| Choice {
                finish_reason: c.finish_reason,
                text: c.message.content,
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            total_tokens: u.total_tokens,
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            reasoning_tokens: u.completion_tokens_details.and_then(|d| d.reasoning_tokens),
        });

        CompletionResponse { choices, usage }
    }
}

/// HTTP client for the OpenAI API (and compatible endpoints).
///
/// Flat prompts go to the Responses endpoint together with the verbosity,
/// format and reasoning-effort options; role lists go to Chat Completions.
/// Both replies are normalised into a [`CompletionResponse`].
///
/// Non-2xx replies become [`DomainError::RemoteCall`] with a message of the
/// form `API returned 429 Too Many Requests: <body>`, so callers can look for
/// the status code or the error code in the text.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    /// Base URL without trailing slash, e.g. `https://api.openai.com/v1`.
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, DomainError>
    where
        T: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("OpenAiClient: POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::remote(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::remote(format!("API returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::remote(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, DomainError> {
        match &request.input {
            CompletionInput::Prompt(prompt) => {
                let body = ResponsesRequest {
                    model: &request.model,
                    input: prompt,
                    max_output_tokens: request.max_tokens,
                    text: TextOptions {
                        verbosity: request.verbosity.as_str(),
                        format: FormatOptions {
                            kind: request.text_format.as_str(),
                        },
                    },
                    reasoning: request.reasoning_effort.map(|effort| ReasoningOptions {
                        effort: effort.as_str(),
                    }),
                    temperature: request.temperature,
                };
                let response: ResponsesResponse = self.post(RESPONSES_PATH, &body).await?;
                Ok(response.into())
            }
            CompletionInput::Messages(messages) => {
                let body = ChatCompletionsRequest {
                    model: &request.model,
                    messages,
                    max_completion_tokens: request
                        .max_tokens
                        .saturating_mul(REASONING_TOKEN_MULTIPLIER),
                    temperature: request.temperature,
                };
                let response: ChatCompletionsResponse =
                    self.post(CHAT_COMPLETIONS_PATH, &body).await?;
                Ok(response.into())
            }
        }
    }

    fn backend_name(&self) -> &str {
        "openai"
    }
}
