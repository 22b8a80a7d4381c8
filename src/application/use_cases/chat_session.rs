use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::CompletionClient;
use crate::domain::{DomainError, SessionConfig, Transcript, Usage};

use super::PromptRenderer;

/// Returned (and stored as the assistant turn) when the model answers with no text.
pub const NO_CONTENT_MARKER: &str = "[No content in response]";

/// Remediation shown when the remote service reports a quota or rate-limit problem.
pub const QUOTA_REMEDIATION: &str = "\
It looks like there's a quota issue with your OpenAI account. Please check:
1. Your billing is set up at https://platform.openai.com/account/billing
2. You have credits available
3. Your API key is valid and active";

const QUOTA_MARKERS: [&str; 2] = ["insufficient_quota", "429"];

/// A failed remote call, kept as the raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    message: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the message carries one of the quota / rate-limit markers.
    pub fn is_quota(&self) -> bool {
        QUOTA_MARKERS.iter().any(|m| self.message.contains(m))
    }

    /// Human-readable text shown in place of a reply.
    pub fn diagnostic(&self) -> String {
        if self.is_quota() {
            QUOTA_REMEDIATION.to_string()
        } else {
            format!("Error: {}", self.message)
        }
    }
}

/// Result of one [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The model produced text; it was stored as the assistant turn.
    Reply(String),
    /// The call succeeded but carried no text; [`NO_CONTENT_MARKER`] was stored.
    NoContent,
    /// The call failed; only the user turn was stored.
    Failed(RemoteFailure),
}

impl SubmitOutcome {
    /// Text to show the user for this outcome.
    pub fn text(&self) -> String {
        match self {
            SubmitOutcome::Reply(text) => text.clone(),
            SubmitOutcome::NoContent => NO_CONTENT_MARKER.to_string(),
            SubmitOutcome::Failed(failure) => failure.diagnostic(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::Failed(_))
    }
}

/// Owns the transcript of one conversation and talks to the completion backend.
///
/// Exactly one remote call is made per [`submit`](Self::submit). The caller
/// awaits it before reading the next line, so the transcript is never touched
/// concurrently.
pub struct ChatSession {
    id: Uuid,
    config: SessionConfig,
    renderer: PromptRenderer,
    client: Arc<dyn CompletionClient>,
    transcript: Transcript,
    last_usage: Option<Usage>,
}

impl ChatSession {
    pub fn new(config: SessionConfig, client: Arc<dyn CompletionClient>) -> Self {
        let renderer = PromptRenderer::for_mode(config.render_mode());
        let id = Uuid::new_v4();
        info!(
            "Session {} started: model={} mode={} backend={}",
            id,
            config.model(),
            renderer.mode().as_str(),
            client.backend_name()
        );
        Self {
            id,
            config,
            renderer,
            client,
            transcript: Transcript::new(),
            last_usage: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn renderer(&self) -> PromptRenderer {
        self.renderer
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn last_usage(&self) -> Option<&Usage> {
        self.last_usage.as_ref()
    }

    /// Append the user turn, call the model once, and record the reply.
    ///
    /// Remote failures do not surface as `Err`: they come back as
    /// [`SubmitOutcome::Failed`] and leave the user turn in place. The only
    /// error is blank input, which is rejected before anything is stored.
    pub async fn submit(&mut self, user_text: &str) -> Result<SubmitOutcome, DomainError> {
        if user_text.trim().is_empty() {
            return Err(DomainError::invalid_input("message must not be empty"));
        }

        self.transcript.push_user(user_text);
        let request = self.renderer.build_request(&self.config, &self.transcript);
        debug!(
            "Session {}: sending {} turns ({} chars) via {}",
            self.id,
            self.transcript.len(),
            request.input.size(),
            self.client.backend_name()
        );

        let response = match self.client.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                let failure = RemoteFailure::new(e.to_string());
                warn!(
                    "Session {}: completion failed (quota={}): {}",
                    self.id,
                    failure.is_quota(),
                    failure.message()
                );
                return Ok(SubmitOutcome::Failed(failure));
            }
        };

        for (i, choice) in response.choices.iter().enumerate() {
            debug!(
                "Session {}: choice {} finish_reason={}",
                self.id,
                i,
                choice.finish_reason.as_deref().unwrap_or("unknown")
            );
        }
        if let Some(usage) = &response.usage {
            debug!(
                "Session {}: tokens total={} input={} output={} (visible={}) reasoning={}",
                self.id,
                usage.total_tokens,
                usage.input_tokens,
                usage.output_tokens,
                usage.visible_output_tokens(),
                usage
                    .reasoning_tokens
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            );
        }
        self.last_usage = response.usage.clone();

        match response.text() {
            Some(text) => {
                let text = text.to_string();
                self.transcript.push_assistant(text.clone());
                Ok(SubmitOutcome::Reply(text))
            }
            None => {
                warn!("Session {}: model returned no content", self.id);
                self.transcript.push_assistant(NO_CONTENT_MARKER);
                Ok(SubmitOutcome::NoContent)
            }
        }
    }

    /// Drop every turn. Configuration is untouched.
    pub fn clear(&mut self) {
        info!(
            "Session {}: clearing {} turns",
            self.id,
            self.transcript.len()
        );
        self.transcript.clear();
        self.last_usage = None;
    }
}
