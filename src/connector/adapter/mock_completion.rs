use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{
    CompletionInput, CompletionRequest, CompletionResponse, DomainError, MessageRole,
};

/// Offline [`CompletionClient`].
///
/// Replays scripted results in order; once the script is exhausted (or when
/// none was given) it echoes the latest user message back.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<CompletionResponse, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(CompletionResponse::from_text(text)))
    }

    /// Queue a successful reply with a full response body.
    pub fn with_response(self, response: CompletionResponse) -> Self {
        self.push(Ok(response))
    }

    /// Queue a remote failure carrying `message`.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()))
    }

    fn push(self, entry: Result<CompletionResponse, String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn echo(input: &CompletionInput) -> String {
        let last_user = match input {
            CompletionInput::Messages(messages) => messages
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.content.clone()),
            // The line just before the trailing cue is the latest user turn.
            CompletionInput::Prompt(prompt) => prompt
                .lines()
                .rev()
                .nth(1)
                .and_then(|line| line.split_once(": "))
                .map(|(_, body)| body.to_string()),
        };
        format!("You said: {}", last_user.unwrap_or_default())
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, DomainError> {
        self.requests
            .lock()
            .map_err(|_| DomainError::internal("mock request log poisoned"))?
            .push(request.clone());

        let scripted = self
            .script
            .lock()
            .map_err(|_| DomainError::internal("mock script poisoned"))?
            .pop_front();

        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(DomainError::remote(message)),
            None => {
                let reply = Self::echo(&request.input);
                debug!("MockCompletionClient echo: {reply}");
                Ok(CompletionResponse::from_text(reply))
            }
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
