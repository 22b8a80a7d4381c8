use serde::{Deserialize, Serialize};

use super::{ReasoningEffort, Role, TextFormat, Verbosity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The rendered conversation, in whichever shape the session was configured for.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionInput {
    Prompt(String),
    Messages(Vec<ChatMessage>),
}

impl CompletionInput {
    /// Character count of the rendered payload, for logging.
    pub fn size(&self) -> usize {
        match self {
            CompletionInput::Prompt(prompt) => prompt.len(),
            CompletionInput::Messages(messages) => {
                messages.iter().map(|m| m.content.len()).sum()
            }
        }
    }
}

/// Everything a [`crate::application::CompletionClient`] needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub input: CompletionInput,
    pub max_tokens: u32,
    /// `None` when the model does not accept a sampling temperature.
    pub temperature: Option<f32>,
    pub verbosity: Verbosity,
    pub text_format: TextFormat,
    /// `None` when the model does not reason.
    pub reasoning_effort: Option<ReasoningEffort>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub total_tokens: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Portion of `output_tokens` spent on hidden reasoning, when reported.
    pub reasoning_tokens: Option<u64>,
}

impl Usage {
    /// Output tokens that ended up as visible text.
    pub fn visible_output_tokens(&self) -> u64 {
        self.output_tokens
            .saturating_sub(self.reasoning_tokens.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub finish_reason: Option<String>,
    pub text: Option<String>,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            finish_reason: Some("stop".to_string()),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice::new(text)],
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Text of the first candidate, or `None` if it is missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_first_choice_has_no_text() {
        let response = CompletionResponse {
            choices: vec![Choice {
                finish_reason: Some("length".to_string()),
                text: Some("   ".to_string()),
            }],
            usage: None,
        };
        assert_eq!(response.text(), None);
        assert_eq!(CompletionResponse::default().text(), None);
    }

    #[test]
    fn visible_output_excludes_reasoning() {
        let usage = Usage {
            total_tokens: 120,
            input_tokens: 20,
            output_tokens: 100,
            reasoning_tokens: Some(64),
        };
        assert_eq!(usage.visible_output_tokens(), 36);
    }
}
