use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_USER_LABEL: &str = "User";
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant. Address the user by name when appropriate. \
You're here to assist with any questions or tasks they have. \
Be friendly, knowledgeable, and helpful.";

/// How much prose the model should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Low,
    #[default]
    Medium,
    High,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Low => "low",
            Verbosity::Medium => "medium",
            Verbosity::High => "high",
        }
    }
}

impl FromStr for Verbosity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Verbosity::Low),
            "medium" => Ok(Verbosity::Medium),
            "high" => Ok(Verbosity::High),
            other => Err(DomainError::invalid_input(format!(
                "unknown verbosity '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

/// Response-format mode requested from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    #[default]
    Text,
    JsonObject,
    JsonSchema,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Text => "text",
            TextFormat::JsonObject => "json_object",
            TextFormat::JsonSchema => "json_schema",
        }
    }
}

impl FromStr for TextFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(TextFormat::Text),
            "json_object" => Ok(TextFormat::JsonObject),
            "json_schema" => Ok(TextFormat::JsonSchema),
            other => Err(DomainError::invalid_input(format!(
                "unknown text format '{other}' (expected text, json_object or json_schema)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl FromStr for ReasoningEffort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            other => Err(DomainError::invalid_input(format!(
                "unknown reasoning effort '{other}' (expected minimal, low, medium or high)"
            ))),
        }
    }
}

/// Request shape used for every turn of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One concatenated prompt ending in an open `Assistant:` cue.
    FlatPrompt,
    /// Ordered list of role-tagged messages.
    #[default]
    RoleList,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::FlatPrompt => "prompt",
            RenderMode::RoleList => "messages",
        }
    }
}

impl FromStr for RenderMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" | "flat" | "flat_prompt" => Ok(RenderMode::FlatPrompt),
            "messages" | "roles" | "role_list" => Ok(RenderMode::RoleList),
            other => Err(DomainError::invalid_input(format!(
                "unknown render mode '{other}' (expected prompt or messages)"
            ))),
        }
    }
}

/// Per-process session settings. Built once at startup, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    model: String,
    max_tokens: u32,
    /// Ignored by reasoning models.
    temperature: f32,
    verbosity: Verbosity,
    text_format: TextFormat,
    reasoning_effort: ReasoningEffort,
    render_mode: RenderMode,
    system_prompt: String,
    user_label: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl SessionConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            verbosity: Verbosity::default(),
            text_format: TextFormat::default(),
            reasoning_effort: ReasoningEffort::default(),
            render_mode: RenderMode::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_label: DEFAULT_USER_LABEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_text_format(mut self, text_format: TextFormat) -> Self {
        self.text_format = text_format;
        self
    }

    pub fn with_reasoning_effort(mut self, reasoning_effort: ReasoningEffort) -> Self {
        self.reasoning_effort = reasoning_effort;
        self
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_user_label(mut self, user_label: impl Into<String>) -> Self {
        self.user_label = user_label.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn text_format(&self) -> TextFormat {
        self.text_format
    }

    pub fn reasoning_effort(&self) -> ReasoningEffort {
        self.reasoning_effort
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_label(&self) -> &str {
        &self.user_label
    }

    /// Reasoning-model families reject a `temperature` parameter.
    pub fn is_reasoning_model(&self) -> bool {
        let model = self.model.to_lowercase();
        ["gpt-5", "o1", "o3", "o4"]
            .iter()
            .any(|prefix| model.starts_with(prefix))
    }
}
