use crate::domain::{
    ChatMessage, CompletionInput, CompletionRequest, MessageRole, RenderMode, Role,
    SessionConfig, Transcript,
};

/// Label used for assistant turns and for the open completion cue.
pub const ASSISTANT_LABEL: &str = "Assistant";

/// Turns a transcript into the payload the remote model expects.
///
/// Both strategies reference every stored turn in chronological order; no
/// windowing or truncation happens here. Rendering never mutates the
/// transcript, so rendering the same transcript twice yields identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRenderer {
    /// System instruction, then `"<Label>: <body>\n"` per turn, then an open
    /// `"Assistant:"` cue.
    FlatPrompt,
    /// One system message followed by one message per turn.
    RoleList,
}

impl PromptRenderer {
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::FlatPrompt => PromptRenderer::FlatPrompt,
            RenderMode::RoleList => PromptRenderer::RoleList,
        }
    }

    pub fn mode(&self) -> RenderMode {
        match self {
            PromptRenderer::FlatPrompt => RenderMode::FlatPrompt,
            PromptRenderer::RoleList => RenderMode::RoleList,
        }
    }

    pub fn render(&self, config: &SessionConfig, transcript: &Transcript) -> CompletionInput {
        match self {
            PromptRenderer::FlatPrompt => CompletionInput::Prompt(Self::render_prompt(
                config.system_prompt(),
                config.user_label(),
                transcript,
            )),
            PromptRenderer::RoleList => CompletionInput::Messages(Self::render_messages(
                config.system_prompt(),
                transcript,
            )),
        }
    }

    pub fn build_request(&self, config: &SessionConfig, transcript: &Transcript) -> CompletionRequest {
        let (temperature, reasoning_effort) = if config.is_reasoning_model() {
            (None, Some(config.reasoning_effort()))
        } else {
            (Some(config.temperature()), None)
        };

        CompletionRequest {
            model: config.model().to_string(),
            input: self.render(config, transcript),
            max_tokens: config.max_tokens(),
            temperature,
            verbosity: config.verbosity(),
            text_format: config.text_format(),
            reasoning_effort,
        }
    }

    pub fn render_prompt(system_prompt: &str, user_label: &str, transcript: &Transcript) -> String {
        let mut prompt = String::with_capacity(system_prompt.len() + 2);
        prompt.push_str(system_prompt);
        prompt.push_str("\n\n");

        for turn in transcript {
            let label = match turn.role() {
                Role::User => user_label,
                Role::Assistant => ASSISTANT_LABEL,
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(turn.body());
            prompt.push('\n');
        }

        prompt.push_str(ASSISTANT_LABEL);
        prompt.push(':');
        prompt
    }

    pub fn render_messages(system_prompt: &str, transcript: &Transcript) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::new(MessageRole::System, system_prompt))
            .chain(
                transcript
                    .iter()
                    .map(|turn| ChatMessage::new(turn.role().into(), turn.body())),
            )
            .collect()
    }
}
