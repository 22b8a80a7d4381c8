pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatSession, CompletionClient, PromptRenderer, RemoteFailure, SubmitOutcome,
    NO_CONTENT_MARKER, QUOTA_REMEDIATION,
};

pub use cli::Commands;

pub use connector::{
    AskController, ChatController, Container, ContainerConfig, LoopExit, MockCompletionClient,
    OpenAiClient, Router, Settings,
};

pub use domain::{
    ChatMessage, Choice, CompletionInput, CompletionRequest, CompletionResponse, DomainError,
    MessageRole, ReasoningEffort, RenderMode, Role, SessionConfig, TextFormat, Transcript, Turn,
    Usage, Verbosity,
};
