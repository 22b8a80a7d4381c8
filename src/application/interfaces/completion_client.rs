use async_trait::async_trait;

use crate::domain::{CompletionRequest, CompletionResponse, DomainError};

/// An interface for sending a rendered conversation to a hosted language model.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. [`crate::application::ChatSession`] only sees the normalised
/// [`CompletionResponse`] or a [`DomainError::RemoteCall`] whose message
/// describes what went wrong (including the HTTP status when there was one).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform exactly one completion call.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, DomainError>;

    /// Short name of the backend, for logging.
    fn backend_name(&self) -> &str;
}
