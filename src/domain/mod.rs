//! # Domain Layer
//!
//! Conversation models, session configuration and the completion value types.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
