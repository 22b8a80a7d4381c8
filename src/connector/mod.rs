//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion backends (OpenAI over HTTP, an offline mock)
//! - Configuration, wiring and the console surface

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
