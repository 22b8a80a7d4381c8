mod chat_session;
mod prompt_renderer;

pub use chat_session::*;
pub use prompt_renderer::*;
