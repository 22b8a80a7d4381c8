mod completion;
mod session_config;
mod transcript;
mod turn;

pub use completion::*;
pub use session_config::*;
pub use transcript::*;
pub use turn::*;
