pub mod console;
pub mod container;
pub mod controller;
pub mod router;
pub mod settings;

pub use console::{forward_lines, stdin_lines, ConsoleCommand};
pub use container::{Container, ContainerConfig};
pub use controller::{AskController, ChatController, LoopExit};
pub use router::Router;
pub use settings::Settings;
