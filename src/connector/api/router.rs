use anyhow::Result;
use tracing::warn;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController};
use super::stdin_lines;

pub struct Router<'a> {
    container: &'a Container,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Execute `command` and return the text to print last.
    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat => {
                let mut controller =
                    ChatController::new(self.container.session(), self.container.spinner_enabled());
                let mut stdout = std::io::stdout();
                let exit = controller
                    .run(stdin_lines(), &mut stdout, interrupt_signal())
                    .await?;
                Ok(exit.farewell().to_string())
            }
            Commands::Ask { text } => {
                let mut controller = AskController::new(self.container.session());
                controller.ask(&text.join(" ")).await
            }
        }
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
