use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::info;

use crate::application::ChatSession;

use super::super::ConsoleCommand;

/// Why the interactive loop stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The user typed `exit`.
    Command,
    /// Input was closed.
    EndOfInput,
    /// Ctrl-C, either at the prompt or while waiting for a reply.
    Interrupted,
}

impl LoopExit {
    pub fn farewell(&self) -> &'static str {
        match self {
            LoopExit::Interrupted => "\n\nSee you later!",
            LoopExit::Command | LoopExit::EndOfInput => "See you later!",
        }
    }
}

/// Interactive console on top of one [`ChatSession`].
pub struct ChatController {
    session: ChatSession,
    spinner: bool,
}

impl ChatController {
    pub fn new(session: ChatSession, spinner: bool) -> Self {
        Self { session, spinner }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn greeting(&self) -> String {
        format!(
            "Connected to {}\nI'm here to help you with any questions you have.\nType 'exit' to quit, 'clear' to reset conversation\n{}",
            self.session.config().model(),
            "-".repeat(50)
        )
    }

    /// Run until `exit`, end of input, or `interrupt` resolves.
    pub async fn run<W, I>(
        &mut self,
        mut lines: mpsc::UnboundedReceiver<String>,
        output: &mut W,
        interrupt: I,
    ) -> Result<LoopExit>
    where
        W: Write,
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        writeln!(output, "{}", self.greeting())?;

        loop {
            write!(output, "\n{}: ", self.session.config().user_label())?;
            output.flush()?;

            let line = tokio::select! {
                _ = &mut interrupt => return Ok(self.stop(LoopExit::Interrupted)),
                line = lines.recv() => line,
            };
            let Some(line) = line else {
                return Ok(self.stop(LoopExit::EndOfInput));
            };

            match ConsoleCommand::parse(&line) {
                ConsoleCommand::Exit => return Ok(self.stop(LoopExit::Command)),
                ConsoleCommand::Empty => continue,
                ConsoleCommand::Clear => {
                    self.session.clear();
                    writeln!(output, "Conversation history cleared.")?;
                }
                ConsoleCommand::Message(text) => {
                    let progress = self.start_spinner();
                    let outcome = tokio::select! {
                        _ = &mut interrupt => {
                            progress.finish_and_clear();
                            return Ok(self.stop(LoopExit::Interrupted));
                        }
                        outcome = self.session.submit(&text) => outcome,
                    };
                    progress.finish_and_clear();

                    writeln!(output, "\nAssistant: {}", outcome?.text())?;
                }
            }
        }
    }

    fn start_spinner(&self) -> ProgressBar {
        if !self.spinner {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message("Thinking...");
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    }

    fn stop(&self, exit: LoopExit) -> LoopExit {
        info!(
            "Session {} ended ({:?}) with {} turns",
            self.session.id(),
            exit,
            self.session.transcript().len()
        );
        exit
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::application::CompletionClient;
    use crate::connector::adapter::MockCompletionClient;
    use crate::domain::{CompletionRequest, CompletionResponse, DomainError, SessionConfig};

    /// Backend whose calls never complete.
    struct StalledClient;

    #[async_trait]
    impl CompletionClient for StalledClient {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, DomainError> {
            std::future::pending().await
        }

        fn backend_name(&self) -> &str {
            "stalled"
        }
    }

    fn controller(client: MockCompletionClient) -> ChatController {
        let config = SessionConfig::default().with_user_label("Peter");
        ChatController::new(ChatSession::new(config, Arc::new(client)), false)
    }

    fn feed(lines: &[&str]) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            tx.send(line.to_string()).unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn exit_command_stops_the_loop() {
        let mut chat = controller(MockCompletionClient::new().with_reply("Hello!"));
        let mut out = Vec::new();

        let exit = chat
            .run(feed(&["Hi", "", "EXIT", "never sent"]), &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::Command);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Connected to gpt-5"));
        assert!(text.contains("\nPeter: "));
        assert!(text.contains("\nAssistant: Hello!\n"));
        assert_eq!(chat.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn clear_command_resets_transcript() {
        let mut chat = controller(MockCompletionClient::new());
        let mut out = Vec::new();

        let exit = chat
            .run(feed(&["one", "two", "clear"]), &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::EndOfInput);
        assert!(chat.session().transcript().is_empty());
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Conversation history cleared."));
    }

    #[tokio::test]
    async fn failed_reply_prints_diagnostic_and_continues() {
        let mut chat = controller(
            MockCompletionClient::new()
                .with_error("insufficient_quota")
                .with_reply("back again"),
        );
        let mut out = Vec::new();

        chat.run(feed(&["Hi", "Retry"]), &mut out, std::future::pending())
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("billing"));
        assert!(text.contains("\nAssistant: back again\n"));
        // failed exchange keeps only the user turn
        assert_eq!(chat.session().transcript().len(), 3);
    }

    #[tokio::test]
    async fn interrupt_at_prompt_is_a_clean_exit() {
        let mut chat = controller(MockCompletionClient::new());
        let (_tx, rx) = mpsc::unbounded_channel::<String>();
        let mut out = Vec::new();

        let exit = chat
            .run(rx, &mut out, tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::Interrupted);
        assert!(exit.farewell().contains("See you later"));
        assert!(chat.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn interrupt_while_waiting_keeps_user_turn() {
        let session = ChatSession::new(SessionConfig::default(), Arc::new(StalledClient));
        let mut chat = ChatController::new(session, false);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("Hi".to_string()).unwrap();
        let mut out = Vec::new();

        let exit = chat
            .run(rx, &mut out, tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::Interrupted);
        let turns = chat.session().transcript().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].body(), "Hi");
        assert!(!String::from_utf8(out).unwrap().contains("Assistant:"));
        drop(tx);
    }
}
