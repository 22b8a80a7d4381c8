use anyhow::{bail, Result};

use crate::application::ChatSession;

/// Single question, single answer.
pub struct AskController {
    session: ChatSession,
}

impl AskController {
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    /// Returns the reply, or the diagnostic when the remote call failed.
    pub async fn ask(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Nothing to ask: the message is empty");
        }
        let outcome = self.session.submit(text).await?;
        Ok(outcome.text())
    }
}
