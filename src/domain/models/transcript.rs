use serde::{Deserialize, Serialize};

use super::{Role, Turn};

/// Ordered history of turns for the current process, oldest first.
///
/// Append-only: the only way to drop turns is [`Transcript::clear`], which
/// empties the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, body: impl Into<String>) {
        self.push(Turn::user(body));
    }

    pub fn push_assistant(&mut self, body: impl Into<String>) {
        self.push(Turn::assistant(body));
    }

    pub fn clear(&mut self) {
        self.turns = Vec::new();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role() == role).count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("first");
        transcript.push_assistant("second");
        transcript.push_user("third");

        let bodies: Vec<&str> = transcript.iter().map(|t| t.body()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
        assert_eq!(transcript.count_role(Role::User), 2);
        assert_eq!(transcript.count_role(Role::Assistant), 1);
    }

    #[test]
    fn clear_empties_any_length() {
        let mut transcript = Transcript::new();
        for i in 0..7 {
            transcript.push_user(format!("msg {i}"));
        }
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());
    }
}
