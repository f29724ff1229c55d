use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::message::{Role, Turn};

/// Append-only log of turns for one chat session, plus the thinking flag.
///
/// A conversation always starts with a single assistant greeting. Turn
/// timestamps strictly increase in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    turns: Vec<Turn>,
    thinking: bool,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = Turn::assistant(greeting, Vec::new());
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: greeting.timestamp,
            turns: vec![greeting],
            thinking: false,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn count_by_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    /// Append a turn, moving its timestamp forward if needed so it lands
    /// strictly after the previous turn.
    pub(crate) fn append(&mut self, mut turn: Turn) -> &Turn {
        if let Some(last) = self.turns.last() {
            let floor = last.timestamp + Duration::microseconds(1);
            if turn.timestamp < floor {
                turn.timestamp = floor;
            }
        }
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub(crate) fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }
}
