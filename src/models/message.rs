use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::insight::Insight;
use super::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<Insight>,
    /// Topic that produced an assistant reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_turn_id(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            insights: Vec::new(),
            topic: None,
        }
    }

    pub fn assistant(content: impl Into<String>, insights: Vec<Insight>) -> Self {
        Self {
            id: new_turn_id(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            insights,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn has_insights(&self) -> bool {
        !self.insights.is_empty()
    }
}

/// Generate a new turn ID.
pub fn new_turn_id() -> String {
    Uuid::new_v4().to_string()
}
