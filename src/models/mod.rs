pub mod conversation;
pub mod insight;
pub mod message;
pub mod topic;

pub use conversation::Conversation;
pub use insight::{Insight, InsightKind};
pub use message::{Role, Turn};
pub use topic::Topic;
