pub mod chat;
pub mod conversation;
pub mod export;
pub mod settings;

pub use chat::{ChatSession, RejectReason, SubmitOutcome};
pub use settings::{OverlapPolicy, ResponderSettings, SettingsService};
