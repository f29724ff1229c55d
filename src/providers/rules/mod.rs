pub mod adapter;
pub mod classifier;
pub mod knowledge;

pub use adapter::RuleBasedProvider;
pub use classifier::classify;
pub use knowledge::{synthesize, HeadlineMetrics, Synthesis, HEADLINE_METRICS};
