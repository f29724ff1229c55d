pub mod rules;
pub mod traits;
pub mod types;

pub use rules::{classify, synthesize, RuleBasedProvider};
pub use traits::InsightProvider;
pub use types::{InsightRequest, InsightResponse, ProviderError};
