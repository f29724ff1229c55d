use thiserror::Error;

use crate::models::{Insight, Topic};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Input rejected: {0}")]
    InputRejected(String),

    #[error("Classification failed: {0}")]
    ClassificationFailed(String),

    #[error("Synthesis unavailable: {0}")]
    SynthesisUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct InsightRequest {
    pub query: String,
}

impl InsightRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightResponse {
    pub topic: Topic,
    pub narrative: String,
    pub insights: Vec<Insight>,
}
