use async_trait::async_trait;

use super::classifier::classify;
use super::knowledge::synthesize;
use crate::providers::traits::InsightProvider;
use crate::providers::types::{InsightRequest, InsightResponse, ProviderError};

/// Keyword classifier backed by the static knowledge table.
pub struct RuleBasedProvider;

impl RuleBasedProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightProvider for RuleBasedProvider {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn respond(&self, request: InsightRequest) -> Result<InsightResponse, ProviderError> {
        if request.query.trim().is_empty() {
            return Err(ProviderError::InputRejected("empty query".to_string()));
        }

        let topic = classify(&request.query);
        let synthesis = synthesize(topic);

        Ok(InsightResponse {
            topic,
            narrative: synthesis.narrative,
            insights: synthesis.insights,
        })
    }
}
