use async_trait::async_trait;

use super::types::{InsightRequest, InsightResponse, ProviderError};

/// Turns an operator question into a structured reply.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn respond(&self, request: InsightRequest) -> Result<InsightResponse, ProviderError>;
}
