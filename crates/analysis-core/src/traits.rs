use crate::{FetchError, KeywordQuery};
use async_trait::async_trait;
use serde_json::Value;

/// Source of raw search/trends/news payloads. Implemented by the live
/// SerpApi client; orchestration tests substitute stubs so branch isolation
/// can be exercised without a network.
#[async_trait]
pub trait TrendsSource: Send + Sync {
    /// Interest-over-time payload, trying each keyword variant in order.
    async fn interest_over_time(&self, keyword: &KeywordQuery) -> Result<Value, FetchError>;

    async fn related_topics(&self, keyword: &str) -> Result<Value, FetchError>;

    async fn related_queries(&self, keyword: &str) -> Result<Value, FetchError>;

    async fn top_news(&self, keyword: &str) -> Result<Value, FetchError>;
}
