use analysis_core::{
    AnalysisError, AnalysisResult, FetchOutcome, KeywordQuery, NewsItem, QueryItem, Reply,
    SentimentSummary, TimeSeries, TopicItem, TrendVerdict, TrendsSource,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use groq_client::ChatClient;
use sentiment_analysis::SentimentEngine;
use serde_json::Value;
use serp_client::{
    normalize_interest_over_time, normalize_news, normalize_queries, normalize_topics, KeyPools,
    SerpClient,
};
use std::sync::Arc;
use threads_client::ThreadsClient;

pub mod recommendation;


/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

const CACHE_TTL_SECS: i64 = 300; // 5 minutes

fn cache_get<T: Clone>(cache: &DashMap<String, CacheEntry<T>>, key: &str) -> Option<T> {
    let entry = cache.get(key)?;
    let age = (Utc::now() - entry.cached_at).num_seconds();
    if age < CACHE_TTL_SECS {
        Some(entry.data.clone())
    } else {
        None
    }
}

fn cache_put<T>(cache: &DashMap<String, CacheEntry<T>>, key: &str, data: T) {
    cache.insert(
        key.to_string(),
        CacheEntry {
            data,
            cached_at: Utc::now(),
        },
    );
}

/// Fans out the four independent signal branches for a keyword, assembles
/// the combined payload, and exposes the reply-sentiment and social
/// pass-through surface consumed by the web layer.
pub struct AnalysisOrchestrator {
    trends: Arc<dyn TrendsSource>,
    threads: ThreadsClient,
    chat: Option<ChatClient>,
    sentiment: SentimentEngine,
    /// Per-keyword branch payloads (5-min TTL); only successes are cached
    /// so a degraded branch can recover on the next request.
    topics_cache: DashMap<String, CacheEntry<Vec<TopicItem>>>,
    queries_cache: DashMap<String, CacheEntry<Vec<QueryItem>>>,
    news_cache: DashMap<String, CacheEntry<Vec<NewsItem>>>,
    series_cache: DashMap<String, CacheEntry<TimeSeries>>,
}

impl AnalysisOrchestrator {
    pub fn new(
        trends: Arc<dyn TrendsSource>,
        threads: ThreadsClient,
        chat: Option<ChatClient>,
    ) -> Self {
        Self {
            trends,
            threads,
            chat,
            sentiment: SentimentEngine::new(),
            topics_cache: DashMap::new(),
            queries_cache: DashMap::new(),
            news_cache: DashMap::new(),
            series_cache: DashMap::new(),
        }
    }

    /// Assemble the live stack from the environment. Missing search
    /// credentials fail here — a configuration error, surfaced before any
    /// fetch is attempted. A missing generation key only disables the
    /// AI recommendation.
    pub fn from_env() -> Result<Self, AnalysisError> {
        dotenvy::dotenv().ok();

        let pools = KeyPools::from_env()?;
        let chat = match ChatClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::info!("running without AI recommendations: {e}");
                None
            }
        };

        Ok(Self::new(
            Arc::new(SerpClient::new(pools)),
            ThreadsClient::from_env(),
            chat,
        ))
    }

    /// Run the full keyword analysis: four concurrent branches, each
    /// isolated, joined before assembly. Wall-clock cost is the slowest
    /// branch, not the sum.
    pub async fn run_full_analysis(
        &self,
        access_token: &str,
        keyword: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "keyword must not be empty".to_string(),
            ));
        }
        // TODO: blend the caller's own post performance (via access_token)
        // into the keyword analysis.
        let _ = access_token;

        tracing::info!(keyword, "starting full analysis");

        let (trend_data, related_topics, related_queries, news_items) = tokio::join!(
            self.trend_branch(keyword),
            self.topics_branch(keyword),
            self.queries_branch(keyword),
            self.news_branch(keyword),
        );

        let mut result = AnalysisResult {
            keyword: keyword.to_string(),
            related_topics,
            related_queries,
            trend_data,
            news_items,
            ai_recommendation: None,
        };

        if let Some(chat) = &self.chat {
            result.ai_recommendation = Some(recommendation::compose(chat, &result).await);
        }

        tracing::info!(
            keyword,
            topics = result.related_topics.len(),
            queries = result.related_queries.len(),
            news = result.news_items.len(),
            trend = result.trend_data.label.as_str(),
            "analysis assembled"
        );
        Ok(result)
    }

    /// Score a batch of post replies with the local sentiment engine.
    pub fn analyze_replies_sentiment(&self, replies: &[Reply]) -> SentimentSummary {
        self.sentiment.score_replies(replies)
    }

    /// Raw profile of the token's owner.
    pub async fn get_threads_profile(&self, access_token: &str) -> Result<Value, AnalysisError> {
        self.threads
            .get_profile(access_token)
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))
    }

    /// Raw recent posts of the token's owner.
    pub async fn fetch_user_threads(
        &self,
        access_token: &str,
        limit: u32,
        since: Option<&str>,
        until: Option<&str>,
    ) -> Result<Value, AnalysisError> {
        self.threads
            .fetch_user_threads(access_token, limit, since, until)
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))
    }

    /// Raw replies for one post.
    pub async fn fetch_replies(
        &self,
        access_token: &str,
        post_id: &str,
    ) -> Result<Value, AnalysisError> {
        self.threads
            .fetch_replies(access_token, post_id)
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))
    }

    // --- branches -----------------------------------------------------
    //
    // Each branch is one fetch-normalize pipeline with its own credential
    // draw. Failures are converted to the branch default here, before the
    // join point, so no branch can take down a sibling.

    async fn trend_branch(&self, keyword: &str) -> TrendVerdict {
        let series = match cache_get(&self.series_cache, keyword) {
            Some(series) => series,
            None => match self.fetch_series(keyword).await {
                FetchOutcome::Success(series) => {
                    cache_put(&self.series_cache, keyword, series.clone());
                    series
                }
                FetchOutcome::Empty => Vec::new(),
                FetchOutcome::Error(reason) => {
                    tracing::warn!(keyword, %reason, "trend branch degraded to unknown");
                    return TrendVerdict::unknown("upstream interest data unavailable");
                }
            },
        };
        trend_analysis::estimate(&series)
    }

    async fn fetch_series(&self, keyword: &str) -> FetchOutcome<TimeSeries> {
        let query = KeywordQuery::new(keyword);
        match self.trends.interest_over_time(&query).await {
            Ok(raw) => {
                let mut all = normalize_interest_over_time(&raw, keyword);
                // Prefer the series for the exact keyword, else the first.
                let picked = match all.iter().position(|(q, _)| q == keyword) {
                    Some(i) => Some(all.swap_remove(i).1),
                    None if !all.is_empty() => Some(all.swap_remove(0).1),
                    None => None,
                };
                match picked {
                    Some(series) if !series.is_empty() => FetchOutcome::Success(series),
                    _ => FetchOutcome::Empty,
                }
            }
            Err(e) => FetchOutcome::Error(e.to_string()),
        }
    }

    async fn topics_branch(&self, keyword: &str) -> Vec<TopicItem> {
        if let Some(cached) = cache_get(&self.topics_cache, keyword) {
            return cached;
        }
        let outcome = match self.trends.related_topics(keyword).await {
            Ok(raw) => {
                let items = normalize_topics(&raw);
                if items.is_empty() {
                    FetchOutcome::Empty
                } else {
                    FetchOutcome::Success(items)
                }
            }
            Err(e) => FetchOutcome::Error(e.to_string()),
        };

        match outcome {
            FetchOutcome::Success(items) => {
                cache_put(&self.topics_cache, keyword, items.clone());
                items
            }
            FetchOutcome::Empty => Vec::new(),
            FetchOutcome::Error(reason) => {
                tracing::warn!(keyword, %reason, "related-topics branch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn queries_branch(&self, keyword: &str) -> Vec<QueryItem> {
        if let Some(cached) = cache_get(&self.queries_cache, keyword) {
            return cached;
        }
        let outcome = match self.trends.related_queries(keyword).await {
            Ok(raw) => {
                let items = normalize_queries(&raw);
                if items.is_empty() {
                    FetchOutcome::Empty
                } else {
                    FetchOutcome::Success(items)
                }
            }
            Err(e) => FetchOutcome::Error(e.to_string()),
        };

        match outcome {
            FetchOutcome::Success(items) => {
                cache_put(&self.queries_cache, keyword, items.clone());
                items
            }
            FetchOutcome::Empty => Vec::new(),
            FetchOutcome::Error(reason) => {
                tracing::warn!(keyword, %reason, "related-queries branch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn news_branch(&self, keyword: &str) -> Vec<NewsItem> {
        if let Some(cached) = cache_get(&self.news_cache, keyword) {
            return cached;
        }
        let outcome = match self.trends.top_news(keyword).await {
            Ok(raw) => {
                let items = normalize_news(&raw);
                if items.is_empty() {
                    FetchOutcome::Empty
                } else {
                    FetchOutcome::Success(items)
                }
            }
            Err(e) => FetchOutcome::Error(e.to_string()),
        };

        match outcome {
            FetchOutcome::Success(items) => {
                cache_put(&self.news_cache, keyword, items.clone());
                items
            }
            FetchOutcome::Empty => Vec::new(),
            FetchOutcome::Error(reason) => {
                tracing::warn!(keyword, %reason, "news branch degraded to empty");
                Vec::new()
            }
        }
    }
}
