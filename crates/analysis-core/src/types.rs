use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one branch fetch. A branch either produced a payload, came
/// back legitimately empty, or failed — never a mix. The orchestrator maps
/// `Empty` and `Error` to the branch default before the join point.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    Empty,
    Error(String),
}

impl<T> FetchOutcome<T> {
    /// Collapse to the payload, substituting `default` for Empty/Error.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            FetchOutcome::Success(payload) => payload,
            FetchOutcome::Empty | FetchOutcome::Error(_) => default,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchOutcome::Error(_))
    }
}

/// Related topic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicItem {
    pub title: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    pub value: Option<i64>,
}

/// Related query record; `rising` marks entries from the rising bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryItem {
    pub query: String,
    #[serde(default)]
    pub rising: bool,
}

/// News article record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: String,
}

/// One point of an interest-over-time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: String,
    pub value: f64,
}

/// Chronologically ordered interest series, as returned upstream
pub type TimeSeries = Vec<TimePoint>;

/// Coarse trend direction from the endpoint-delta heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Rising,
    Falling,
    Flat,
    Unknown,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Rising => "rising",
            TrendLabel::Falling => "falling",
            TrendLabel::Flat => "flat",
            TrendLabel::Unknown => "unknown",
        }
    }
}

/// Trend verdict with an auditable reason string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendVerdict {
    pub label: TrendLabel,
    pub reason: String,
}

impl TrendVerdict {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            label: TrendLabel::Unknown,
            reason: reason.into(),
        }
    }
}

/// Social post reply as fetched from the platform API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Per-reply sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Error,
}

/// Scored reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySentiment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub label: SentimentLabel,
    /// Compound polarity in [-1, 1]
    pub compound: f64,
}

/// Aggregate label over a reply batch. `NoData` distinguishes an empty or
/// all-empty-text batch from a genuinely neutral one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallSentiment {
    Positive,
    Negative,
    Neutral,
    NoData,
}

impl OverallSentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallSentiment::Positive => "POSITIVE",
            OverallSentiment::Negative => "NEGATIVE",
            OverallSentiment::Neutral => "NEUTRAL",
            OverallSentiment::NoData => "NO DATA",
        }
    }
}

/// Batch sentiment summary for a set of replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub per_reply: Vec<ReplySentiment>,
    /// Arithmetic mean of the per-reply compound scores
    pub cumulative: f64,
    pub overall: OverallSentiment,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Combined analytics payload for one keyword, assembled per request and
/// never persisted. Sub-fields are empty (not absent) when their branch
/// degraded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub keyword: String,
    pub related_topics: Vec<TopicItem>,
    pub related_queries: Vec<QueryItem>,
    pub trend_data: TrendVerdict,
    pub news_items: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_recommendation: Option<String>,
}
