use crate::client::SerpClient;
use crate::keypool::Service;
use analysis_core::{FetchError, KeywordQuery, TrendsSource};
use async_trait::async_trait;
use serde_json::Value;

impl SerpClient {
    /// Draw a credential for `service` and run one bounded-retry call.
    /// A 2xx body that still carries an `"error"` field counts as an
    /// upstream failure so variant fallbacks can move on.
    async fn fetch(&self, service: Service, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let key = self
            .pools
            .next_key(service)
            .ok_or_else(|| FetchError::NoCredentials(service.as_str().to_string()))?;

        let body = self.get_json(params, &key).await?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(FetchError::Upstream(message.to_string()));
        }
        Ok(body)
    }

    pub async fn related_topics(&self, keyword: &str) -> Result<Value, FetchError> {
        self.fetch(
            Service::Topics,
            &[
                ("engine", "google_trends"),
                ("q", keyword),
                ("data_type", "RELATED_TOPICS"),
                ("geo", self.geo.as_str()),
                ("date", self.date_range.as_str()),
            ],
        )
        .await
    }

    pub async fn related_queries(&self, keyword: &str) -> Result<Value, FetchError> {
        self.fetch(
            Service::Queries,
            &[
                ("engine", "google_trends"),
                ("q", keyword),
                ("data_type", "RELATED_QUERIES"),
                ("geo", self.geo.as_str()),
                ("date", self.date_range.as_str()),
            ],
        )
        .await
    }

    pub async fn top_news(&self, keyword: &str) -> Result<Value, FetchError> {
        self.fetch(
            Service::News,
            &[
                ("engine", "google_news"),
                ("q", keyword),
                ("hl", "en"),
                ("gl", "us"),
            ],
        )
        .await
    }

    /// Interest over time with keyword-variant fallback: each variant gets a
    /// fresh credential draw and its own retry cycle; the first error-free
    /// body wins.
    pub async fn interest_over_time(&self, keyword: &KeywordQuery) -> Result<Value, FetchError> {
        let mut last = FetchError::Upstream(format!(
            "no interest-over-time data for '{}' with any keyword variant",
            keyword.original
        ));

        for variant in keyword.variants() {
            match self
                .fetch(
                    Service::Forecast,
                    &[
                        ("engine", "google_trends"),
                        ("q", variant),
                        ("data_type", "TIMESERIES"),
                        ("geo", self.geo.as_str()),
                        ("date", self.date_range.as_str()),
                    ],
                )
                .await
            {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::debug!(variant, error = %e, "interest-over-time variant failed");
                    last = e;
                }
            }
        }
        Err(last)
    }
}

#[async_trait]
impl TrendsSource for SerpClient {
    async fn interest_over_time(&self, keyword: &KeywordQuery) -> Result<Value, FetchError> {
        SerpClient::interest_over_time(self, keyword).await
    }

    async fn related_topics(&self, keyword: &str) -> Result<Value, FetchError> {
        SerpClient::related_topics(self, keyword).await
    }

    async fn related_queries(&self, keyword: &str) -> Result<Value, FetchError> {
        SerpClient::related_queries(self, keyword).await
    }

    async fn top_news(&self, keyword: &str) -> Result<Value, FetchError> {
        SerpClient::top_news(self, keyword).await
    }
}
