use crate::keypool::KeyPools;
use analysis_core::FetchError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const SEARCH_PATH: &str = "/search.json";
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the SerpApi-style search upstream. Owns the credential pools;
/// every typed fetcher draws its own key before calling `get_json`.
pub struct SerpClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) pools: KeyPools,
    pub(crate) geo: String,
    pub(crate) date_range: String,
}

impl SerpClient {
    pub fn new(pools: KeyPools) -> Self {
        let base_url = std::env::var("SERP_API_BASE")
            .unwrap_or_else(|_| "https://serpapi.com".to_string());

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url,
            pools,
            geo: String::new(),
            date_range: "today 12-m".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Restrict trends queries to a geography (empty = worldwide).
    pub fn with_geo(mut self, geo: impl Into<String>) -> Self {
        self.geo = geo.into();
        self
    }

    /// One bounded-retry GET with a fixed key: up to 3 attempts, ~1s backoff
    /// after a non-2xx status or transport error, timeout enforced per
    /// attempt by the underlying client. Exhaustion returns an error value
    /// carrying the last failure.
    pub(crate) async fn get_json(
        &self,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let mut last_error = String::from("no attempts made");

        for attempt in 1..=MAX_ATTEMPTS {
            let mut query: Vec<(&str, &str)> = params.to_vec();
            query.push(("api_key", api_key));

            match self.http.get(&url).query(&query).send().await {
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<Value>()
                        .await
                        .map_err(|e| FetchError::MalformedResponse(e.to_string()));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    last_error = format!(
                        "HTTP {}: {}",
                        status,
                        body.chars().take(300).collect::<String>()
                    );
                    tracing::warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        %status,
                        "search upstream returned non-success status"
                    );
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        error = %e,
                        "search upstream request failed"
                    );
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
        }

        Err(FetchError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last_error,
        })
    }
}
