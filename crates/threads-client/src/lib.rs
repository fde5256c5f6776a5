use analysis_core::Reply;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://graph.threads.net";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROFILE_FIELDS: &str = "id,username,threads_profile_picture_url,threads_biography";
const THREAD_FIELDS: &str = "id,text,timestamp,media_type,permalink";
const REPLY_FIELDS: &str = "id,text,username,timestamp";

#[derive(Error, Debug)]
pub enum ThreadsError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Threads API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Pass-through client for the social-platform graph API. Calls are
/// parameterized by the caller's decrypted access token; this crate never
/// stores or manages tokens.
#[derive(Clone)]
pub struct ThreadsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ThreadsClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let mut client = Self::new();
        if let Ok(base) = std::env::var("THREADS_API_BASE") {
            client.base_url = base;
        }
        client
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// GET one endpoint and validate that the body is a JSON object. The
    /// raw object is returned as-is; shaping is left to the caller.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ThreadsError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, path, "Threads API call failed");
            return Err(ThreadsError::Api { status, body });
        }

        let body: Value = response.json().await?;
        if !body.is_object() {
            return Err(ThreadsError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(body)
    }

    /// Profile of the token's owner.
    pub async fn get_profile(&self, access_token: &str) -> Result<Value, ThreadsError> {
        self.get(
            "/v1.0/me",
            &[("fields", PROFILE_FIELDS), ("access_token", access_token)],
        )
        .await
    }

    /// Recent posts of the token's owner, newest first.
    pub async fn fetch_user_threads(
        &self,
        access_token: &str,
        limit: u32,
        since: Option<&str>,
        until: Option<&str>,
    ) -> Result<Value, ThreadsError> {
        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("fields", THREAD_FIELDS),
            ("limit", limit.as_str()),
            ("access_token", access_token),
        ];
        if let Some(since) = since {
            query.push(("since", since));
        }
        if let Some(until) = until {
            query.push(("until", until));
        }
        self.get("/v1.0/me/threads", &query).await
    }

    /// Replies to one post.
    pub async fn fetch_replies(
        &self,
        access_token: &str,
        post_id: &str,
    ) -> Result<Value, ThreadsError> {
        self.get(
            &format!("/v1.0/{post_id}/replies"),
            &[("fields", REPLY_FIELDS), ("access_token", access_token)],
        )
        .await
    }
}

impl Default for ThreadsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a raw replies payload (`{"data": [...]}`) into typed records,
/// dropping records without an id.
pub fn replies_from_json(raw: &Value) -> Vec<Reply> {
    raw.get("data")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| serde_json::from_value::<Reply>(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replies_from_json_drops_idless_records() {
        let raw = json!({
            "data": [
                {"id": "1", "username": "ana", "text": "love it", "timestamp": "2024-05-01T10:00:00+0000"},
                {"username": "ghost", "text": "no id"},
                {"id": "2"}
            ]
        });
        let replies = replies_from_json(&raw);
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].username, "ana");
        assert_eq!(replies[1].text, "");
    }

    #[test]
    fn test_replies_from_json_tolerates_missing_data() {
        assert!(replies_from_json(&json!({})).is_empty());
        assert!(replies_from_json(&json!({"data": "nope"})).is_empty());
    }
}
