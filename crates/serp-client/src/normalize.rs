//! Pure, total mappings from raw upstream JSON to the canonical records.
//! Malformed or missing input always yields an empty collection.

use analysis_core::{NewsItem, QueryItem, TimePoint, TimeSeries, TopicItem};
use serde_json::Value;

const UNKNOWN: &str = "Unknown";
const DEFAULT_TOPIC_TYPE: &str = "Topic";

fn int_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Map one raw topic record. Accepts both the nested upstream shape
/// (`{"topic": {"title", "type"}, "value"}`) and the flat already-normalized
/// shape (`{"title", "type", "value"}`), so normalization is idempotent.
pub fn topic_from_value(raw: &Value) -> Option<TopicItem> {
    let obj = raw.as_object()?;
    let nested = obj.get("topic").and_then(Value::as_object);

    let title = nested
        .and_then(|t| t.get("title"))
        .and_then(Value::as_str)
        .or_else(|| obj.get("title").and_then(Value::as_str))
        .unwrap_or(UNKNOWN);
    let topic_type = nested
        .and_then(|t| t.get("type"))
        .and_then(Value::as_str)
        .or_else(|| obj.get("type").and_then(Value::as_str))
        .unwrap_or(DEFAULT_TOPIC_TYPE);

    Some(TopicItem {
        title: title.to_string(),
        topic_type: topic_type.to_string(),
        value: int_field(obj, "value"),
    })
}

/// Related topics: the "top" bucket when it has records, otherwise "rising".
pub fn normalize_topics(raw: &Value) -> Vec<TopicItem> {
    let buckets = raw.get("related_topics");
    let top = buckets.and_then(|b| b.get("top")).and_then(Value::as_array);
    let rising = buckets.and_then(|b| b.get("rising")).and_then(Value::as_array);

    let records = match top {
        Some(arr) if !arr.is_empty() => arr,
        _ => match rising {
            Some(arr) => arr,
            None => return Vec::new(),
        },
    };
    records.iter().filter_map(topic_from_value).collect()
}

/// Map one raw query record; records without a query string are dropped.
/// An existing `rising` flag is honored so re-normalizing is a no-op.
pub fn query_from_value(raw: &Value, from_rising_bucket: bool) -> Option<QueryItem> {
    let obj = raw.as_object()?;
    let query = obj.get("query").and_then(Value::as_str)?;
    if query.is_empty() {
        return None;
    }

    let rising =
        from_rising_bucket || obj.get("rising").and_then(Value::as_bool).unwrap_or(false);
    Some(QueryItem {
        query: query.to_string(),
        rising,
    })
}

/// Related queries: "top" then "rising" merged into one ordered sequence,
/// rising entries flagged.
pub fn normalize_queries(raw: &Value) -> Vec<QueryItem> {
    let buckets = raw.get("related_queries");
    let mut out = Vec::new();
    for (bucket, rising) in [("top", false), ("rising", true)] {
        if let Some(arr) = buckets.and_then(|b| b.get(bucket)).and_then(Value::as_array) {
            out.extend(arr.iter().filter_map(|r| query_from_value(r, rising)));
        }
    }
    out
}

/// Map one raw news record; records without a link are dropped. The source
/// field may be a plain string or a `{"name": ...}` object.
pub fn news_from_value(raw: &Value) -> Option<NewsItem> {
    let obj = raw.as_object()?;
    let link = obj.get("link").and_then(Value::as_str)?;
    if link.is_empty() {
        return None;
    }

    let source = match obj.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(o)) => o
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN)
            .to_string(),
        _ => UNKNOWN.to_string(),
    };

    Some(NewsItem {
        title: obj
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN)
            .to_string(),
        link: link.to_string(),
        source,
        date: obj
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

pub fn normalize_news(raw: &Value) -> Vec<NewsItem> {
    raw.get("news_results")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(news_from_value).collect())
        .unwrap_or_default()
}

/// Flatten `interest_over_time.timeline_data[].values[]` into per-query
/// ordered series. Key order follows first appearance; point order follows
/// the upstream timeline (chronological as returned).
pub fn normalize_interest_over_time(raw: &Value, fallback_query: &str) -> Vec<(String, TimeSeries)> {
    let Some(timeline) = raw
        .get("interest_over_time")
        .and_then(|i| i.get("timeline_data"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut series: Vec<(String, TimeSeries)> = Vec::new();
    for item in timeline {
        let Some(date) = item.get("date").and_then(Value::as_str) else {
            continue;
        };
        let Some(values) = item.get("values").and_then(Value::as_array) else {
            continue;
        };
        if date.is_empty() || values.is_empty() {
            continue;
        }

        for v in values {
            let query = v
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or(fallback_query);
            let point = TimePoint {
                date: date.to_string(),
                value: v.get("extracted_value").and_then(Value::as_f64).unwrap_or(0.0),
            };
            match series.iter_mut().find(|(q, _)| q == query) {
                Some((_, s)) => s.push(point),
                None => series.push((query.to_string(), vec![point])),
            }
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topics_nested_shape() {
        let raw = json!({
            "related_topics": {
                "top": [{"topic": {"title": "Bluetooth", "type": "Topic"}, "value": 10}]
            }
        });
        let topics = normalize_topics(&raw);
        assert_eq!(
            topics,
            vec![TopicItem {
                title: "Bluetooth".to_string(),
                topic_type: "Topic".to_string(),
                value: Some(10),
            }]
        );
    }

    #[test]
    fn test_topics_flat_shape_and_idempotence() {
        let nested = json!({
            "related_topics": {
                "top": [{"topic": {"title": "Bluetooth", "type": "Topic"}, "value": 10}]
            }
        });
        let first_pass = normalize_topics(&nested);

        // Re-normalizing the already-flat records must not change any field.
        let second_pass: Vec<TopicItem> = first_pass
            .iter()
            .map(|t| topic_from_value(&serde_json::to_value(t).unwrap()).unwrap())
            .collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_topics_empty_top_falls_back_to_rising() {
        let raw = json!({
            "related_topics": {
                "top": [],
                "rising": [{"topic": {"title": "ANC", "type": "Feature"}, "value": "350"}]
            }
        });
        let topics = normalize_topics(&raw);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "ANC");
        assert_eq!(topics[0].value, Some(350));
    }

    #[test]
    fn test_topics_missing_fields_get_fillers() {
        let raw = json!({"related_topics": {"top": [{"value": 5}, {"topic": {}}]}});
        let topics = normalize_topics(&raw);
        assert_eq!(topics.len(), 2);
        for t in &topics {
            assert_eq!(t.title, "Unknown");
            assert_eq!(t.topic_type, "Topic");
        }
    }

    #[test]
    fn test_topics_malformed_input_is_empty() {
        assert!(normalize_topics(&json!(null)).is_empty());
        assert!(normalize_topics(&json!("oops")).is_empty());
        assert!(normalize_topics(&json!({"related_topics": 7})).is_empty());
        assert!(normalize_topics(&json!({})).is_empty());
    }

    #[test]
    fn test_queries_merge_and_flag_rising() {
        let raw = json!({
            "related_queries": {
                "top": [{"query": "earbuds case"}, {"no_query": true}],
                "rising": [{"query": "earbuds 2024"}]
            }
        });
        let queries = normalize_queries(&raw);
        assert_eq!(
            queries,
            vec![
                QueryItem { query: "earbuds case".to_string(), rising: false },
                QueryItem { query: "earbuds 2024".to_string(), rising: true },
            ]
        );
    }

    #[test]
    fn test_queries_idempotent_on_normalized_records() {
        let item = QueryItem {
            query: "earbuds 2024".to_string(),
            rising: true,
        };
        let reparsed = query_from_value(&serde_json::to_value(&item).unwrap(), false).unwrap();
        assert_eq!(item, reparsed);
    }

    #[test]
    fn test_news_drops_linkless_and_flattens_source() {
        let raw = json!({
            "news_results": [
                {"title": "A", "link": "https://x/a", "source": "Wire", "date": "today"},
                {"title": "B", "link": "https://x/b", "source": {"name": "Post"}},
                {"title": "no link"}
            ]
        });
        let news = normalize_news(&raw);
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].source, "Wire");
        assert_eq!(news[1].source, "Post");
        assert_eq!(news[1].date, "");
    }

    #[test]
    fn test_news_malformed_input_is_empty() {
        assert!(normalize_news(&json!({})).is_empty());
        assert!(normalize_news(&json!({"news_results": "x"})).is_empty());
    }

    #[test]
    fn test_interest_over_time_flattens_per_query() {
        let raw = json!({
            "interest_over_time": {
                "timeline_data": [
                    {"date": "2024-01-01", "values": [{"query": "earbuds", "extracted_value": 50}]},
                    {"date": "2024-06-01", "values": [{"query": "earbuds", "extracted_value": 70}]},
                    {"date": "bad", "values": []},
                    {"values": [{"extracted_value": 1}]}
                ]
            }
        });
        let series = normalize_interest_over_time(&raw, "earbuds");
        assert_eq!(series.len(), 1);
        let (query, points) = &series[0];
        assert_eq!(query, "earbuds");
        assert_eq!(
            points,
            &vec![
                TimePoint { date: "2024-01-01".to_string(), value: 50.0 },
                TimePoint { date: "2024-06-01".to_string(), value: 70.0 },
            ]
        );
    }

    #[test]
    fn test_interest_over_time_uses_fallback_query() {
        let raw = json!({
            "interest_over_time": {
                "timeline_data": [{"date": "2024-01-01", "values": [{"extracted_value": 9}]}]
            }
        });
        let series = normalize_interest_over_time(&raw, "shoes");
        assert_eq!(series[0].0, "shoes");
    }

    #[test]
    fn test_interest_over_time_malformed_is_empty() {
        assert!(normalize_interest_over_time(&json!({}), "x").is_empty());
        assert!(normalize_interest_over_time(&json!({"interest_over_time": {}}), "x").is_empty());
    }
}
