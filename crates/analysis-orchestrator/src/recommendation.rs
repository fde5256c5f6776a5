//! Prompt assembly and delegation to the language-generation upstream.

use analysis_core::AnalysisResult;
use groq_client::ChatClient;
use std::fmt::Write;

const MAX_TOPICS: usize = 5;
const MAX_QUERIES: usize = 5;
const MAX_NEWS: usize = 3;

const SYSTEM_PROMPT: &str = "\
You are a world-class content strategist. Your goal is to provide actionable, \
creative, and data-driven content recommendations based on the real-time data \
provided. Your tone must be encouraging and practical. Use Markdown for \
formatting.";

/// Build the bounded user prompt: trend label plus at most the top-5 topics,
/// top-5 queries, and top-3 news titles.
pub fn build_prompt(result: &AnalysisResult) -> String {
    let mut data = String::new();
    let _ = writeln!(data, "Keyword: {}", result.keyword);
    let _ = writeln!(data, "Trend Analysis: {}", result.trend_data.label.as_str());

    data.push_str("\nRelated Topics:\n");
    for topic in result.related_topics.iter().take(MAX_TOPICS) {
        let _ = writeln!(data, "- {}", topic.title);
    }

    data.push_str("\nRelated Queries:\n");
    for query in result.related_queries.iter().take(MAX_QUERIES) {
        let _ = writeln!(
            data,
            "- {}{}",
            query.query,
            if query.rising { " (Rising)" } else { "" }
        );
    }

    data.push_str("\nRecent News:\n");
    for news in result.news_items.iter().take(MAX_NEWS) {
        let _ = writeln!(data, "- {}", news.title);
    }

    format!(
        "Based on the following data, create a comprehensive content strategy. Include:\n\
         1. A brief **Overall Summary** of the current situation for this keyword.\n\
         2. Three specific and creative **Content Ideas**.\n\
         3. A list of suggested **Hashtags**.\n\
         4. A **Quick Start Action Plan** with 3 concrete steps.\n\n\
         ---\n\
         DATA:\n\
         {data}\
         ---"
    )
}

/// Compose the recommendation text. This surface never fails: any error
/// from the generation upstream is rendered into the returned string.
pub async fn compose(chat: &ChatClient, result: &AnalysisResult) -> String {
    let prompt = build_prompt(result);
    match chat.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(keyword = %result.keyword, error = %e, "recommendation generation failed");
            format!("An error occurred while generating the recommendation: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{NewsItem, QueryItem, TopicItem, TrendLabel, TrendVerdict};

    fn result_with_counts(topics: usize, queries: usize, news: usize) -> AnalysisResult {
        AnalysisResult {
            keyword: "wireless earbuds".to_string(),
            related_topics: (0..topics)
                .map(|i| TopicItem {
                    title: format!("topic-{i}"),
                    topic_type: "Topic".to_string(),
                    value: Some(i as i64),
                })
                .collect(),
            related_queries: (0..queries)
                .map(|i| QueryItem {
                    query: format!("query-{i}"),
                    rising: i % 2 == 0,
                })
                .collect(),
            trend_data: TrendVerdict {
                label: TrendLabel::Rising,
                reason: "simple delta: from 50 to 70".to_string(),
            },
            news_items: (0..news)
                .map(|i| NewsItem {
                    title: format!("news-{i}"),
                    link: format!("https://example.com/{i}"),
                    source: "Wire".to_string(),
                    date: "today".to_string(),
                })
                .collect(),
            ai_recommendation: None,
        }
    }

    #[test]
    fn test_prompt_is_bounded() {
        let prompt = build_prompt(&result_with_counts(9, 8, 7));
        assert!(prompt.contains("topic-4"));
        assert!(!prompt.contains("topic-5"));
        assert!(prompt.contains("query-4"));
        assert!(!prompt.contains("query-5"));
        assert!(prompt.contains("news-2"));
        assert!(!prompt.contains("news-3"));
    }

    #[test]
    fn test_prompt_carries_trend_and_rising_flags() {
        let prompt = build_prompt(&result_with_counts(1, 2, 1));
        assert!(prompt.contains("Trend Analysis: rising"));
        assert!(prompt.contains("query-0 (Rising)"));
        assert!(prompt.contains("- query-1\n"));
    }

    #[test]
    fn test_prompt_survives_empty_result() {
        let prompt = build_prompt(&result_with_counts(0, 0, 0));
        assert!(prompt.contains("Keyword: wireless earbuds"));
        assert!(prompt.contains("Related Topics:"));
    }
}
