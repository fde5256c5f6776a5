use analysis_core::{OverallSentiment, Reply, ReplySentiment, SentimentLabel, SentimentSummary};
use chrono::Utc;
use std::collections::HashSet;

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't", "hardly",
    "barely", "neither", "nor", "without",
];

const NEGATION_WINDOW: usize = 3;

/// Classification thresholds on the compound score. One fixed set is used
/// for both per-reply labels and the batch mean.
const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Lexicon/rule-based reply scorer. Local by construction: scoring a batch
/// never touches the network, so reply analysis stays available when every
/// upstream is down.
pub struct SentimentEngine {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
}

impl SentimentEngine {
    pub fn new() -> Self {
        Self {
            positive_words: vec![
                "love", "loved", "great", "good", "awesome", "amazing", "excellent",
                "beautiful", "fantastic", "wonderful", "perfect", "best", "incredible",
                "helpful", "useful", "insightful", "inspiring", "brilliant", "cool",
                "nice", "happy", "excited", "fun", "win", "winning", "fire",
                "congrats", "congratulations", "thanks", "thank", "agree", "yes",
                "underrated", "gem", "masterpiece", "quality", "solid", "fresh",
            ],
            negative_words: vec![
                "hate", "hated", "bad", "terrible", "awful", "horrible", "worst",
                "ugly", "boring", "scam", "spam", "fake", "cringe", "trash",
                "disappointing", "disappointed", "broken", "poor", "annoying",
                "useless", "pointless", "wrong", "stupid", "dumb", "sad", "angry",
                "mislead", "misleading", "overrated", "clickbait", "lame", "fail",
                "failing", "gross", "meh", "unfollow", "blocked",
            ],
        }
    }

    /// Raw lexicon score: +1 per positive hit, -1 per negative hit, flipped
    /// when a negation word appears within the preceding window.
    fn score_text(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower
            .split(|c: char| {
                c.is_whitespace() || c == ',' || c == ';' || c == '.' || c == '!' || c == '?'
            })
            .filter(|w| !w.is_empty())
            .collect();

        let positive_set: HashSet<&str> = self.positive_words.iter().copied().collect();
        let negative_set: HashSet<&str> = self.negative_words.iter().copied().collect();
        let negation_set: HashSet<&str> = NEGATION_WORDS.iter().copied().collect();

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| negation_set.contains(*w))
            .map(|(i, _)| i)
            .collect();

        let mut score: i32 = 0;
        for (i, word) in words.iter().enumerate() {
            let is_positive = positive_set.contains(*word);
            let is_negative = negative_set.contains(*word);
            if !is_positive && !is_negative {
                continue;
            }

            let negated = negation_positions
                .iter()
                .any(|&neg_pos| neg_pos < i && (i - neg_pos) <= NEGATION_WINDOW);

            if is_positive {
                score += if negated { -1 } else { 1 };
            } else {
                score += if negated { 1 } else { -1 };
            }
        }

        score as f64
    }

    /// Compound polarity in [-1, 1]: the raw hit score squashed with tanh.
    pub fn compound(&self, text: &str) -> f64 {
        (self.score_text(text) / 3.0).tanh()
    }

    fn label_for(compound: f64) -> SentimentLabel {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    fn overall_for(mean: f64) -> OverallSentiment {
        if mean >= POSITIVE_THRESHOLD {
            OverallSentiment::Positive
        } else if mean <= NEGATIVE_THRESHOLD {
            OverallSentiment::Negative
        } else {
            OverallSentiment::Neutral
        }
    }

    /// Score a batch of replies. Empty-text replies are excluded from both
    /// the per-reply output and the mean; a reply whose score comes out
    /// non-finite is recorded with an ERROR label and the batch continues.
    pub fn score_replies(&self, replies: &[Reply]) -> SentimentSummary {
        let mut per_reply = Vec::new();
        let mut sum = 0.0;
        let mut counted = 0usize;

        for reply in replies {
            if reply.text.trim().is_empty() {
                continue;
            }

            let compound = self.compound(&reply.text);
            if !compound.is_finite() {
                tracing::warn!(reply_id = %reply.id, "reply scoring produced a non-finite value");
                per_reply.push(ReplySentiment {
                    id: reply.id.clone(),
                    author: reply.username.clone(),
                    text: reply.text.clone(),
                    label: SentimentLabel::Error,
                    compound: 0.0,
                });
                continue;
            }

            sum += compound;
            counted += 1;
            per_reply.push(ReplySentiment {
                id: reply.id.clone(),
                author: reply.username.clone(),
                text: reply.text.clone(),
                label: Self::label_for(compound),
                compound,
            });
        }

        let (cumulative, overall) = if counted == 0 {
            (0.0, OverallSentiment::NoData)
        } else {
            let mean = sum / counted as f64;
            (mean, Self::overall_for(mean))
        };

        SentimentSummary {
            per_reply,
            cumulative,
            overall,
            recommendations: recommendations_for(overall),
            analyzed_at: Utc::now(),
        }
    }
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Canned strategy suggestions keyed off the aggregate label.
fn recommendations_for(overall: OverallSentiment) -> Vec<String> {
    let suggestions: &[&str] = match overall {
        OverallSentiment::Positive => &[
            "Your audience is responding well. Double down on this topic with a follow-up post.",
            "Reply to your most enthusiastic commenters to turn them into regulars.",
            "Pin the strongest reply to surface the positive conversation.",
        ],
        OverallSentiment::Negative => &[
            "Address the most common criticism head-on in a follow-up post.",
            "Reply to detailed negative feedback publicly; it shows you listen.",
            "Rework the framing of this topic before posting about it again.",
        ],
        OverallSentiment::Neutral => &[
            "Engagement is lukewarm. Try a stronger hook or a direct question.",
            "Ask your audience what they want to see next on this topic.",
        ],
        OverallSentiment::NoData => &[
            "Not enough replies yet to read the room. Post consistently and re-run the analysis.",
        ],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}
