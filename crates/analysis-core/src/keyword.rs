/// Qualifier words stripped when simplifying a keyword for the trends
/// upstream, which matches short generic phrases far better than long
/// marketing-flavored ones.
const SIMPLIFIER_WORDS: &[&str] = &[
    "best",
    "top",
    "latest",
    "new",
    "good",
    "great",
    "cheap",
    "affordable",
    "premium",
];

/// A keyword plus progressively simplified variants used as fallbacks when
/// the trends upstream has no data for the original phrasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    pub original: String,
    pub simplified: String,
    pub core: String,
}

impl KeywordQuery {
    pub fn new(keyword: &str) -> Self {
        let words: Vec<String> = keyword
            .to_lowercase()
            .split_whitespace()
            // Standalone 4-digit tokens are almost always model years
            .filter(|w| !(w.len() == 4 && w.chars().all(|c| c.is_ascii_digit())))
            .map(str::to_string)
            .collect();

        let mut core_words: Vec<String> = words
            .iter()
            .filter(|w| !SIMPLIFIER_WORDS.contains(&w.as_str()))
            .cloned()
            .collect();
        if core_words.is_empty() {
            core_words = words;
        }

        Self {
            original: keyword.to_string(),
            simplified: core_words.join(" "),
            core: core_words
                .iter()
                .take(2)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Fallback order: original first, then simplified, then core, with
    /// duplicates removed.
    pub fn variants(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(3);
        for v in [
            self.original.as_str(),
            self.simplified.as_str(),
            self.core.as_str(),
        ] {
            if !v.is_empty() && !out.contains(&v) {
                out.push(v);
            }
        }
        out
    }
}
