//! Deciding whether tool input is SQL or a natural-language question.

/// Predicate separating SQL from natural language.
pub trait QueryClassifier: Send + Sync {
    fn is_sql(&self, input: &str) -> bool;
}

/// Case-insensitive prefix match against a keyword list.
#[derive(Debug, Clone)]
pub struct KeywordPrefixClassifier {
    keywords: Vec<String>,
}

impl KeywordPrefixClassifier {
    pub const DEFAULT_KEYWORDS: &'static [&'static str] = &["select", "with", "show", "describe"];

    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordPrefixClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEYWORDS)
    }
}

impl QueryClassifier for KeywordPrefixClassifier {
    fn is_sql(&self, input: &str) -> bool {
        let normalized = input.trim().to_lowercase();
        self.keywords.iter().any(|k| normalized.starts_with(k.as_str()))
    }
}
