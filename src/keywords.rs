//! The user-managed list of search keywords.

use serde::Serialize;
use thiserror::Error;

/// Keywords the dashboard starts with and returns to on reset.
pub const DEFAULT_KEYWORDS: [&str; 6] = [
    "carbon measures",
    "scope 3 emissions",
    "exxon scope 3",
    "greenhouse gas protocol scope 3",
    "Amy Bracchio",
    "Karthik Ramanna",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeywordError {
    #[error("Please enter a keyword")]
    Empty,

    #[error("Keyword already exists: {0}")]
    Duplicate(String),
}

/// An insertion-ordered set of keywords.
///
/// Comparison is exact after trimming, so `"Exxon"` and `"exxon"` are two
/// distinct keywords, matching how Google treats them as separate queries.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSet {
    keywords: Vec<String>,
    #[serde(skip)]
    defaults: Vec<String>,
}

impl KeywordSet {
    /// Build a set seeded with `defaults`. Blank and repeated seeds are dropped.
    pub fn new(defaults: Vec<String>) -> Self {
        let mut set = Self {
            keywords: Vec::new(),
            defaults: Vec::new(),
        };
        for keyword in defaults {
            // invalid seeds are ignored rather than reported
            let _ = set.add(&keyword);
        }
        set.defaults = set.keywords.clone();
        set
    }

    /// Append a keyword, returning the trimmed value that was stored.
    pub fn add(&mut self, keyword: &str) -> Result<String, KeywordError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(KeywordError::Empty);
        }
        if self.contains(keyword) {
            return Err(KeywordError::Duplicate(keyword.to_string()));
        }
        self.keywords.push(keyword.to_string());
        Ok(keyword.to_string())
    }

    /// Remove a keyword. Returns `false` if it was not present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        before != self.keywords.len()
    }

    pub fn reset(&mut self) {
        self.keywords = self.defaults.clone();
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// The seed list restored by [`KeywordSet::reset`].
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}
