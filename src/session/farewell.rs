use serde::{Deserialize, Serialize};

/// Default closing phrases evaluated against every finalized participant
/// utterance.
pub const DEFAULT_FAREWELL_PHRASES: [&str; 4] =
    ["goodbye", "see you", "talk to you later", "i have to go"];

/// Fixed-phrase farewell matcher.
///
/// Matching is deliberately literal: the utterance is lower-cased and
/// trimmed, and a phrase matches wherever it appears with word boundaries on
/// both sides (string edge or a non-alphanumeric neighbor). That covers exact
/// matches, `phrase.`/`phrase!`/`phrase,` prefixes, and phrases surrounded by
/// spaces, while rejecting embedded hits like "goodbyeing". Benign sentences
/// containing a phrase ("i have to go get coffee") do match; that tradeoff is
/// intentional and callers should not second-guess it with smarter parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarewellDetector {
    phrases: Vec<String>,
}

impl Default for FarewellDetector {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_FAREWELL_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl FarewellDetector {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases: phrases.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Whether `text` reads as a farewell.
    pub fn matches(&self, text: &str) -> bool {
        let cleaned = text.to_lowercase();
        let cleaned = cleaned.trim();
        self.phrases
            .iter()
            .any(|phrase| contains_bounded(cleaned, phrase))
    }
}

/// `haystack` contains `needle` with non-alphanumeric (or edge) characters on
/// both sides.
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();
        let before = haystack[..at].chars().next_back();
        let after = haystack[end..].chars().next();
        let boundary = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
        if boundary(before) && boundary(after) {
            return true;
        }
        start = end;
    }
    false
}
