use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CreateOccurrence,
    Signup,
    ListAttendees,
    ListOccurrences,
    NextOccurrence,
    Unknown,
}

static SIGNUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bi['’]?(?:m|ll)\s*(?:in|play|playing)\b").expect("Invalid regex")
});
static LIST_ATTENDEES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwho(?:['’]?s|\s+is)\s+playing\b").expect("Invalid regex")
});
static LIST_OCCURRENCES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfixture\s+list\b").expect("Invalid regex"));
static NEXT_OCCURRENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnext\s+game\b").expect("Invalid regex"));

/// Maps message text to a single intent. The first matching pattern wins, in
/// the order create, signup, attendees, fixture list, next game.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    create_pattern: Regex,
}

impl IntentRouter {
    pub fn new(bot_name: &str) -> Result<Self, regex::Error> {
        let name = bot_name.trim();
        // `\b` only holds next to a word character, so symbol edges use a non-word guard.
        let leading = match name.chars().next() {
            Some(c) if is_word_char(c) => r"\b",
            _ => r"(?:^|\W)",
        };
        let trailing = match name.chars().last() {
            Some(c) if is_word_char(c) => r"\b",
            _ => r"(?:\W|$)",
        };
        let create_pattern =
            Regex::new(&format!(r"(?i){}{}{}", leading, regex::escape(name), trailing))?;
        Ok(Self { create_pattern })
    }

    pub fn route(&self, text: &str) -> Intent {
        let text = text.trim();
        if text.is_empty() {
            return Intent::Unknown;
        }
        if self.create_pattern.is_match(text) {
            Intent::CreateOccurrence
        } else if SIGNUP_PATTERN.is_match(text) {
            Intent::Signup
        } else if LIST_ATTENDEES_PATTERN.is_match(text) {
            Intent::ListAttendees
        } else if LIST_OCCURRENCES_PATTERN.is_match(text) {
            Intent::ListOccurrences
        } else if NEXT_OCCURRENCE_PATTERN.is_match(text) {
            Intent::NextOccurrence
        } else {
            Intent::Unknown
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
