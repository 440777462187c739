//! Free-text search term handling.
//!
//! Turns raw `?search=` input into a normalized term and the `ILIKE`
//! patterns the repository layer binds. Kept in `core` so the rules are
//! testable without a database.

/// Maximum number of characters of a search term that are kept.
pub const MAX_SEARCH_TERM_LEN: usize = 200;

/// Score added when a column starts with the search phrase.
pub const PREFIX_MATCH_BONUS: f64 = 2.0;

/// Score added when a column contains the search phrase anywhere.
pub const SUBSTRING_MATCH_BONUS: f64 = 1.0;

/// Score added when a run of words is within one character edit of the phrase.
pub const TYPO_MATCH_BONUS: f64 = 0.5;

/// A normalized, non-empty search phrase.
///
/// Whitespace is trimmed and collapsed to single spaces; token order is
/// preserved so phrase matching stays sequential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Normalize raw input. Control characters are dropped. Returns `None`
    /// if nothing usable remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_core::search::SearchTerm;
    /// assert_eq!(SearchTerm::parse("  love   song ").unwrap().as_str(), "love song");
    /// assert!(SearchTerm::parse("   ").is_none());
    /// assert_eq!(SearchTerm::parse("lo\0ve").unwrap().as_str(), "love");
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let printable: String = raw
            .chars()
            .filter(|c| c.is_whitespace() || !c.is_control())
            .collect();
        let collapsed = printable.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return None;
        }
        let truncated: String = collapsed.chars().take(MAX_SEARCH_TERM_LEN).collect();
        Some(Self(truncated.trim_end().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern matching the phrase anywhere in a column.
    pub fn contains_pattern(&self) -> String {
        format!("%{}%", escape_like(&self.0))
    }

    /// `ILIKE` pattern matching columns that start with the phrase.
    pub fn prefix_pattern(&self) -> String {
        format!("{}%", escape_like(&self.0))
    }
}

/// Escape `LIKE` metacharacters so user input is matched literally.
///
/// Uses backslash, PostgreSQL's default `LIKE` escape character.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
