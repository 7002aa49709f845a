//! Filter and search matching.
//!
//! [`matches`] decides a single [`FilterConfig`] against a resolved cell value.
//! [`SearchMatcher`] decides the free-text search against the text of a cell.

use super::query::{FilterConfig, FilterOperator, SearchMode};
use crate::domain::value::{loose_cmp, strict_eq, to_text};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;
use std::cmp::Ordering;

/// Returns `true` if `value` satisfies `filter`.
///
/// Relational operators use [`loose_cmp`], so a pair that cannot be compared
/// never matches. A `between` operand that is not a two-element array and an
/// `in` operand that is not an array match nothing.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vuege::table::{filter::matches, FilterConfig, FilterOperator};
///
/// let adults = FilterConfig::new("age", FilterOperator::GreaterThan, json!(17));
/// assert!(matches(&json!(30), &adults));
/// assert!(matches(&json!("30"), &adults));
/// assert!(!matches(&json!("n/a"), &adults));
/// ```
#[must_use]
pub fn matches(value: &Value, filter: &FilterConfig) -> bool {
    let operand = &filter.value;
    match filter.operator {
        FilterOperator::Equals => strict_eq(value, operand),
        FilterOperator::Contains => to_text(value).contains(&to_text(operand)),
        FilterOperator::StartsWith => to_text(value).starts_with(&to_text(operand)),
        FilterOperator::EndsWith => to_text(value).ends_with(&to_text(operand)),
        FilterOperator::GreaterThan => loose_cmp(value, operand) == Some(Ordering::Greater),
        FilterOperator::LessThan => loose_cmp(value, operand) == Some(Ordering::Less),
        FilterOperator::Between => match operand.as_array().map(Vec::as_slice) {
            Some([low, high]) => {
                matches!(loose_cmp(value, low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(loose_cmp(value, high), Some(Ordering::Less | Ordering::Equal))
            }
            _ => false,
        },
        FilterOperator::In => operand
            .as_array()
            .is_some_and(|items| items.iter().any(|item| strict_eq(value, item))),
    }
}

/// Case-insensitive free-text matcher prepared from a search string.
///
/// In [`SearchMode::Substring`] a cell matches when its lowercase text contains
/// the lowercase term. In [`SearchMode::Fuzzy`] the term is split on whitespace
/// and every token must fuzzy-match the cell.
pub struct SearchMatcher {
    term: String,
    tokens: Vec<String>,
    fuzzy: Option<SkimMatcherV2>,
}

impl SearchMatcher {
    /// Prepares a matcher, or returns `None` when `search` is empty.
    #[must_use]
    pub fn new(search: &str, mode: SearchMode) -> Option<Self> {
        if search.is_empty() {
            return None;
        }
        let term = search.to_lowercase();
        let (tokens, fuzzy) = match mode {
            SearchMode::Substring => (Vec::new(), None),
            SearchMode::Fuzzy => (
                term.split_whitespace().map(str::to_string).collect(),
                Some(SkimMatcherV2::default()),
            ),
        };
        Some(Self { term, tokens, fuzzy })
    }

    /// Returns `true` if the cell text matches.
    ///
    /// Empty cells (including `null`) never match a non-empty search. A `null`
    /// cell is not spelled out as the text `"null"` the way JavaScript's
    /// `String(null)` would, so searching for `nul` skips it.
    #[must_use]
    pub fn is_match(&self, value: &Value) -> bool {
        let text = to_text(value).to_lowercase();
        if text.is_empty() {
            return false;
        }
        match &self.fuzzy {
            None => text.contains(&self.term),
            Some(_) if self.tokens.is_empty() => text.contains(&self.term),
            Some(matcher) => self
                .tokens
                .iter()
                .all(|token| matcher.fuzzy_match(&text, token).is_some()),
        }
    }
}
