//! View-state types: sort, filters, pagination and search mode.
//!
//! These are the declarative inputs to the table pipeline. They are plain
//! serializable values so a view can be stored in configuration or passed across
//! a process boundary.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vuege::table::{FilterConfig, FilterOperator, SortConfig, SortDirection};
//!
//! let sort = SortConfig::new("name", SortDirection::Desc);
//! let filter = FilterConfig::new("population", FilterOperator::Between, json!([1000, 5000]));
//! assert!(filter.validate().is_ok());
//! assert_eq!(sort.direction, SortDirection::Desc);
//! ```

use crate::domain::error::{Result, VuegeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl FromStr for SortDirection {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(VuegeError::Config(format!("unknown sort direction: {other}"))),
        }
    }
}

/// The single active sort of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    /// Column key (or raw property name) to sort by.
    pub key: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// Parses `key` or `key:asc|desc`; a bare key sorts ascending.
impl FromStr for SortConfig {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        let (key, direction) = match s.split_once(':') {
            Some((key, direction)) => (key, direction.parse()?),
            None => (s, SortDirection::Asc),
        };
        if key.is_empty() {
            return Err(VuegeError::Config(format!("missing sort key in '{s}'")));
        }
        Ok(Self::new(key, direction))
    }
}

/// Comparison applied by a [`FilterConfig`].
///
/// The set is closed: an operator name that is not listed here fails to parse
/// instead of silently letting every row through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Strict equality.
    Equals,
    /// Text containment after coercing both sides to text.
    Contains,
    /// Text prefix after coercing both sides to text.
    StartsWith,
    /// Text suffix after coercing both sides to text.
    EndsWith,
    /// Type-coercive `>`.
    GreaterThan,
    /// Type-coercive `<`.
    LessThan,
    /// Inclusive range; the operand is a two-element array.
    Between,
    /// Membership; the operand is an array.
    In,
}

impl FilterOperator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Equals,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::GreaterThan,
        Self::LessThan,
        Self::Between,
        Self::In,
    ];

    /// Returns the wire name of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::Between => "between",
            Self::In => "in",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| VuegeError::Filter(format!("unknown filter operator: {s}")))
    }
}

/// One filter condition; filters on a table combine with logical AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Column key (or raw property name) the filter reads.
    pub key: String,
    /// Operand compared against the cell.
    pub value: Value,
    /// Comparison to apply.
    pub operator: FilterOperator,
}

impl FilterConfig {
    pub fn new(key: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator,
        }
    }

    /// Shorthand for an `equals` filter.
    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, FilterOperator::Equals, value)
    }

    /// Shorthand for a `contains` filter.
    pub fn contains(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, FilterOperator::Contains, value)
    }

    /// Checks that the operand has the shape the operator needs.
    ///
    /// A table accepts malformed filters (they match no row); this check is for
    /// callers that want to reject them up front.
    ///
    /// # Errors
    ///
    /// Returns [`VuegeError::Filter`] if a `between` operand is not a
    /// two-element array or an `in` operand is not an array.
    pub fn validate(&self) -> Result<()> {
        match (self.operator, &self.value) {
            (FilterOperator::Between, Value::Array(bounds)) if bounds.len() == 2 => Ok(()),
            (FilterOperator::Between, _) => Err(VuegeError::Filter(format!(
                "between filter on '{}' needs a two-element array",
                self.key
            ))),
            (FilterOperator::In, Value::Array(_)) => Ok(()),
            (FilterOperator::In, _) => Err(VuegeError::Filter(format!(
                "in filter on '{}' needs an array",
                self.key
            ))),
            _ => Ok(()),
        }
    }
}

/// Parses `key:operator:value`.
///
/// The value is read as JSON when it parses (`3`, `true`, `[1, 5]`) and as
/// plain text otherwise. The result is [validated](FilterConfig::validate).
///
/// ```rust
/// use serde_json::json;
/// use vuege::table::{FilterConfig, FilterOperator};
///
/// let filter: FilterConfig = "population:between:[1000,5000]".parse()?;
/// assert_eq!(filter.operator, FilterOperator::Between);
/// assert_eq!(filter.value, json!([1000, 5000]));
/// # Ok::<(), vuege::VuegeError>(())
/// ```
impl FromStr for FilterConfig {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(key), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(VuegeError::Filter(format!("expected key:operator:value, got '{s}'")));
        };
        if key.is_empty() {
            return Err(VuegeError::Filter(format!("missing filter key in '{s}'")));
        }
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        let filter = Self::new(key, operator.parse()?, value);
        filter.validate()?;
        Ok(filter)
    }
}

/// Pagination state.
///
/// `page` is 1-based and never below 1; it is not clamped against the number of
/// pages, so a page past the end is simply empty. `total` is the number of rows
/// surviving search and filters, refreshed on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Pagination {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Number of pages needed for `total` rows; `0` when there are no rows.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Half-open index range of the current page within the processed rows.
    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.page_size).min(self.total);
        let end = start.saturating_add(self.page_size).min(self.total);
        (start, end)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// How free-text search matches a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Case-insensitive skim-style fuzzy matching.
    Fuzzy,
}

impl FromStr for SearchMode {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(VuegeError::Config(format!("unknown search mode: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_names_round_trip_through_serde() {
        for op in FilterOperator::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, json!(op.as_str()));
            assert_eq!(op.as_str().parse::<FilterOperator>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert!(matches!(
            "like".parse::<FilterOperator>(),
            Err(VuegeError::Filter(_))
        ));
        let parsed: std::result::Result<FilterConfig, _> =
            serde_json::from_value(json!({ "key": "a", "value": 1, "operator": "like" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_checks_operand_shape() {
        assert!(FilterConfig::new("a", FilterOperator::Between, json!([1, 2])).validate().is_ok());
        assert!(FilterConfig::new("a", FilterOperator::Between, json!([1])).validate().is_err());
        assert!(FilterConfig::new("a", FilterOperator::In, json!(3)).validate().is_err());
        assert!(FilterConfig::equals("a", json!(null)).validate().is_ok());
    }

    #[test]
    fn filter_from_text_reads_json_or_falls_back_to_text() {
        let numeric: FilterConfig = "population:greaterThan:100000".parse().unwrap();
        assert_eq!(numeric, FilterConfig::new("population", FilterOperator::GreaterThan, 100_000));

        let text: FilterConfig = "name:startsWith:Tv".parse().unwrap();
        assert_eq!(text.value, json!("Tv"));

        let quoted: FilterConfig = "code:equals:\"42\"".parse().unwrap();
        assert_eq!(quoted.value, json!("42"));

        let with_colons: FilterConfig = "time:equals:12:30".parse().unwrap();
        assert_eq!(with_colons.value, json!("12:30"));

        let members: FilterConfig = "name:in:[\"Tver\",\"Tula\"]".parse().unwrap();
        assert_eq!(members.value, json!(["Tver", "Tula"]));
    }

    #[test]
    fn filter_from_text_rejects_malformed_input() {
        for raw in ["name:equals", ":equals:x", "name:gte:3", "population:between:5", "name:in:Tver"] {
            assert!(
                matches!(raw.parse::<FilterConfig>(), Err(VuegeError::Filter(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn sort_from_text() {
        assert_eq!(
            "name".parse::<SortConfig>().unwrap(),
            SortConfig::new("name", SortDirection::Asc)
        );
        assert_eq!(
            "name:desc".parse::<SortConfig>().unwrap(),
            SortConfig::new("name", SortDirection::Desc)
        );
        assert!(matches!("name:sideways".parse::<SortConfig>(), Err(VuegeError::Config(_))));
        assert!(":desc".parse::<SortConfig>().is_err());
    }

    #[test]
    fn pagination_bounds() {
        let mut p = Pagination::new(2);
        p.total = 5;
        assert_eq!(p.bounds(), (0, 2));
        assert_eq!(p.total_pages(), 3);
        p.page = 3;
        assert_eq!(p.bounds(), (4, 5));
        p.page = 9;
        assert_eq!(p.bounds(), (5, 5));
        assert_eq!(Pagination::new(0).page_size, 1);
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
