//! Column definitions and cell formatting.
//!
//! A [`Column`] names a cell, optionally says how to read it from a row
//! ([`Field`]) and how to print it ([`Formatter`]). Only columns with a field
//! take part in free-text search.

use crate::domain::value::to_text;
use crate::domain::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Closure reading a cell from a row.
pub type AccessorFn<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// Closure rendering a cell; receives the resolved value and the row.
pub type FormatFn<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// How a column reads its value from a row.
pub enum Field<T> {
    /// Raw property lookup through [`Record::field`].
    Key(String),
    /// Computed value.
    Accessor(AccessorFn<T>),
}

impl<T: Record> Field<T> {
    /// Resolves the field against `row`.
    pub fn resolve(&self, row: &T) -> Value {
        match self {
            Self::Key(name) => row.field(name),
            Self::Accessor(f) => f(row),
        }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Key(name) => Self::Key(name.clone()),
            Self::Accessor(f) => Self::Accessor(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.debug_tuple("Key").field(name).finish(),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// Built-in cell formats, usable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CellFormat {
    /// `DD.MM.YYYY`, `-` when the value is not a date.
    Date,
    /// `YYYY-MM-DD`, `-` when the value is not a date.
    ApiDate,
    /// `DD.MM.YYYY HH:MM`, `-` when the value is not a date.
    DateTime,
    /// Four-digit year, `?` when the value is not a date.
    Year,
    /// Cuts text longer than `max_len` characters and appends `...`.
    Truncate {
        /// Maximum number of characters kept.
        max_len: usize,
    },
}

impl CellFormat {
    /// Renders `value` in this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use vuege::table::CellFormat;
    ///
    /// assert_eq!(CellFormat::Date.apply(&json!("1721-10-22")), "22.10.1721");
    /// assert_eq!(CellFormat::Year.apply(&json!(null)), "?");
    /// assert_eq!(CellFormat::Truncate { max_len: 3 }.apply(&json!("Tsardom")), "Tsa...");
    /// ```
    #[must_use]
    pub fn apply(self, value: &Value) -> String {
        match self {
            Self::Date => parse_datetime(value).map_or_else(
                || "-".to_string(),
                |dt| dt.format("%d.%m.%Y").to_string(),
            ),
            Self::ApiDate => parse_datetime(value).map_or_else(
                || "-".to_string(),
                |dt| dt.format("%Y-%m-%d").to_string(),
            ),
            Self::DateTime => parse_datetime(value).map_or_else(
                || "-".to_string(),
                |dt| dt.format("%d.%m.%Y %H:%M").to_string(),
            ),
            Self::Year => parse_datetime(value).map_or_else(
                || "?".to_string(),
                |dt| dt.format("%Y").to_string(),
            ),
            Self::Truncate { max_len } => {
                let text = to_text(value);
                if text.chars().count() <= max_len {
                    text
                } else {
                    let head: String = text.chars().take(max_len).collect();
                    format!("{head}...")
                }
            }
        }
    }
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` and plain `YYYY-MM-DD`.
fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// How a column renders its cells for export and display.
pub enum Formatter<T> {
    /// One of the built-in formats.
    Builtin(CellFormat),
    /// Caller-provided rendering.
    Custom(FormatFn<T>),
}

impl<T> Formatter<T> {
    /// Wraps a rendering closure.
    pub fn custom(f: impl Fn(&Value, &T) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    fn apply(&self, value: &Value, row: &T) -> String {
        match self {
            Self::Builtin(format) => format.apply(value),
            Self::Custom(f) => f(value, row),
        }
    }
}

impl<T> Clone for Formatter<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Builtin(format) => Self::Builtin(*format),
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Formatter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(format) => f.debug_tuple("Builtin").field(format).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A table column.
///
/// Built with [`Column::new`] and the chaining setters:
///
/// ```
/// use serde_json::Value;
/// use vuege::table::{CellFormat, Column};
///
/// let founded: Column<Value> = Column::new("founded", "Founded")
///     .field("start_date")
///     .sortable()
///     .format(CellFormat::Year);
/// assert!(founded.is_searchable());
/// ```
pub struct Column<T> {
    /// Identifier used by sort and filter configs.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Where the cell value comes from; `None` excludes the column from search.
    pub field: Option<Field<T>>,
    /// Whether header clicks may sort by this column.
    pub sortable: bool,
    /// Whether filters may target this column.
    pub filterable: bool,
    /// Hidden columns are left out of CSV exports and views.
    pub hidden: bool,
    /// Optional renderer for exports and views.
    pub formatter: Option<Formatter<T>>,
}

impl<T> Column<T> {
    /// Creates a column without a field; it is neither sortable nor filterable.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field: None,
            sortable: false,
            filterable: false,
            hidden: false,
            formatter: None,
        }
    }

    /// Reads the cell from the named property.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(Field::Key(name.into()));
        self
    }

    /// Computes the cell with a closure.
    #[must_use]
    pub fn accessor(mut self, f: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.field = Some(Field::Accessor(Arc::new(f)));
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Renders cells with a built-in format.
    #[must_use]
    pub fn format(mut self, format: CellFormat) -> Self {
        self.formatter = Some(Formatter::Builtin(format));
        self
    }

    /// Renders cells with a closure.
    #[must_use]
    pub fn format_with(mut self, f: impl Fn(&Value, &T) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Formatter::custom(f));
        self
    }

    /// Returns `true` if free-text search looks at this column.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.field.is_some()
    }
}

impl<T: Record> Column<T> {
    /// Resolves the cell value: the field when set, otherwise the property
    /// named like the column key.
    pub fn value(&self, row: &T) -> Value {
        self.field
            .as_ref()
            .map_or_else(|| row.field(&self.key), |field| field.resolve(row))
    }

    /// Renders the cell as text through the formatter, if any.
    pub fn display(&self, row: &T) -> String {
        let value = self.value(row);
        self.formatter
            .as_ref()
            .map_or_else(|| to_text(&value), |formatter| formatter.apply(&value, row))
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            field: self.field.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            hidden: self.hidden,
            formatter: self.formatter.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("field", &self.field)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("hidden", &self.hidden)
            .field("formatter", &self.formatter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_falls_back_to_key_lookup() {
        let row = json!({ "name": "Perm", "population": 1000 });
        let bare: Column<Value> = Column::new("name", "Name");
        let mapped: Column<Value> = Column::new("people", "People").field("population");
        let computed: Column<Value> = Column::new("label", "Label")
            .accessor(|row: &Value| json!(format!("{} ({})", to_text(&row.field("name")), "city")));

        assert_eq!(bare.value(&row), json!("Perm"));
        assert_eq!(mapped.value(&row), json!(1000));
        assert_eq!(computed.display(&row), "Perm (city)");
        assert!(!bare.is_searchable());
    }

    #[test]
    fn date_formats() {
        let value = json!("2024-03-05T14:07:00Z");
        assert_eq!(CellFormat::Date.apply(&value), "05.03.2024");
        assert_eq!(CellFormat::ApiDate.apply(&value), "2024-03-05");
        assert_eq!(CellFormat::DateTime.apply(&value), "05.03.2024 14:07");
        assert_eq!(CellFormat::Year.apply(&json!("1917-11-07")), "1917");
        assert_eq!(CellFormat::Date.apply(&json!("not a date")), "-");
        assert_eq!(CellFormat::Date.apply(&json!(12)), "-");
    }

    #[test]
    fn truncate_counts_characters() {
        let format = CellFormat::Truncate { max_len: 4 };
        assert_eq!(format.apply(&json!("Новгород")), "Новг...");
        assert_eq!(format.apply(&json!("Ufa")), "Ufa");
    }

    #[test]
    fn custom_formatter_sees_row() {
        let column: Column<Value> = Column::new("area", "Area")
            .field("area")
            .format_with(|value, row: &Value| format!("{} {}", to_text(value), to_text(&row.field("unit"))));
        let row = json!({ "area": 12.5, "unit": "km2" });
        assert_eq!(column.display(&row), "12.5 km2");
    }

    #[test]
    fn cell_format_deserializes_tagged() {
        let format: CellFormat = serde_json::from_value(json!({ "kind": "truncate", "max_len": 10 })).unwrap();
        assert_eq!(format, CellFormat::Truncate { max_len: 10 });
        let format: CellFormat = serde_json::from_value(json!({ "kind": "year" })).unwrap();
        assert_eq!(format, CellFormat::Year);
    }
}
