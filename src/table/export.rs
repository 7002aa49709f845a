//! Export of the processed rows to CSV, JSON and the CSV-as-Excel placeholder.

use super::column::Column;
use crate::domain::error::{Result, VuegeError};
use crate::domain::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    /// CSV body labelled as a spreadsheet download; no real workbook is built.
    Excel,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "excel",
        }
    }

    /// MIME type of the exported body.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv | Self::Excel => "text/csv",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = VuegeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(VuegeError::Export(format!("unsupported export format: {other}"))),
        }
    }
}

/// An exported page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    pub format: ExportFormat,
    pub content_type: &'static str,
    pub body: String,
}

/// Renders `rows` in `format`.
///
/// CSV starts with an unquoted header line of the labels of non-hidden columns,
/// followed by one line per row where every cell is formatted through the
/// column formatter, double-quoted, and has inner quotes doubled.
///
/// # Errors
///
/// Returns [`VuegeError::Json`] if a row fails to serialize.
pub fn render<T: Record + Serialize>(
    format: ExportFormat,
    columns: &[Column<T>],
    rows: &[&T],
) -> Result<Export> {
    let body = match format {
        ExportFormat::Csv | ExportFormat::Excel => to_csv(columns, rows),
        ExportFormat::Json => serde_json::to_string_pretty(rows)?,
    };
    Ok(Export {
        format,
        content_type: format.content_type(),
        body,
    })
}

fn to_csv<T: Record>(columns: &[Column<T>], rows: &[&T]) -> String {
    let visible: Vec<&Column<T>> = columns.iter().filter(|c| !c.hidden).collect();
    let header = visible
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let lines = rows
        .iter()
        .map(|row| {
            visible
                .iter()
                .map(|c| quote(&c.display(row)))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{header}\n{lines}")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::CellFormat;
    use serde_json::{json, Value};

    fn columns() -> Vec<Column<Value>> {
        vec![
            Column::new("name", "Name").field("name"),
            Column::new("founded", "Founded").field("founded").format(CellFormat::Year),
            Column::new("id", "Id").hidden(),
        ]
    }

    #[test]
    fn csv_quotes_and_formats() {
        let a = json!({ "id": 1, "name": "The \"Great\" Embassy", "founded": "1697-03-09" });
        let b = json!({ "id": 2, "name": "Senate" });
        let export = render(ExportFormat::Csv, &columns(), &[&a, &b]).unwrap();
        assert_eq!(
            export.body,
            "Name,Founded\n\"The \"\"Great\"\" Embassy\",\"1697\"\n\"Senate\",\"?\""
        );
        assert_eq!(export.content_type, "text/csv");
    }

    #[test]
    fn csv_of_no_rows_is_header_only() {
        let export = render::<Value>(ExportFormat::Excel, &columns(), &[]).unwrap();
        assert_eq!(export.body, "Name,Founded\n");
        assert_eq!(export.format, ExportFormat::Excel);
    }

    #[test]
    fn json_is_pretty_and_ordered() {
        let a = json!({ "name": "Synod", "id": 4 });
        let export = render(ExportFormat::Json, &columns(), &[&a]).unwrap();
        assert_eq!(export.body, "[\n  {\n    \"name\": \"Synod\",\n    \"id\": 4\n  }\n]");
        assert_eq!(export.content_type, "application/json");
    }

    #[test]
    fn format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!(matches!("pdf".parse::<ExportFormat>(), Err(VuegeError::Export(_))));
    }
}
