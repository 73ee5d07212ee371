use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Tabular rows as returned by the spreadsheet endpoint: row 0 names the
/// columns, every later row is data addressed through those names.
///
/// Serializes to and from the plain 2-D array form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<CellValue>>", into = "Vec<Vec<CellValue>>")]
pub struct RawRows {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    column_index: HashMap<String, usize>,
}

impl RawRows {
    /// Create an empty set of rows with no header
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rows from a 2-D vector whose first row is the header
    ///
    /// Header lookups are case-sensitive exact matches. When a name repeats
    /// the first column carrying it is used.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let mut iter = data.into_iter();
        let Some(header_row) = iter.next() else {
            return Self::new();
        };

        let headers: Vec<String> = header_row
            .into_iter()
            .map(|c| Into::<CellValue>::into(c).as_str())
            .collect();

        let mut column_index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            column_index.entry(name.clone()).or_insert(i);
        }

        let rows = iter
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        RawRows {
            headers,
            rows,
            column_index,
        }
    }

    /// Parse rows from a JSON string holding a 2-D array of primitives
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| SheetError::Parse(format!("Invalid JSON: {e}")))?;
        Self::from_json_value(&value)
    }

    /// Validate and convert a JSON 2-D array of primitives
    ///
    /// Objects or arrays nested inside a cell are rejected rather than
    /// coerced, so shape mismatches surface to the caller.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| SheetError::Parse("rows must be a JSON array".to_string()))?;

        let mut data: Vec<Vec<CellValue>> = Vec::with_capacity(array.len());
        for (row_idx, row) in array.iter().enumerate() {
            let cells = row.as_array().ok_or_else(|| {
                SheetError::Parse(format!("row {row_idx} must be an array of cells"))
            })?;

            let mut converted = Vec::with_capacity(cells.len());
            for (col_idx, cell) in cells.iter().enumerate() {
                converted.push(json_to_cell(cell).ok_or_else(|| {
                    SheetError::Parse(format!(
                        "cell at row {row_idx}, column {col_idx} is not a primitive value"
                    ))
                })?);
            }
            data.push(converted);
        }

        Ok(Self::from_data(data))
    }

    /// Header names in column order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// Index of a column that must be present
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| Row {
            number: i + 1,
            cells,
            parent: self,
        })
    }

    /// Convert back to the 2-D array form, header first
    #[must_use]
    pub fn to_array(&self) -> Vec<Vec<CellValue>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        if !self.headers.is_empty() {
            out.push(
                self.headers
                    .iter()
                    .map(|h| CellValue::String(h.clone()))
                    .collect(),
            );
        }
        out.extend(self.rows.iter().cloned());
        out
    }
}

impl From<Vec<Vec<CellValue>>> for RawRows {
    fn from(data: Vec<Vec<CellValue>>) -> Self {
        Self::from_data(data)
    }
}

impl From<RawRows> for Vec<Vec<CellValue>> {
    fn from(rows: RawRows) -> Self {
        rows.to_array()
    }
}

/// A borrowed data row with name-based cell access
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    number: usize,
    cells: &'a [CellValue],
    parent: &'a RawRows,
}

impl<'a> Row<'a> {
    /// Position of this row in the full grid (the header is row 0)
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Cell by column index; short rows yield `None` for trailing columns
    #[must_use]
    pub fn get(&self, col: usize) -> Option<&'a CellValue> {
        self.cells.get(col)
    }

    /// Cell by header name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&'a CellValue> {
        self.parent.column_index(name).and_then(|col| self.get(col))
    }

    /// Trimmed, non-blank text of the named column
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.get_by_name(name).and_then(CellValue::as_text)
    }
}

fn json_to_cell(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => Some(CellValue::Null),
        Value::Bool(b) => Some(CellValue::Bool(*b)),
        Value::Number(n) => Some(
            n.as_i64()
                .map(CellValue::Int)
                .unwrap_or_else(|| CellValue::Float(n.as_f64().unwrap_or(0.0))),
        ),
        Value::String(s) => Some(CellValue::String(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
