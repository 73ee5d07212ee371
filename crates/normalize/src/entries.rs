//! Decoding of the per-row products JSON cell.

use serde_json::{Map, Value};
use shelfwise_core::{ShelfError, ShelfResult};
use shelfwise_sheet::CellValue;

/// One decoded placement: `{ id, position, ...product fields }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementEntry(Map<String, Value>);

impl PlacementEntry {
    /// Wrap a decoded JSON object
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        PlacementEntry(fields)
    }

    /// Product id; numeric ids are rendered as strings
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    /// Non-empty position label
    #[must_use]
    pub fn position(&self) -> Option<String> {
        self.text("position")
    }

    /// Trimmed, non-empty text of a field; numbers and booleans are rendered
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric field, accepting numbers and numeric strings
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }

    /// Raw field access
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Decode a products cell into its placement entries.
///
/// A blank or missing cell yields no entries. A single object is treated as
/// an array of one; array elements that are not objects are dropped.
///
/// # Errors
///
/// Returns `ShelfError::Json` when the cell is not valid JSON and
/// `ShelfError::Schema` when it decodes to something other than an object or
/// an array.
pub fn decode_entries(cell: Option<&CellValue>) -> ShelfResult<Vec<PlacementEntry>> {
    let Some(cell) = cell.filter(|c| !c.is_blank()) else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(cell.as_str().trim())?;

    match value {
        Value::Object(fields) => Ok(vec![PlacementEntry(fields)]),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(PlacementEntry(fields)),
                other => {
                    tracing::debug!("ignoring non-object placement entry: {}", other);
                    None
                }
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ShelfError::schema(format!(
            "products cell must hold an object or an array, got {other}"
        ))),
    }
}
