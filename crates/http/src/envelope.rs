use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use shelfwise_core::{ShelfError, ShelfResult};
use shelfwise_sheet::RawRows;

/// Response shape of the spreadsheet endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RawRows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RowEnvelope {
    /// Validate a decoded response body.
    ///
    /// The body must be an object with a boolean `success`. When `data` is
    /// present and not null it must be a 2-D array of primitive cells.
    ///
    /// # Errors
    ///
    /// Returns `ShelfError::Schema` describing the first mismatch.
    pub fn from_json(body: &JsonValue) -> ShelfResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| ShelfError::schema("response must be a JSON object"))?;

        let success = match object.get("success") {
            Some(JsonValue::Bool(b)) => *b,
            Some(other) => {
                return Err(ShelfError::schema(format!(
                    "'success' must be a boolean, got {other}"
                )))
            }
            None => return Err(ShelfError::schema("response has no 'success' field")),
        };

        let data = match object.get("data") {
            None | Some(JsonValue::Null) => None,
            Some(data) => Some(
                RawRows::from_json_value(data)
                    .map_err(|e| ShelfError::schema(format!("'data': {e}")))?,
            ),
        };

        let message = match object.get("message") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(RowEnvelope {
            success,
            data,
            message,
        })
    }

    /// The rows, or empty rows when the call failed or carried no data
    #[must_use]
    pub fn into_rows(self) -> RawRows {
        match (self.success, self.data) {
            (true, Some(rows)) => rows,
            (true, None) => {
                tracing::warn!("row source answered without data");
                RawRows::new()
            }
            (false, _) => {
                tracing::warn!(
                    "row source reported failure: {}",
                    self.message.as_deref().unwrap_or("no message")
                );
                RawRows::new()
            }
        }
    }
}

/// Read rows from a JSON document that is either an envelope or a bare
/// 2-D array.
///
/// # Errors
///
/// Returns `ShelfError::Schema` when the document is neither.
pub fn rows_from_document(document: &JsonValue) -> ShelfResult<RawRows> {
    match document {
        JsonValue::Array(_) => RawRows::from_json_value(document)
            .map_err(|e| ShelfError::schema(e.to_string())),
        JsonValue::Object(_) => Ok(RowEnvelope::from_json(document)?.into_rows()),
        other => Err(ShelfError::schema(format!(
            "expected an envelope object or a rows array, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_rows() {
        let env = RowEnvelope::from_json(&json!({
            "success": true,
            "data": [["shelfId"], ["s1"]],
            "message": "ok"
        }))
        .unwrap();
        assert!(env.success);
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.into_rows().row_count(), 1);
    }

    #[test]
    fn test_failure_is_no_rows() {
        let env = RowEnvelope::from_json(&json!({"success": false, "message": "quota"})).unwrap();
        assert!(env.into_rows().is_empty());

        let env = RowEnvelope::from_json(&json!({"success": true, "data": null})).unwrap();
        assert!(env.into_rows().is_empty());
    }

    #[test]
    fn test_shape_mismatches_are_schema_errors() {
        for body in [
            json!([1, 2]),
            json!({"data": []}),
            json!({"success": "yes"}),
            json!({"success": true, "data": {"rows": []}}),
            json!({"success": true, "data": [["a"], [{"nested": 1}]]}),
        ] {
            let err = RowEnvelope::from_json(&body).unwrap_err();
            assert!(matches!(err, ShelfError::Schema(_)), "{body}");
        }
    }

    #[test]
    fn test_document_forms() {
        let bare = rows_from_document(&json!([["a"], [1], [2]])).unwrap();
        assert_eq!(bare.row_count(), 2);

        let wrapped = rows_from_document(&json!({"success": true, "data": [["a"], [1]]})).unwrap();
        assert_eq!(wrapped.row_count(), 1);

        assert!(rows_from_document(&json!("rows")).is_err());
    }
}
