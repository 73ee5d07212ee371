use crate::entries::decode_entries;
use shelfwise_core::model::today;
use shelfwise_core::{ColumnNames, ShelfGridItem};
use shelfwise_sheet::RawRows;

/// Product id used in grid ids when an entry carries none.
pub const UNKNOWN_PRODUCT_ID: &str = "unknown";

/// Flattened placements and the number of rows whose products cell could
/// not be decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridItems {
    pub items: Vec<ShelfGridItem>,
    pub skipped_rows: usize,
}

/// Flatten every `(row, entry)` pair into a [`ShelfGridItem`].
///
/// Rows with a blank products cell contribute nothing. A row whose cell
/// fails to decode is logged and skipped without affecting later rows.
/// Entries without a position are dropped while their siblings are kept.
#[must_use]
pub fn parse_grid_items(rows: &RawRows, columns: &ColumnNames) -> GridItems {
    let mut out = GridItems::default();
    let placed_fallback = today();

    for row in rows.rows() {
        let entries = match decode_entries(row.get_by_name(&columns.products_json)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("skipping row {}: invalid products cell: {}", row.number(), e);
                out.skipped_rows += 1;
                continue;
            }
        };
        if entries.is_empty() {
            continue;
        }

        let shelf_id = row
            .text(&columns.shelf_id)
            .unwrap_or_else(|| format!("row{}", row.number()));
        let user_email = row.text(&columns.user_email).unwrap_or_default();
        let user_name = row.text(&columns.user_name).unwrap_or_default();
        let location = row.text(&columns.location).unwrap_or_default();
        let placed_date = row
            .text(&columns.created_at)
            .unwrap_or_else(|| placed_fallback.clone());

        for entry in entries {
            let Some(position) = entry.position() else {
                tracing::debug!(
                    "row {}: dropping entry {:?} without a position",
                    row.number(),
                    entry.id()
                );
                continue;
            };
            let product_id = entry
                .id()
                .unwrap_or_else(|| UNKNOWN_PRODUCT_ID.to_string());

            out.items.push(ShelfGridItem {
                grid_id: format!("{shelf_id}_{product_id}"),
                shelf_position: position,
                product_id,
                user_id: user_email.clone(),
                user_email: user_email.clone(),
                user_name: user_name.clone(),
                location: location.clone(),
                placed_date: placed_date.clone(),
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: Vec<Vec<&str>>) -> RawRows {
        let mut all = vec![vec![
            "shelfId",
            "userEmail",
            "userName",
            "location",
            "createdAt",
            "productsJson",
        ]];
        all.extend(data);
        RawRows::from_data(all)
    }

    #[test]
    fn test_grid_id_and_user_fields() {
        let parsed = parse_grid_items(
            &rows(vec![vec![
                "s1",
                "a@x.com",
                "A",
                "Store1",
                "2024-01-01",
                r#"[{"id":"p1","position":"A1"},{"position":"B2"}]"#,
            ]]),
            &ColumnNames::default(),
        );

        assert_eq!(parsed.items.len(), 2);
        let first = &parsed.items[0];
        assert_eq!(first.grid_id, "s1_p1");
        assert_eq!(first.user_id, "a@x.com");
        assert_eq!(first.user_email, "a@x.com");
        assert_eq!(first.location, "Store1");
        assert_eq!(first.placed_date, "2024-01-01");
        assert_eq!(parsed.items[1].grid_id, "s1_unknown");
        assert_eq!(parsed.items[1].product_id, "unknown");
    }

    #[test]
    fn test_missing_shelf_id_and_date_fall_back() {
        let parsed = parse_grid_items(
            &rows(vec![vec![
                "",
                "a@x.com",
                "A",
                "",
                "",
                r#"{"id":"p1","position":"C3"}"#,
            ]]),
            &ColumnNames::default(),
        );

        assert_eq!(parsed.items[0].grid_id, "row1_p1");
        assert_eq!(parsed.items[0].placed_date, today());
    }

    #[test]
    fn test_bad_row_does_not_stop_later_rows() {
        let parsed = parse_grid_items(
            &rows(vec![
                vec!["s1", "a@x.com", "A", "", "", "{not json"],
                vec!["s2", "b@x.com", "B", "", "", r#"[{"id":"p2","position":"A1"}]"#],
            ]),
            &ColumnNames::default(),
        );

        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].grid_id, "s2_p2");
    }

    #[test]
    fn test_missing_products_column_yields_nothing() {
        let data = RawRows::from_data(vec![vec!["userEmail"], vec!["a@x.com"]]);
        let parsed = parse_grid_items(&data, &ColumnNames::default());
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.skipped_rows, 0);
    }
}
