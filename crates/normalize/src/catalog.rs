use crate::entries::{decode_entries, PlacementEntry};
use indexmap::IndexMap;
use shelfwise_core::model::today;
use shelfwise_core::{ColumnNames, Product, User};
use shelfwise_sheet::RawRows;

/// A deduplicated collection plus the success signal callers use to decide
/// whether to surface a configuration warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived<T> {
    pub records: IndexMap<String, T>,
    pub success: bool,
}

impl<T> Derived<T> {
    fn from_records(records: IndexMap<String, T>) -> Self {
        let success = !records.is_empty();
        Derived { records, success }
    }

    fn failed() -> Self {
        Derived {
            records: IndexMap::new(),
            success: false,
        }
    }
}

/// Build the product catalog from every row's products cell.
///
/// Products are keyed by id and the first occurrence wins. Entries without an
/// id are ignored, and rows whose cell fails to decode are skipped.
#[must_use]
pub fn derive_products(rows: &RawRows, columns: &ColumnNames) -> Derived<Product> {
    let mut products: IndexMap<String, Product> = IndexMap::new();

    for row in rows.rows() {
        let entries = match decode_entries(row.get_by_name(&columns.products_json)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("row {}: products cell not decoded: {}", row.number(), e);
                continue;
            }
        };

        for entry in entries {
            let Some(id) = entry.id() else {
                tracing::debug!("row {}: product entry without id", row.number());
                continue;
            };
            products
                .entry(id.clone())
                .or_insert_with(|| product_from_entry(id, &entry));
        }
    }

    Derived::from_records(products)
}

fn product_from_entry(id: String, entry: &PlacementEntry) -> Product {
    let defaults = Product::default();
    Product {
        id,
        name: entry.text("name").unwrap_or(defaults.name),
        category: entry.text("category").unwrap_or(defaults.category),
        price: entry.number("price").unwrap_or(defaults.price),
        margin: entry.number("margin").unwrap_or(defaults.margin),
        size: entry.text("size").unwrap_or(defaults.size),
        demand: entry.text("demand").unwrap_or(defaults.demand),
        buying_decision: entry
            .text("buyingDecision")
            .unwrap_or(defaults.buying_decision),
        position: entry.position().unwrap_or(defaults.position),
        slot: entry
            .number("slot")
            .map(|s| s as i64)
            .unwrap_or(defaults.slot),
    }
}

/// Build the user list from the email column, keyed by email.
///
/// Fails as a whole, with no partial output, when the header has no email
/// column. Rows with a blank email are ignored; the products cell plays no
/// part.
#[must_use]
pub fn derive_users(rows: &RawRows, columns: &ColumnNames) -> Derived<User> {
    if rows.column_index(&columns.user_email).is_none() {
        tracing::warn!("no '{}' column; users not derived", columns.user_email);
        return Derived::failed();
    }

    let fallback_date = today();
    let mut users: IndexMap<String, User> = IndexMap::new();

    for row in rows.rows() {
        let Some(email) = row.text(&columns.user_email) else {
            continue;
        };
        if users.contains_key(&email) {
            continue;
        }

        let name = row.text(&columns.user_name);
        let registered = row
            .text(&columns.created_at)
            .unwrap_or_else(|| fallback_date.clone());
        let user = User::from_email(&email, name.as_deref(), &registered);
        users.insert(email, user);
    }

    Derived::from_records(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(data: Vec<Vec<&str>>) -> RawRows {
        let mut all = vec![vec!["userEmail", "userName", "createdAt", "productsJson"]];
        all.extend(data);
        RawRows::from_data(all)
    }

    #[test]
    fn test_first_product_name_wins() {
        let rows = sheet(vec![
            vec!["a@x.com", "A", "", r#"{"id":"p1","name":"First","position":"A1"}"#],
            vec!["b@x.com", "B", "", r#"{"id":"p1","name":"Second","position":"B1"}"#],
        ]);
        let derived = derive_products(&rows, &ColumnNames::default());
        assert!(derived.success);
        assert_eq!(derived.records.len(), 1);
        assert_eq!(derived.records["p1"].name, "First");
        assert_eq!(derived.records["p1"].position, "A1");
    }

    #[test]
    fn test_product_defaults_and_lenient_numbers() {
        let rows = sheet(vec![vec![
            "a@x.com",
            "A",
            "",
            r#"[{"id":"p1","price":"3.22","margin":"0.22","slot":4},{"id":"p2"}]"#,
        ]]);
        let derived = derive_products(&rows, &ColumnNames::default());

        let p1 = &derived.records["p1"];
        assert!((p1.price - 3.22).abs() < f64::EPSILON);
        assert!((p1.margin - 0.22).abs() < f64::EPSILON);
        assert_eq!(p1.slot, 4);

        let p2 = &derived.records["p2"];
        assert_eq!(p2.name, "Unknown Product");
        assert_eq!(p2.category, "Uncategorized");
        assert_eq!(p2.size, "Standard");
        assert_eq!(p2.demand, "medium");
        assert_eq!(p2.buying_decision, "");
        assert_eq!(p2.slot, 0);
    }

    #[test]
    fn test_no_products_is_not_success() {
        let rows = sheet(vec![vec!["a@x.com", "A", "", ""]]);
        let derived = derive_products(&rows, &ColumnNames::default());
        assert!(!derived.success);
        assert!(derived.records.is_empty());
    }

    #[test]
    fn test_users_dedup_by_email() {
        let rows = sheet(vec![
            vec!["a@x.com", "Alice", "2024-01-01", ""],
            vec!["a@x.com", "Other", "2024-02-01", "[]"],
            vec!["bob@x.com", "", "", "{bad"],
            vec!["", "Nobody", "", ""],
        ]);
        let derived = derive_users(&rows, &ColumnNames::default());

        assert!(derived.success);
        assert_eq!(derived.records.len(), 2);
        assert_eq!(derived.records["a@x.com"].name, "Alice");
        assert_eq!(derived.records["a@x.com"].registered_date, "2024-01-01");
        assert_eq!(derived.records["bob@x.com"].name, "bob");
        assert_eq!(derived.records["bob@x.com"].registered_date, today());
    }

    #[test]
    fn test_users_require_email_column() {
        let rows = RawRows::from_data(vec![vec!["userName"], vec!["Alice"]]);
        let derived = derive_users(&rows, &ColumnNames::default());
        assert!(!derived.success);
        assert!(derived.records.is_empty());
    }
}
