//! Records shared by the normalizer, the repository and the surfaces.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Product name used when a record carries none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
/// Category used when a record carries none.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Size used when a record carries none.
pub const STANDARD_SIZE: &str = "Standard";
/// Demand level used when a record carries none.
pub const MEDIUM_DEMAND: &str = "medium";
/// Every user pulled from the spreadsheet belongs to this store.
pub const DEFAULT_STORE_ID: &str = "s1";
/// Spreadsheet users are verified upstream before they can place products.
pub const VERIFIED_STATUS: &str = "verified";

/// One product placed in one cell, flattened out of a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfGridItem {
    pub grid_id: String,
    pub shelf_position: String,
    pub product_id: String,
    /// The user's email; the spreadsheet has no numeric user id.
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub location: String,
    pub placed_date: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub margin: f64,
    pub size: String,
    pub demand: String,
    pub buying_decision: String,
    pub position: String,
    pub slot: i64,
}

impl Default for Product {
    fn default() -> Self {
        Product {
            id: String::new(),
            name: UNKNOWN_PRODUCT.to_string(),
            category: UNCATEGORIZED.to_string(),
            price: 0.0,
            margin: 0.0,
            size: STANDARD_SIZE.to_string(),
            demand: MEDIUM_DEMAND.to_string(),
            buying_decision: String::new(),
            position: String::new(),
            slot: 0,
        }
    }
}

impl Product {
    /// A product with the given id and defaults everywhere else
    pub fn with_id(id: impl Into<String>) -> Self {
        Product {
            id: id.into(),
            ..Product::default()
        }
    }

    /// Stand-in for a product id that is missing from the catalog
    pub fn placeholder(id: &str) -> Self {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            ..Product::default()
        }
    }
}

/// A user known from the placement sheet, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub store_id: String,
    pub status: String,
    pub registered_date: String,
}

impl User {
    /// Build a user from an email, falling back to the email's local part
    /// when no name is given.
    pub fn from_email(email: &str, name: Option<&str>, registered_date: &str) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email_local_part(email));

        User {
            id: email.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            store_id: DEFAULT_STORE_ID.to_string(),
            status: VERIFIED_STATUS.to_string(),
            registered_date: registered_date.to_string(),
        }
    }
}

/// A product occupying one cell of a shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfPlacement {
    pub product_id: String,
    pub position: String,
}

/// A named rows x cols grid owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelf {
    pub id: String,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub created_at: String,
    #[serde(default)]
    pub products: Vec<ShelfPlacement>,
}

impl Shelf {
    /// Product placed at a position, if any
    #[must_use]
    pub fn placement_at(&self, position: &str) -> Option<&ShelfPlacement> {
        self.products
            .iter()
            .find(|p| p.position.eq_ignore_ascii_case(position))
    }
}

/// Portion of an email before the `@`, or the whole string without one
#[must_use]
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Today's local date as `YYYY-MM-DD`
#[must_use]
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string
#[must_use]
pub fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix = value.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults() {
        let product = Product::with_id("p1");
        assert_eq!(product.id, "p1");
        assert_eq!(product.name, "Unknown Product");
        assert_eq!(product.category, "Uncategorized");
        assert_eq!(product.size, "Standard");
        assert_eq!(product.demand, "medium");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.slot, 0);
    }

    #[test]
    fn test_placeholder_name() {
        assert_eq!(Product::placeholder("p9").name, "Product p9");
    }

    #[test]
    fn test_product_deserialize_fills_defaults() {
        let product: Product = serde_json::from_str(r#"{"id":"p1","price":3.5}"#).unwrap();
        assert_eq!(product.price, 3.5);
        assert_eq!(product.category, UNCATEGORIZED);
    }

    #[test]
    fn test_user_name_fallback() {
        let user = User::from_email("jane@example.com", Some("  "), "2024-01-01");
        assert_eq!(user.id, "jane@example.com");
        assert_eq!(user.name, "jane");
        assert_eq!(user.store_id, "s1");
        assert_eq!(user.status, "verified");

        let named = User::from_email("jane@example.com", Some("Jane"), "2024-01-01");
        assert_eq!(named.name, "Jane");
    }

    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part("a@x.com"), "a");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_parse_date_prefix() {
        assert_eq!(
            parse_date_prefix("2024-01-05T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_date_prefix("yesterday"), None);
        assert_eq!(parse_date_prefix("2024"), None);
    }

    #[test]
    fn test_shelf_placement_lookup() {
        let shelf = Shelf {
            id: "sh1".to_string(),
            name: "Aisle".to_string(),
            rows: 5,
            cols: 5,
            created_at: today(),
            products: vec![ShelfPlacement {
                product_id: "p1".to_string(),
                position: "A1".to_string(),
            }],
        };
        assert!(shelf.placement_at("a1").is_some());
        assert!(shelf.placement_at("B1").is_none());
    }
}
