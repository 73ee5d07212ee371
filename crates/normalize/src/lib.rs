//! # shelfwise-normalize
//!
//! Turns spreadsheet placement rows into typed records and views.
//!
//! Each data row carries a JSON cell describing one or more product
//! placements. From those rows this crate derives:
//! - flattened [`ShelfGridItem`]s, one per `(row, entry)` pair
//! - a product catalog deduplicated by id
//! - a user list deduplicated by email
//! - placements grouped by position and by user
//!
//! Every pass is synchronous and side-effect free apart from logging. A
//! malformed cell only costs its own row.
//!
//! # Examples
//!
//! ```
//! use shelfwise_normalize::Normalizer;
//! use shelfwise_sheet::RawRows;
//!
//! let rows = RawRows::from_data(vec![
//!     vec!["shelfId", "userEmail", "userName", "location", "createdAt", "productsJson"],
//!     vec!["s1", "a@x.com", "A", "Store1", "2024-01-01",
//!          r#"[{"id":"p1","position":"A1"},{"id":"p2","position":"B2"}]"#],
//! ]);
//!
//! let out = Normalizer::default().normalize(&rows);
//! assert_eq!(out.items.len(), 2);
//! assert_eq!(out.by_position.len(), 2);
//! assert_eq!(out.by_user[0].positions.len(), 2);
//! ```

pub mod catalog;
pub mod dashboard;
pub mod entries;
pub mod grid;
pub mod views;

use indexmap::IndexMap;
use serde::Serialize;
use shelfwise_core::{ColumnNames, Product, ShelfGridItem, User};
use shelfwise_sheet::RawRows;

pub use catalog::{derive_products, derive_users, Derived};
pub use dashboard::{
    categories, filter_items_by_store, recent_placements, DashboardSummary, ProductFilter,
    RecentPlacement, UserFilter,
};
pub use entries::{decode_entries, PlacementEntry};
pub use grid::{parse_grid_items, GridItems};
pub use views::{
    placements_by_position, placements_by_user, MissingProduct, PositionGroup,
    PositionPlacement, UserPlacement, UserPosition, UserShelf, ViewOptions,
};

/// Everything derived from one batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Normalized {
    pub items: Vec<ShelfGridItem>,
    pub products: IndexMap<String, Product>,
    pub users: IndexMap<String, User>,
    pub by_position: Vec<PositionGroup>,
    pub by_user: Vec<UserShelf>,
    pub products_found: bool,
    pub users_found: bool,
    pub skipped_rows: usize,
    /// Human-readable notes for problems that did not stop normalization
    pub warnings: Vec<String>,
}

impl Normalized {
    /// Headline counts over the normalized data
    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.items, &self.products, &self.users)
    }
}

/// Runs every derivation against one header layout.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnNames,
    options: ViewOptions,
}

impl Normalizer {
    #[must_use]
    pub fn new(columns: ColumnNames) -> Self {
        Normalizer {
            columns,
            options: ViewOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// Derive items, catalog, users and both views from `rows`.
    ///
    /// Never fails. Rows that cannot be decoded are counted in
    /// `skipped_rows`, and a missing product catalog or email column is
    /// reported in `warnings` rather than as an error.
    #[must_use]
    pub fn normalize(&self, rows: &RawRows) -> Normalized {
        let GridItems {
            items,
            skipped_rows,
        } = parse_grid_items(rows, &self.columns);
        let products = derive_products(rows, &self.columns);
        let users = derive_users(rows, &self.columns);

        let mut warnings = Vec::new();
        if skipped_rows > 0 {
            warnings.push(format!(
                "{skipped_rows} row(s) skipped: '{}' could not be decoded",
                self.columns.products_json
            ));
        }
        if !products.success {
            warnings.push(format!(
                "no products found in column '{}'",
                self.columns.products_json
            ));
        }
        if rows.column_index(&self.columns.user_email).is_none() {
            warnings.push(format!(
                "column '{}' missing; users not derived",
                self.columns.user_email
            ));
        }

        let by_position =
            placements_by_position(&items, &products.records, self.options.by_position);
        let by_user = placements_by_user(
            &items,
            &products.records,
            &users.records,
            self.options.by_user,
        );

        tracing::info!(
            "normalized {} rows: {} items, {} products, {} users",
            rows.row_count(),
            items.len(),
            products.records.len(),
            users.records.len()
        );

        Normalized {
            items,
            products: products.records,
            users: users.records,
            by_position,
            by_user,
            products_found: products.success,
            users_found: users.success,
            skipped_rows,
            warnings,
        }
    }

    /// Like [`normalize`](Self::normalize), keeping only placements by
    /// users of `store_id`. Both views are rebuilt from the kept items; the
    /// catalog and user list are left whole.
    #[must_use]
    pub fn normalize_for_store(&self, rows: &RawRows, store_id: Option<&str>) -> Normalized {
        let mut out = self.normalize(rows);
        if matches!(store_id, None | Some("all")) {
            return out;
        }

        out.items = filter_items_by_store(&out.items, &out.users, store_id);
        out.by_position = placements_by_position(&out.items, &out.products, self.options.by_position);
        out.by_user = placements_by_user(
            &out.items,
            &out.products,
            &out.users,
            self.options.by_user,
        );
        out
    }
}
