//! Admin dashboard queries over normalized data.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use shelfwise_core::model::UNKNOWN_PRODUCT;
use shelfwise_core::{Product, ShelfGridItem, User};

/// Name shown for a placement whose user is not known.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Product list filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub category: Option<String>,
    pub demand: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |term| contains_ci(&product.name, term));
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| product.category == c);
        let demand_ok = self.demand.as_deref().map_or(true, |d| product.demand == d);
        search_ok && category_ok && demand_ok
    }

    /// Matching products in catalog order
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// User list filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    /// Case-insensitive substring of the name or the email.
    pub search: Option<String>,
    pub status: Option<String>,
}

impl UserFilter {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            contains_ci(&user.name, term) || contains_ci(&user.email, term)
        });
        let status_ok = self.status.as_deref().map_or(true, |s| user.status == s);
        search_ok && status_ok
    }

    pub fn apply<'a>(&self, users: impl IntoIterator<Item = &'a User>) -> Vec<&'a User> {
        users.into_iter().filter(|u| self.matches(u)).collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Distinct categories in first-seen order
pub fn categories<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<String> {
    products
        .into_iter()
        .map(|p| p.category.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Keep placements made by users of one store. `None` or `"all"` keeps
/// everything; placements by unknown users are dropped otherwise.
#[must_use]
pub fn filter_items_by_store(
    items: &[ShelfGridItem],
    users: &IndexMap<String, User>,
    store_id: Option<&str>,
) -> Vec<ShelfGridItem> {
    match store_id {
        None | Some("all") => items.to_vec(),
        Some(store) => items
            .iter()
            .filter(|item| {
                users
                    .get(&item.user_id)
                    .is_some_and(|u| u.store_id == store)
            })
            .cloned()
            .collect(),
    }
}

/// A placement line for the recent-activity panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPlacement {
    pub position: String,
    pub product_name: String,
    pub user_name: String,
    pub placed_date: String,
}

/// The `limit` most recent placements, newest first.
///
/// Dates compare as strings, which orders ISO dates and timestamps
/// correctly; ties keep their original order.
#[must_use]
pub fn recent_placements(
    items: &[ShelfGridItem],
    products: &IndexMap<String, Product>,
    users: &IndexMap<String, User>,
    limit: usize,
) -> Vec<RecentPlacement> {
    let mut sorted: Vec<&ShelfGridItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.placed_date.cmp(&a.placed_date));

    sorted
        .into_iter()
        .take(limit)
        .map(|item| RecentPlacement {
            position: item.shelf_position.clone(),
            product_name: products
                .get(&item.product_id)
                .map_or_else(|| UNKNOWN_PRODUCT.to_string(), |p| p.name.clone()),
            user_name: users
                .get(&item.user_id)
                .map_or_else(|| UNKNOWN_USER.to_string(), |u| u.name.clone()),
            placed_date: item.placed_date.clone(),
        })
        .collect()
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: usize,
    pub total_products: usize,
    pub total_placements: usize,
    pub occupied_positions: usize,
}

impl DashboardSummary {
    #[must_use]
    pub fn compute(
        items: &[ShelfGridItem],
        products: &IndexMap<String, Product>,
        users: &IndexMap<String, User>,
    ) -> Self {
        let occupied: IndexSet<&str> = items
            .iter()
            .map(|i| i.shelf_position.as_str())
            .filter(|p| !p.is_empty())
            .collect();

        DashboardSummary {
            total_users: users.len(),
            total_products: products.len(),
            total_placements: items.len(),
            occupied_positions: occupied.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, demand: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            demand: demand.to_string(),
            ..Product::default()
        }
    }

    fn item(position: &str, product: &str, email: &str, date: &str) -> ShelfGridItem {
        ShelfGridItem {
            grid_id: format!("s_{product}"),
            shelf_position: position.to_string(),
            product_id: product.to_string(),
            user_id: email.to_string(),
            user_email: email.to_string(),
            user_name: String::new(),
            location: String::new(),
            placed_date: date.to_string(),
        }
    }

    #[test]
    fn test_product_filter() {
        let products = vec![
            product("p1", "Colgate Toothpaste", "Health", "high"),
            product("p2", "Nike T-Shirt", "Fashion", "high"),
            product("p3", "Tennis Racket", "Sports", "medium"),
        ];

        let filter = ProductFilter {
            search: Some("TOOTH".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products).len(), 1);

        let filter = ProductFilter {
            demand: Some("high".to_string()),
            category: Some("Fashion".to_string()),
            ..ProductFilter::default()
        };
        let matched = filter.apply(&products);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "p2");

        assert_eq!(ProductFilter::default().apply(&products).len(), 3);
    }

    #[test]
    fn test_user_filter_matches_email() {
        let users = vec![
            User::from_email("jane.smith@example.com", Some("Jane"), ""),
            User::from_email("bob@example.com", Some("Bob"), ""),
        ];
        let filter = UserFilter {
            search: Some("SMITH".to_string()),
            status: Some("verified".to_string()),
        };
        assert_eq!(filter.apply(&users).len(), 1);

        let filter = UserFilter {
            status: Some("pending".to_string()),
            ..UserFilter::default()
        };
        assert!(filter.apply(&users).is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let products = vec![
            product("p1", "a", "Health", "high"),
            product("p2", "b", "Fashion", "high"),
            product("p3", "c", "Health", "low"),
        ];
        assert_eq!(categories(&products), vec!["Health", "Fashion"]);
    }

    #[test]
    fn test_filter_by_store() {
        let mut users = IndexMap::new();
        users.insert(
            "a@x.com".to_string(),
            User::from_email("a@x.com", None, ""),
        );
        let items = vec![item("A1", "p1", "a@x.com", ""), item("A2", "p1", "b@x.com", "")];

        assert_eq!(filter_items_by_store(&items, &users, None).len(), 2);
        assert_eq!(filter_items_by_store(&items, &users, Some("all")).len(), 2);
        assert_eq!(filter_items_by_store(&items, &users, Some("s1")).len(), 1);
        assert!(filter_items_by_store(&items, &users, Some("s2")).is_empty());
    }

    #[test]
    fn test_recent_placements() {
        let mut products = IndexMap::new();
        products.insert("p1".to_string(), product("p1", "Soap", "Health", "high"));
        let mut users = IndexMap::new();
        users.insert(
            "a@x.com".to_string(),
            User::from_email("a@x.com", Some("Alice"), ""),
        );

        let items = vec![
            item("A1", "p1", "a@x.com", "2025-04-01"),
            item("B1", "p2", "b@x.com", "2025-04-03"),
            item("C1", "p1", "a@x.com", "2025-04-02"),
        ];
        let recent = recent_placements(&items, &products, &users, 2);

        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].position, "B1");
        assert_eq!(recent[0].product_name, UNKNOWN_PRODUCT);
        assert_eq!(recent[0].user_name, UNKNOWN_USER);
        assert_eq!(recent[1].product_name, "Soap");
        assert_eq!(recent[1].user_name, "Alice");
    }

    #[test]
    fn test_summary() {
        let items = vec![
            item("A1", "p1", "a@x.com", ""),
            item("A1", "p2", "b@x.com", ""),
            item("B1", "p1", "a@x.com", ""),
        ];
        let summary = DashboardSummary::compute(&items, &IndexMap::new(), &IndexMap::new());
        assert_eq!(summary.total_placements, 3);
        assert_eq!(summary.occupied_positions, 2);
        assert_eq!(summary.total_users, 0);
    }
}
