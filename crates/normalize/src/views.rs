//! Presentation views derived from the flat placement list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shelfwise_core::model::email_local_part;
use shelfwise_core::{Product, ShelfGridItem, User};
use shelfwise_sheet::compare_positions;
use std::borrow::Cow;

/// What a view does with an item whose product id is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingProduct {
    /// Show the item under a stand-in named `Product <id>`.
    Placeholder,
    /// Leave the item out of the view.
    Skip,
}

/// Missing-product handling per view.
///
/// The defaults keep the position view complete and the user view limited to
/// known products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub by_position: MissingProduct,
    pub by_user: MissingProduct,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            by_position: MissingProduct::Placeholder,
            by_user: MissingProduct::Skip,
        }
    }
}

/// One product placed at a position, as shown in the all-users view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPlacement {
    pub product_id: String,
    pub product_name: String,
    pub user_name: String,
    pub user_id: String,
    pub placed_date: String,
}

/// Every placement at one position across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionGroup {
    pub position: String,
    pub products: Vec<PositionPlacement>,
}

/// One product a user placed at a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlacement {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub placed_date: String,
}

/// A user's placements at one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    pub position: String,
    pub products: Vec<UserPlacement>,
}

/// All positions a single user has filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserShelf {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub positions: Vec<UserPosition>,
}

fn resolve_product<'a>(
    products: &'a IndexMap<String, Product>,
    product_id: &str,
    policy: MissingProduct,
) -> Option<Cow<'a, Product>> {
    match (products.get(product_id), policy) {
        (Some(product), _) => Some(Cow::Borrowed(product)),
        (None, MissingProduct::Placeholder) => Some(Cow::Owned(Product::placeholder(product_id))),
        (None, MissingProduct::Skip) => None,
    }
}

/// Group placements by position for all users.
///
/// Items without a position are ignored. Within a position a second
/// placement with the same `(productId, userName)` pair is dropped, so the
/// same product placed by two different users appears twice. Groups are
/// ordered by [`compare_positions`].
#[must_use]
pub fn placements_by_position(
    items: &[ShelfGridItem],
    products: &IndexMap<String, Product>,
    missing: MissingProduct,
) -> Vec<PositionGroup> {
    let mut groups: IndexMap<&str, PositionGroup> = IndexMap::new();

    for item in items {
        if item.shelf_position.is_empty() {
            continue;
        }
        let Some(product) = resolve_product(products, &item.product_id, missing) else {
            tracing::debug!(
                "position view: product {} not in catalog, skipping {}",
                item.product_id,
                item.grid_id
            );
            continue;
        };

        let group = groups
            .entry(item.shelf_position.as_str())
            .or_insert_with(|| PositionGroup {
                position: item.shelf_position.clone(),
                products: Vec::new(),
            });

        let duplicate = group
            .products
            .iter()
            .any(|p| p.product_id == item.product_id && p.user_name == item.user_name);
        if duplicate {
            continue;
        }

        group.products.push(PositionPlacement {
            product_id: item.product_id.clone(),
            product_name: product.name.clone(),
            user_name: item.user_name.clone(),
            user_id: item.user_id.clone(),
            placed_date: item.placed_date.clone(),
        });
    }

    let mut out: Vec<PositionGroup> = groups.into_values().collect();
    out.sort_by(|a, b| compare_positions(&a.position, &b.position));
    out
}

/// Group placements by user, then by position.
///
/// Items without an email or a position are ignored. Display names come from
/// the user record, then the item's own user name, then the email's local
/// part. Within a user's position a product appears once. Users are ordered
/// by display name, their positions by [`compare_positions`].
#[must_use]
pub fn placements_by_user(
    items: &[ShelfGridItem],
    products: &IndexMap<String, Product>,
    users: &IndexMap<String, User>,
    missing: MissingProduct,
) -> Vec<UserShelf> {
    let mut shelves: IndexMap<&str, (UserShelf, IndexMap<&str, UserPosition>)> = IndexMap::new();

    for item in items {
        if item.user_email.is_empty() || item.shelf_position.is_empty() {
            continue;
        }
        let Some(product) = resolve_product(products, &item.product_id, missing) else {
            tracing::debug!(
                "user view: product {} not in catalog, skipping {}",
                item.product_id,
                item.grid_id
            );
            continue;
        };

        let (_, positions) = shelves.entry(item.user_email.as_str()).or_insert_with(|| {
            let shelf = UserShelf {
                user_id: item.user_email.clone(),
                user_name: display_name(item, users),
                user_email: item.user_email.clone(),
                positions: Vec::new(),
            };
            (shelf, IndexMap::new())
        });

        let position = positions
            .entry(item.shelf_position.as_str())
            .or_insert_with(|| UserPosition {
                position: item.shelf_position.clone(),
                products: Vec::new(),
            });

        if position
            .products
            .iter()
            .any(|p| p.product_id == item.product_id)
        {
            continue;
        }

        position.products.push(UserPlacement {
            product_id: item.product_id.clone(),
            product_name: product.name.clone(),
            category: product.category.clone(),
            placed_date: item.placed_date.clone(),
        });
    }

    let mut out: Vec<UserShelf> = shelves
        .into_values()
        .filter_map(|(mut shelf, positions)| {
            shelf.positions = positions.into_values().collect();
            shelf
                .positions
                .sort_by(|a, b| compare_positions(&a.position, &b.position));
            (!shelf.positions.is_empty()).then_some(shelf)
        })
        .collect();
    out.sort_by(|a, b| a.user_name.cmp(&b.user_name));
    out
}

fn display_name(item: &ShelfGridItem, users: &IndexMap<String, User>) -> String {
    users
        .get(&item.user_email)
        .map(|u| u.name.as_str())
        .filter(|n| !n.is_empty())
        .or_else(|| Some(item.user_name.as_str()).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| email_local_part(&item.user_email))
        .to_string()
}
