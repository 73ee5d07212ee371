//! Typed shelf, product and user operations over a [`Repository`].

use crate::error::{StoreError, StoreResult};
use crate::repository::{Collection, Repository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfwise_core::{GridConfig, Product, Shelf, ShelfPlacement, User};
use shelfwise_sheet::{parse_position_within, position_label};
use uuid::Uuid;

/// Shelf management on top of any repository.
#[derive(Debug, Clone, Default)]
pub struct ShelfService<R> {
    repo: R,
}

impl<R: Repository> ShelfService<R> {
    pub fn new(repo: R) -> Self {
        ShelfService { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    fn load<T: DeserializeOwned>(&self, collection: Collection, id: &str) -> StoreResult<Option<T>> {
        self.repo
            .get(collection, id)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    fn load_all<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        self.repo
            .list(collection)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }

    fn save<T: Serialize>(&mut self, collection: Collection, id: &str, record: &T) -> StoreResult<()> {
        self.repo.put(collection, id, serde_json::to_value(record)?)
    }

    // Shelves

    /// Create an empty shelf with a fresh id.
    ///
    /// # Errors
    ///
    /// `Validation` when the name is blank or either dimension is zero.
    pub fn create_shelf(&mut self, name: &str, rows: usize, cols: usize) -> StoreResult<Shelf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("shelf name must not be empty".to_string()));
        }
        GridConfig::check_size(rows, cols).map_err(|e| StoreError::Validation(e.to_string()))?;

        let shelf = Shelf {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            rows,
            cols,
            created_at: chrono::Utc::now().to_rfc3339(),
            products: Vec::new(),
        };
        self.save(Collection::Shelves, &shelf.id, &shelf)?;
        tracing::info!("created shelf {} ({}x{})", shelf.id, rows, cols);
        Ok(shelf)
    }

    pub fn shelves(&self) -> StoreResult<Vec<Shelf>> {
        self.load_all(Collection::Shelves)
    }

    pub fn shelf(&self, id: &str) -> StoreResult<Option<Shelf>> {
        self.load(Collection::Shelves, id)
    }

    fn require_shelf(&self, id: &str) -> StoreResult<Shelf> {
        self.shelf(id)?
            .ok_or_else(|| StoreError::not_found(Collection::Shelves, id))
    }

    pub fn delete_shelf(&mut self, id: &str) -> StoreResult<bool> {
        self.repo.delete(Collection::Shelves, id)
    }

    /// Put a product in a free cell of a shelf.
    ///
    /// The label is case-insensitive and stored in canonical upper case.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown shelf or product, `Position` when the label
    /// is malformed or outside the grid, and `Occupied` when the cell already
    /// holds a product.
    pub fn place_product(
        &mut self,
        shelf_id: &str,
        product_id: &str,
        position: &str,
    ) -> StoreResult<Shelf> {
        let mut shelf = self.require_shelf(shelf_id)?;
        let (row, col) = parse_position_within(position, shelf.rows, shelf.cols)?;
        let label = position_label(row, col);

        if self.product(product_id)?.is_none() {
            return Err(StoreError::not_found(Collection::Products, product_id));
        }
        if let Some(existing) = shelf.placement_at(&label) {
            return Err(StoreError::Occupied {
                shelf_id: shelf.id.clone(),
                position: label,
                product_id: existing.product_id.clone(),
            });
        }

        shelf.products.push(ShelfPlacement {
            product_id: product_id.to_string(),
            position: label,
        });
        self.save(Collection::Shelves, &shelf.id, &shelf)?;
        Ok(shelf)
    }

    /// Clear one cell. Returns whether anything was there.
    pub fn remove_placement(&mut self, shelf_id: &str, position: &str) -> StoreResult<bool> {
        let mut shelf = self.require_shelf(shelf_id)?;
        let before = shelf.products.len();
        shelf
            .products
            .retain(|p| !p.position.eq_ignore_ascii_case(position.trim()));

        if shelf.products.len() == before {
            return Ok(false);
        }
        self.save(Collection::Shelves, &shelf.id, &shelf)?;
        Ok(true)
    }

    // Products

    /// Insert or replace a product, assigning an id when it has none.
    pub fn save_product(&mut self, mut product: Product) -> StoreResult<Product> {
        if product.id.trim().is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        if product.name.trim().is_empty() {
            return Err(StoreError::Validation("product name must not be empty".to_string()));
        }
        self.save(Collection::Products, &product.id, &product)?;
        Ok(product)
    }

    pub fn products(&self) -> StoreResult<Vec<Product>> {
        self.load_all(Collection::Products)
    }

    pub fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        self.load(Collection::Products, id)
    }

    /// Delete a product and clear it from every shelf.
    pub fn delete_product(&mut self, id: &str) -> StoreResult<bool> {
        if !self.repo.delete(Collection::Products, id)? {
            return Ok(false);
        }

        for mut shelf in self.shelves()? {
            let before = shelf.products.len();
            shelf.products.retain(|p| p.product_id != id);
            if shelf.products.len() != before {
                tracing::debug!("removed product {} from shelf {}", id, shelf.id);
                self.save(Collection::Shelves, &shelf.id, &shelf)?;
            }
        }
        Ok(true)
    }

    // Users

    pub fn save_user(&mut self, user: &User) -> StoreResult<()> {
        if user.email.trim().is_empty() {
            return Err(StoreError::Validation("user email must not be empty".to_string()));
        }
        self.save(Collection::Users, &user.id, user)
    }

    pub fn users(&self) -> StoreResult<Vec<User>> {
        self.load_all(Collection::Users)
    }

    /// Store products and users pulled from the spreadsheet.
    ///
    /// Records already in the repository are left untouched. Returns the
    /// number of products and users added.
    pub fn import<'a>(
        &mut self,
        products: impl IntoIterator<Item = &'a Product>,
        users: impl IntoIterator<Item = &'a User>,
    ) -> StoreResult<(usize, usize)> {
        let mut added = (0, 0);
        for product in products {
            if self.product(&product.id)?.is_none() {
                self.save(Collection::Products, &product.id, product)?;
                added.0 += 1;
            }
        }
        for user in users {
            if self.repo.get(Collection::Users, &user.id)?.is_none() {
                self.save_user(user)?;
                added.1 += 1;
            }
        }
        tracing::info!("imported {} products and {} users", added.0, added.1);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn service() -> ShelfService<MemoryRepository> {
        ShelfService::new(MemoryRepository::new())
    }

    fn soap() -> Product {
        Product {
            name: "Soap".to_string(),
            ..Product::with_id("p1")
        }
    }

    #[test]
    fn test_create_shelf_validates() {
        let mut svc = service();
        assert!(matches!(
            svc.create_shelf("Aisle 1", 0, 5),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            svc.create_shelf("  ", 5, 5),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            svc.create_shelf("Aisle 1", 5, usize::MAX),
            Err(StoreError::Validation(msg)) if msg.contains("maximum")
        ));

        let shelf = svc.create_shelf("Aisle 1", 5, 5).unwrap();
        assert_eq!(shelf.id.len(), 36);
        assert!(shelf.products.is_empty());
        assert_eq!(svc.shelves().unwrap(), vec![shelf]);
    }

    #[test]
    fn test_place_product_rules() {
        let mut svc = service();
        let shelf = svc.create_shelf("Aisle 1", 3, 3).unwrap();
        svc.save_product(soap()).unwrap();

        let placed = svc.place_product(&shelf.id, "p1", "b2").unwrap();
        assert_eq!(placed.products[0].position, "B2");

        assert!(matches!(
            svc.place_product(&shelf.id, "p1", "B2"),
            Err(StoreError::Occupied { .. })
        ));
        assert!(matches!(
            svc.place_product(&shelf.id, "p1", "D1"),
            Err(StoreError::Position(_))
        ));
        assert!(matches!(
            svc.place_product(&shelf.id, "p1", "12"),
            Err(StoreError::Position(_))
        ));
        assert!(matches!(
            svc.place_product(&shelf.id, "nope", "A1"),
            Err(StoreError::NotFound {
                collection: Collection::Products,
                ..
            })
        ));
        assert!(matches!(
            svc.place_product("missing", "p1", "A1"),
            Err(StoreError::NotFound {
                collection: Collection::Shelves,
                ..
            })
        ));
    }

    #[test]
    fn test_remove_placement() {
        let mut svc = service();
        let shelf = svc.create_shelf("Aisle 1", 3, 3).unwrap();
        svc.save_product(soap()).unwrap();
        svc.place_product(&shelf.id, "p1", "A1").unwrap();

        assert!(svc.remove_placement(&shelf.id, "a1").unwrap());
        assert!(!svc.remove_placement(&shelf.id, "A1").unwrap());
        assert!(svc.shelf(&shelf.id).unwrap().unwrap().products.is_empty());
    }

    #[test]
    fn test_delete_product_clears_shelves() {
        let mut svc = service();
        let a = svc.create_shelf("A", 2, 2).unwrap();
        let b = svc.create_shelf("B", 2, 2).unwrap();
        svc.save_product(soap()).unwrap();
        svc.place_product(&a.id, "p1", "A1").unwrap();
        svc.place_product(&b.id, "p1", "B2").unwrap();

        assert!(svc.delete_product("p1").unwrap());
        assert!(!svc.delete_product("p1").unwrap());
        assert!(svc
            .shelves()
            .unwrap()
            .iter()
            .all(|s| s.products.is_empty()));
    }

    #[test]
    fn test_save_product_assigns_id() {
        let mut svc = service();
        let saved = svc
            .save_product(Product {
                name: "Racket".to_string(),
                ..Product::default()
            })
            .unwrap();
        assert!(!saved.id.is_empty());
        assert_eq!(svc.product(&saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn test_import_keeps_existing() {
        let mut svc = service();
        svc.save_product(soap()).unwrap();

        let incoming = vec![
            Product {
                name: "Other".to_string(),
                ..Product::with_id("p1")
            },
            Product::with_id("p2"),
        ];
        let users = vec![User::from_email("a@x.com", None, "2024-01-01")];

        assert_eq!(svc.import(&incoming, &users).unwrap(), (1, 1));
        assert_eq!(svc.import(&incoming, &users).unwrap(), (0, 0));
        assert_eq!(svc.product("p1").unwrap().unwrap().name, "Soap");
        assert_eq!(svc.users().unwrap().len(), 1);
    }
}
