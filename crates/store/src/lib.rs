//! # shelfwise-store
//!
//! Persistence for shelves, products and users.
//!
//! [`Repository`] is a small get/put/delete interface over named
//! [`Collection`]s of JSON records, with in-memory and JSON-file
//! implementations. [`ShelfService`] layers typed shelf operations and their
//! rules on top of any repository.

mod error;
mod repository;
mod service;

pub use error::{StoreError, StoreResult};
pub use repository::{Collection, JsonFileRepository, MemoryRepository, Repository};
pub use service::ShelfService;
