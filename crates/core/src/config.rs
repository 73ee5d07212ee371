//! Runtime configuration.
//!
//! Loaded from YAML; every section and field is optional and falls back to
//! the defaults below.
//!
//! ```yaml
//! api:
//!   url: https://example.com/exec
//!   timeout_secs: 15
//! columns:
//!   products_json: Products
//! grid:
//!   rows: 4
//! ```

use crate::error::{ShelfError, ShelfResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub columns: ColumnNames,
    pub grid: GridConfig,
    pub storage: StorageConfig,
}

/// Remote row source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
    /// Action name sent to the endpoint to request placement rows.
    pub action: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            url: None,
            timeout_secs: 30,
            action: "getShelfGrid".to_string(),
        }
    }
}

/// Header names of the placement sheet. Lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub shelf_id: String,
    pub user_email: String,
    pub user_name: String,
    pub location: String,
    pub created_at: String,
    pub products_json: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            shelf_id: "shelfId".to_string(),
            user_email: "userEmail".to_string(),
            user_name: "userName".to_string(),
            location: "location".to_string(),
            created_at: "createdAt".to_string(),
            products_json: "productsJson".to_string(),
        }
    }
}

impl ColumnNames {
    fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("shelf_id", self.shelf_id.as_str()),
            ("user_email", self.user_email.as_str()),
            ("user_name", self.user_name.as_str()),
            ("location", self.location.as_str()),
            ("created_at", self.created_at.as_str()),
            ("products_json", self.products_json.as_str()),
        ]
    }
}

/// Most rows a grid may have: one per letter `A` to `Z`.
pub const MAX_GRID_ROWS: usize = 26;
/// Most columns a grid may have.
pub const MAX_GRID_COLS: usize = 100;

/// Placement grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Slotting fee charged per cell when no fee table is given.
    pub default_fee: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 5,
            cols: 5,
            default_fee: 20.0,
        }
    }
}

impl GridConfig {
    /// Check that `rows` x `cols` is a usable grid size.
    pub fn check_size(rows: usize, cols: usize) -> ShelfResult<()> {
        if rows == 0 || cols == 0 {
            return Err(ShelfError::config(format!(
                "grid must have at least one cell, got {rows}x{cols}"
            )));
        }
        if rows > MAX_GRID_ROWS || cols > MAX_GRID_COLS {
            return Err(ShelfError::config(format!(
                "grid of {rows}x{cols} exceeds the {MAX_GRID_ROWS}x{MAX_GRID_COLS} maximum"
            )));
        }
        Ok(())
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the JSON-file repository. When unset the server keeps
    /// records in memory and the CLI uses the user data directory.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> ShelfResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: &Path) -> ShelfResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShelfError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load the file if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> ShelfResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject settings no component can work with.
    pub fn validate(&self) -> ShelfResult<()> {
        if self.api.timeout_secs == 0 {
            return Err(ShelfError::config("api.timeout_secs must be positive"));
        }
        if self.api.action.trim().is_empty() {
            return Err(ShelfError::config("api.action must not be empty"));
        }
        GridConfig::check_size(self.grid.rows, self.grid.cols)?;
        if !self.grid.default_fee.is_finite() {
            return Err(ShelfError::config("grid.default_fee must be finite"));
        }
        for (field, name) in self.columns.all() {
            if name.is_empty() {
                return Err(ShelfError::config(format!(
                    "columns.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
