use serde::{Deserialize, Serialize};
use shelfwise_core::{GridConfig, MAX_GRID_COLS, MAX_GRID_ROWS};
use shelfwise_sheet::parse_position_within;
use thiserror::Error;

/// Problems building a fee table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeeTableError {
    #[error("fee table has no cells")]
    Empty,

    #[error("fee table row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("fee at row {row}, column {col} is not a finite number")]
    NotFinite { row: usize, col: usize },

    #[error(
        "fee table of {rows}x{cols} exceeds the {max_rows}x{max_cols} maximum",
        max_rows = MAX_GRID_ROWS,
        max_cols = MAX_GRID_COLS
    )]
    TooLarge { rows: usize, cols: usize },
}

fn check_size(rows: usize, cols: usize) -> Result<(), FeeTableError> {
    if rows == 0 || cols == 0 {
        return Err(FeeTableError::Empty);
    }
    if rows > MAX_GRID_ROWS || cols > MAX_GRID_COLS {
        return Err(FeeTableError::TooLarge { rows, cols });
    }
    Ok(())
}

/// Standard 5x5 fee schedule. Eye-level row C costs the most, the bottom
/// row E the least, and the centre of each row beats its neighbours.
const STANDARD_FEES: [[f64; 5]; 5] = [
    [5500.0, 4500.0, 5000.0, 4500.0, 5500.0],
    [7200.0, 6000.0, 6600.0, 6000.0, 7200.0],
    [10000.0, 8500.0, 9400.0, 8500.0, 10000.0],
    [6000.0, 5000.0, 5500.0, 5000.0, 6000.0],
    [4500.0, 3800.0, 4200.0, 3800.0, 4500.0],
];

/// Per-cell slotting fees for a rectangular grid.
///
/// Row 0 is labelled `A`, column 0 is `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct FeeTable {
    fees: Vec<Vec<f64>>,
}

impl FeeTable {
    /// Same fee in every cell.
    ///
    /// # Errors
    ///
    /// Fails when the grid has no cells, exceeds the maximum grid size, or
    /// the fee is NaN or infinite.
    pub fn uniform(rows: usize, cols: usize, fee: f64) -> Result<Self, FeeTableError> {
        check_size(rows, cols)?;
        if !fee.is_finite() {
            return Err(FeeTableError::NotFinite { row: 0, col: 0 });
        }
        Ok(FeeTable {
            fees: vec![vec![fee; cols]; rows],
        })
    }

    /// The standard 5x5 schedule
    #[must_use]
    pub fn standard() -> Self {
        FeeTable {
            fees: STANDARD_FEES.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Uniform table sized from grid configuration
    pub fn from_config(grid: &GridConfig) -> Result<Self, FeeTableError> {
        Self::uniform(grid.rows, grid.cols, grid.default_fee)
    }

    /// Build a table from explicit rows.
    ///
    /// # Errors
    ///
    /// Fails when there are no cells, when the grid is too large, when rows
    /// differ in length, or when a fee is NaN or infinite.
    pub fn from_rows(fees: Vec<Vec<f64>>) -> Result<Self, FeeTableError> {
        let cols = fees.first().map_or(0, Vec::len);
        check_size(fees.len(), cols)?;

        for (row, values) in fees.iter().enumerate() {
            if values.len() != cols {
                return Err(FeeTableError::Ragged {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|f| !f.is_finite()) {
                return Err(FeeTableError::NotFinite { row, col });
            }
        }

        Ok(FeeTable { fees })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.fees.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.fees.first().map_or(0, Vec::len)
    }

    /// Fee at a zero-based cell
    #[must_use]
    pub fn fee(&self, row: usize, col: usize) -> Option<f64> {
        self.fees.get(row)?.get(col).copied()
    }

    /// Fee at an `A1`-style label, if it lies inside the table
    #[must_use]
    pub fn fee_at(&self, label: &str) -> Option<f64> {
        let (row, col) = parse_position_within(label, self.rows(), self.cols()).ok()?;
        self.fee(row, col)
    }

    /// Cells in row-major order as `(row, col, fee)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.fees.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, fee)| (row, col, *fee))
        })
    }
}

impl Default for FeeTable {
    fn default() -> Self {
        let grid = GridConfig::default();
        FeeTable {
            fees: vec![vec![grid.default_fee; grid.cols]; grid.rows],
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for FeeTable {
    type Error = FeeTableError;

    fn try_from(fees: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(fees)
    }
}

impl From<FeeTable> for Vec<Vec<f64>> {
    fn from(table: FeeTable) -> Self {
        table.fees
    }
}
