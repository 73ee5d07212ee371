use thiserror::Error;

/// Errors that can occur while reading raw rows or position labels
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Invalid position label: {0}")]
    InvalidPosition(String),

    #[error("Position {label} is outside a {rows}x{cols} grid")]
    PositionOutOfBounds {
        label: String,
        rows: usize,
        cols: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
