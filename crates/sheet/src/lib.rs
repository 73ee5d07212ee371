//! Raw row model for shelfwise
//!
//! The spreadsheet endpoint answers with a 2-D array: a header row naming the
//! columns followed by data rows. [`RawRows`] indexes the header so cells can
//! be addressed by column name, and the position helpers order and parse the
//! `A1`-style labels used for shelf cells.
//!
//! # Examples
//!
//! ```
//! use shelfwise_sheet::RawRows;
//!
//! let rows = RawRows::from_data(vec![
//!     vec!["shelfId", "userEmail"],
//!     vec!["s1", "a@x.com"],
//! ]);
//!
//! let first = rows.rows().next().unwrap();
//! assert_eq!(first.text("userEmail").as_deref(), Some("a@x.com"));
//! ```
//!
//! ```
//! use shelfwise_sheet::sort_positions;
//!
//! let mut labels = vec!["B2", "A10", "A2", "C1"];
//! sort_positions(&mut labels);
//! assert_eq!(labels, ["A2", "A10", "B2", "C1"]);
//! ```

mod cell;
mod error;
mod position;
mod rows;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export position helpers.
pub use position::{
    compare_positions, parse_position, parse_position_within, position_label, sort_positions,
};
/// Re-export row types.
pub use rows::{RawRows, Row};
