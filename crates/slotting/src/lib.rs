//! # shelfwise-slotting
//!
//! Slotting-fee evaluation for shelf grids.
//!
//! A [`FeeTable`] holds the fee a retailer charges for each cell. [`evaluate`]
//! scores every cell by the product's expected profit after that fee and
//! picks the most profitable one.
//!
//! # Examples
//!
//! ```
//! use shelfwise_slotting::{evaluate, FeeTable};
//!
//! let eval = evaluate(10_000.0, 0.5, &FeeTable::standard());
//! assert_eq!(eval.best_slot().unwrap().position, "E2");
//! ```

mod evaluate;
mod fees;

pub use evaluate::{evaluate, GridEvaluation, SlotScore};
pub use fees::{FeeTable, FeeTableError};
