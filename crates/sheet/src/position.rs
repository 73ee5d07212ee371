//! Shelf position labels.
//!
//! A label is a row designator in letters followed by a 1-based column
//! number: `A1` is the top-left cell, `B3` the third cell of the second row.
//! Rows past `Z` continue as `AA`, `AB`, ...

use crate::error::{Result, SheetError};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn label_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("valid position regex"))
}

/// Split a label into its letter prefix and numeric suffix
fn split_label(label: &str) -> Option<(&str, u64)> {
    let caps = label_pattern().captures(label)?;
    let letters = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some((letters, number))
}

/// Order two position labels: letters lexicographically, then the trailing
/// number numerically. Labels that do not follow the letters+digits pattern
/// sort after every label that does, in plain string order. Ties on letters
/// and number (`A01` and `A1`) fall back to the raw string, so this is a
/// total order over any input.
///
/// ```
/// use shelfwise_sheet::compare_positions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_positions("A2", "A10"), Ordering::Less);
/// assert_eq!(compare_positions("A10", "B1"), Ordering::Less);
/// assert_eq!(compare_positions("Z9", "A1x"), Ordering::Less);
/// ```
#[must_use]
pub fn compare_positions(a: &str, b: &str) -> Ordering {
    match (split_label(a), split_label(b)) {
        (Some((la, na)), Some((lb, nb))) => la.cmp(lb).then(na.cmp(&nb)).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort labels in place using [`compare_positions`]
pub fn sort_positions<S: AsRef<str>>(labels: &mut [S]) {
    labels.sort_by(|a, b| compare_positions(a.as_ref(), b.as_ref()));
}

/// Parse a label into 0-based `(row, col)` grid coordinates
pub fn parse_position(label: &str) -> Result<(usize, usize)> {
    let upper = label.trim().to_uppercase();
    let (letters, number) =
        split_label(&upper).ok_or_else(|| SheetError::InvalidPosition(label.to_string()))?;

    if number == 0 {
        return Err(SheetError::InvalidPosition(label.to_string()));
    }

    let row = row_letters_to_index(letters)?;
    let col = usize::try_from(number - 1)
        .map_err(|_| SheetError::InvalidPosition(label.to_string()))?;
    Ok((row, col))
}

/// Parse a label and check it lies inside a `rows` x `cols` grid
pub fn parse_position_within(label: &str, rows: usize, cols: usize) -> Result<(usize, usize)> {
    let (row, col) = parse_position(label)?;
    if row >= rows || col >= cols {
        return Err(SheetError::PositionOutOfBounds {
            label: label.to_string(),
            rows,
            cols,
        });
    }
    Ok((row, col))
}

/// Convert 0-based `(row, col)` to a label: (0, 0) = "A1", (1, 2) = "B3"
#[must_use]
pub fn position_label(row: usize, col: usize) -> String {
    format!("{}{}", row_index_to_letters(row), col + 1)
}

/// 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ...
fn row_index_to_letters(mut row: usize) -> String {
    let mut result = String::new();
    row += 1;

    while row > 0 {
        row -= 1;
        result.insert(0, ((row % 26) as u8 + b'A') as char);
        row /= 26;
    }

    result
}

fn row_letters_to_index(letters: &str) -> Result<usize> {
    let mut row = 0usize;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(SheetError::InvalidPosition(letters.to_string()));
        }
        row = row
            .checked_mul(26)
            .and_then(|r| r.checked_add((b - b'A') as usize + 1))
            .ok_or_else(|| SheetError::InvalidPosition(letters.to_string()))?;
    }
    Ok(row - 1)
}
