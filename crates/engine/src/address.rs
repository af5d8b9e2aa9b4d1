//! Cell addressing.
//!
//! Maps (row, col) coordinates to spreadsheet-style identifiers ("A1", "B12")
//! and back. The grid is fixed at `COLUMN_COUNT` single-letter columns and
//! `ROW_COUNT` rows; every `CellId` in the system lies inside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of columns (labels A through Z).
pub const COLUMN_COUNT: usize = 26;

/// Number of rows (labels 1 through 50).
pub const ROW_COUNT: usize = 50;

/// Address of a single cell, displayed as column label + 1-based row ("B12").
///
/// Only constructible for coordinates inside the grid, so `row_of`/`col_of`
/// are total on every value of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    row: u16,
    col: u16,
}

impl CellId {
    /// Bounds-checked constructor. Returns `None` outside the grid.
    pub fn checked(row: usize, col: usize) -> Option<Self> {
        if row < ROW_COUNT && col < COLUMN_COUNT {
            Some(Self { row: row as u16, col: col as u16 })
        } else {
            None
        }
    }

    /// Row index (0-based)
    #[inline]
    pub fn row(&self) -> usize {
        self.row as usize
    }

    /// Column index (0-based)
    #[inline]
    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Cell offset by (dr, dc), or `None` if that leaves the grid.
    pub fn offset(&self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row().checked_add_signed(dr)?;
        let col = self.col().checked_add_signed(dc)?;
        Self::checked(row, col)
    }

    /// Parse an identifier like "B12" (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (label, digits) = s.split_at(split);
        let col = column_index(label).ok_or_else(|| AddressError::Malformed(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::Malformed(s.to_string()));
        }
        let row: usize = digits
            .parse()
            .map_err(|_| AddressError::Malformed(s.to_string()))?;
        if row == 0 || row > ROW_COUNT {
            return Err(AddressError::OutOfRange(s.to_string()));
        }
        Self::checked(row - 1, col).ok_or_else(|| AddressError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col()), self.row + 1)
    }
}

impl FromStr for CellId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellId {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

/// Error from parsing a textual cell identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Not of the form `<letter><digits>`.
    Malformed(String),
    /// Well-formed but outside the grid.
    OutOfRange(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed cell id: '{s}'"),
            Self::OutOfRange(s) => {
                write!(f, "cell id '{s}' is outside the {COLUMN_COUNT}x{ROW_COUNT} grid")
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// Cell id for (row, col).
///
/// Callers must stay inside the grid; coordinates outside it are a contract
/// violation and are clamped to the last row/column in release builds.
pub fn to_id(row: usize, col: usize) -> CellId {
    debug_assert!(row < ROW_COUNT && col < COLUMN_COUNT, "({row}, {col}) outside grid");
    CellId {
        row: row.min(ROW_COUNT - 1) as u16,
        col: col.min(COLUMN_COUNT - 1) as u16,
    }
}

/// Row index of a cell id; inverse of `to_id`.
#[inline]
pub fn row_of(id: CellId) -> usize {
    id.row()
}

/// Column index of a cell id; inverse of `to_id`.
#[inline]
pub fn col_of(id: CellId) -> usize {
    id.col()
}

/// Column label for a 0-based column index: 0=A, 1=B, ..., 25=Z.
pub fn column_label(col: usize) -> String {
    debug_assert!(col < COLUMN_COUNT);
    ((b'A' + col.min(COLUMN_COUNT - 1) as u8) as char).to_string()
}

/// Column index for a label, case-insensitive. `None` for anything but A-Z.
pub fn column_index(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => None,
    }
}
