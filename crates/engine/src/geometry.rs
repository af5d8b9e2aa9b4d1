//! Column/row sizing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLUMN_WIDTH: u32 = 96;
pub const DEFAULT_ROW_HEIGHT: u32 = 24;
pub const MIN_COLUMN_WIDTH: u32 = 20;
pub const MIN_ROW_HEIGHT: u32 = 15;

/// Which dimension a size applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Column width (horizontal pointer axis)
    Column,
    /// Row height (vertical pointer axis)
    Row,
}

/// Default and minimum sizes used when a sheet has no override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub default_column_width: u32,
    pub default_row_height: u32,
    pub min_column_width: u32,
    pub min_row_height: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            min_column_width: MIN_COLUMN_WIDTH,
            min_row_height: MIN_ROW_HEIGHT,
        }
    }
}

impl GridGeometry {
    pub fn default_size(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Column => self.default_column_width,
            Axis::Row => self.default_row_height,
        }
    }

    pub fn min_size(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Column => self.min_column_width,
            Axis::Row => self.min_row_height,
        }
    }
}

/// Partial set of size overrides to merge into a sheet.
///
/// Keys are column indices (widths) and row indices (heights). Entries not
/// named here are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryPatch {
    pub column_widths: FxHashMap<usize, u32>,
    pub row_heights: FxHashMap<usize, u32>,
}

impl GeometryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch touching a single column or row.
    pub fn single(axis: Axis, key: usize, size: u32) -> Self {
        let mut patch = Self::new();
        match axis {
            Axis::Column => patch.column_widths.insert(key, size),
            Axis::Row => patch.row_heights.insert(key, size),
        };
        patch
    }

    pub fn with_column_width(mut self, col: usize, width: u32) -> Self {
        self.column_widths.insert(col, width);
        self
    }

    pub fn with_row_height(mut self, row: usize, height: u32) -> Self {
        self.row_heights.insert(row, height);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.column_widths.is_empty() && self.row_heights.is_empty()
    }
}
