use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::address::CellId;
use crate::geometry::{Axis, GeometryPatch, GridGeometry};

/// Stable sheet identity. Assigned by the workbook, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetId(pub(crate) u64);

impl SheetId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sheet: a name, sparse cell values, and sparse size overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    cells: FxHashMap<CellId, String>,
    /// Column index -> width
    column_widths: FxHashMap<usize, u32>,
    /// Row index -> height
    row_heights: FxHashMap<usize, u32>,
}

impl Sheet {
    pub fn new_with_name(id: SheetId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            cells: FxHashMap::default(),
            column_widths: FxHashMap::default(),
            row_heights: FxHashMap::default(),
        }
    }

    /// Stored value, or `""` when the cell was never written.
    pub fn get_cell(&self, cell: CellId) -> &str {
        self.cells.get(&cell).map(String::as_str).unwrap_or("")
    }

    pub fn set_cell(&mut self, cell: CellId, value: &str) {
        // Reuse the existing allocation when overwriting.
        match self.cells.get_mut(&cell) {
            Some(existing) => {
                existing.clear();
                existing.push_str(value);
            }
            None => {
                self.cells.insert(cell, value.to_string());
            }
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_width_override(&self, col: usize) -> Option<u32> {
        self.column_widths.get(&col).copied()
    }

    pub fn row_height_override(&self, row: usize) -> Option<u32> {
        self.row_heights.get(&row).copied()
    }

    /// Effective size of a column or row, falling back to the geometry default.
    pub fn size(&self, axis: Axis, key: usize, geometry: &GridGeometry) -> u32 {
        let over = match axis {
            Axis::Column => self.column_width_override(key),
            Axis::Row => self.row_height_override(key),
        };
        over.unwrap_or_else(|| geometry.default_size(axis))
    }

    /// Merge size overrides. Keys absent from the patch keep their values.
    pub fn merge_geometry(&mut self, patch: &GeometryPatch) {
        self.column_widths
            .extend(patch.column_widths.iter().map(|(&k, &v)| (k, v)));
        self.row_heights
            .extend(patch.row_heights.iter().map(|(&k, &v)| (k, v)));
    }

    pub fn column_widths(&self) -> &FxHashMap<usize, u32> {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &FxHashMap<usize, u32> {
        &self.row_heights
    }
}
