use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::address::CellId;
use crate::geometry::{Axis, GeometryPatch, GridGeometry};
use crate::sheet::{Sheet, SheetId};

/// An ordered collection of sheets with one active sheet.
///
/// A `Workbook` is an immutable snapshot: every mutating operation takes
/// `&self` and returns a new snapshot. Sheets untouched by an operation are
/// shared between the old and new snapshot; a touched sheet is copied before
/// it is written, so older snapshots never observe later changes.
///
/// Invariants:
/// - there is always at least one sheet
/// - `active_sheet` names a sheet in `sheets`
/// - sheet ids are never reused
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WorkbookRepr")]
pub struct Workbook {
    sheets: Vec<Arc<Sheet>>,
    active_sheet: SheetId,
    /// Next ID to assign to a new sheet. Monotonically increasing, never reused.
    next_sheet_id: u64,
    #[serde(default)]
    geometry: GridGeometry,
}

/// Unchecked wire form. Converted into a `Workbook` only if the invariants hold.
#[derive(Deserialize)]
struct WorkbookRepr {
    sheets: Vec<Arc<Sheet>>,
    active_sheet: SheetId,
    next_sheet_id: u64,
    #[serde(default)]
    geometry: GridGeometry,
}

/// A stored workbook that breaks a collection invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookError {
    NoSheets,
    UnknownActiveSheet(SheetId),
    DuplicateSheetId(SheetId),
}

impl fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSheets => write!(f, "workbook has no sheets"),
            Self::UnknownActiveSheet(id) => write!(f, "active sheet {id} is not in the workbook"),
            Self::DuplicateSheetId(id) => write!(f, "sheet id {id} appears more than once"),
        }
    }
}

impl std::error::Error for WorkbookError {}

impl TryFrom<WorkbookRepr> for Workbook {
    type Error = WorkbookError;

    fn try_from(repr: WorkbookRepr) -> Result<Self, Self::Error> {
        let mut ids: Vec<SheetId> = repr.sheets.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(WorkbookError::DuplicateSheetId(pair[0]));
        }
        let Some(max_id) = ids.last() else {
            return Err(WorkbookError::NoSheets);
        };
        if ids.binary_search(&repr.active_sheet).is_err() {
            return Err(WorkbookError::UnknownActiveSheet(repr.active_sheet));
        }

        let next_sheet_id = repr.next_sheet_id.max(max_id.0 + 1);
        if next_sheet_id != repr.next_sheet_id {
            debug!("raised next sheet id {} -> {next_sheet_id}", repr.next_sheet_id);
        }
        Ok(Self {
            sheets: repr.sheets,
            active_sheet: repr.active_sheet,
            next_sheet_id,
            geometry: repr.geometry,
        })
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// Create a new workbook with one default sheet
    pub fn new() -> Self {
        Self::with_geometry(GridGeometry::default())
    }

    pub fn with_geometry(geometry: GridGeometry) -> Self {
        let sheet = Sheet::new_with_name(SheetId(1), "Sheet1");
        Self {
            sheets: vec![Arc::new(sheet)],
            active_sheet: SheetId(1),
            next_sheet_id: 2,
            geometry,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheets in display order
    pub fn sheets(&self) -> impl ExactSizeIterator<Item = &Sheet> {
        self.sheets.iter().map(|s| s.as_ref())
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id).map(|s| s.as_ref())
    }

    /// Get a sheet's index by its ID
    pub fn idx_for_sheet_id(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id == id)
    }

    /// Get the SheetId at a given index
    pub fn sheet_id_at_idx(&self, idx: usize) -> Option<SheetId> {
        self.sheets.get(idx).map(|s| s.id)
    }

    pub fn active_sheet_id(&self) -> SheetId {
        self.active_sheet
    }

    pub fn active_sheet(&self) -> &Sheet {
        // Every constructor and the deserializer guarantee both lookups succeed.
        match self.sheet(self.active_sheet) {
            Some(sheet) => sheet,
            None => self.sheets[0].as_ref(),
        }
    }

    /// Value of a cell on the active sheet
    pub fn active_cell_value(&self, cell: CellId) -> &str {
        self.active_sheet().get_cell(cell)
    }

    /// Effective column width on a sheet (override or default).
    pub fn column_width(&self, sheet: SheetId, col: usize) -> u32 {
        self.size(sheet, Axis::Column, col)
    }

    /// Effective row height on a sheet (override or default).
    pub fn row_height(&self, sheet: SheetId, row: usize) -> u32 {
        self.size(sheet, Axis::Row, row)
    }

    pub fn size(&self, sheet: SheetId, axis: Axis, key: usize) -> u32 {
        match self.sheet(sheet) {
            Some(s) => s.size(axis, key, &self.geometry),
            None => self.geometry.default_size(axis),
        }
    }

    // =========================================================================
    // Snapshot operations
    // =========================================================================

    /// Append a new sheet named `Sheet{n}` (n = current count + 1) and make it
    /// active.
    ///
    /// Names come from the count, not the id counter, so a delete followed by
    /// an add can repeat a name that is still in use. That is allowed.
    pub fn create_sheet(&self) -> Self {
        let mut next = self.clone();
        let id = SheetId(next.next_sheet_id);
        next.next_sheet_id += 1;
        let name = format!("Sheet{}", self.sheets.len() + 1);
        debug!("create sheet {id} ({name})");
        next.sheets.push(Arc::new(Sheet::new_with_name(id, &name)));
        next.active_sheet = id;
        next
    }

    /// Remove a sheet. Unchanged when it is the last sheet or the id is unknown.
    ///
    /// If the removed sheet was active, the first remaining sheet becomes active.
    pub fn delete_sheet(&self, id: SheetId) -> Self {
        if self.sheets.len() <= 1 {
            return self.clone();
        }
        let Some(index) = self.idx_for_sheet_id(id) else {
            return self.clone();
        };

        let mut next = self.clone();
        next.sheets.remove(index);
        if next.active_sheet == id {
            next.active_sheet = next.sheets[0].id;
        }
        debug!("delete sheet {id}, active is now {}", next.active_sheet);
        next
    }

    /// Set a sheet's display name verbatim (empty and duplicate names allowed).
    pub fn rename_sheet(&self, id: SheetId, name: &str) -> Self {
        self.update_sheet(id, |sheet| sheet.name = name.to_string())
    }

    /// Make a sheet active. Unchanged for unknown ids.
    pub fn set_active_sheet(&self, id: SheetId) -> Self {
        if self.idx_for_sheet_id(id).is_none() {
            return self.clone();
        }
        let mut next = self.clone();
        next.active_sheet = id;
        next
    }

    /// Write one cell on one sheet; every other cell and sheet is untouched.
    pub fn set_cell(&self, sheet: SheetId, cell: CellId, value: &str) -> Self {
        self.update_sheet(sheet, |s| s.set_cell(cell, value))
    }

    /// Merge column width / row height overrides into a sheet.
    pub fn set_geometry(&self, sheet: SheetId, patch: &GeometryPatch) -> Self {
        if patch.is_empty() {
            return self.clone();
        }
        self.update_sheet(sheet, |s| s.merge_geometry(patch))
    }

    fn update_sheet(&self, id: SheetId, f: impl FnOnce(&mut Sheet)) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.sheets.iter_mut().find(|s| s.id == id) {
            f(Arc::make_mut(slot));
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::to_id;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.sheet_names(), vec!["Sheet1"]);
        assert_eq!(wb.active_sheet_id(), SheetId(1));
    }

    #[test]
    fn test_create_sheet_activates() {
        let wb = Workbook::new().create_sheet();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet2"]);
        assert_eq!(wb.active_sheet_id(), SheetId(2));
        assert_eq!(wb.active_sheet().name, "Sheet2");
    }

    #[test]
    fn test_duplicate_names_after_delete() {
        let wb = Workbook::new().create_sheet().create_sheet();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet2", "Sheet3"]);

        // Drop Sheet2, then add: count is 2, so the new sheet is "Sheet3" again.
        let wb = wb.delete_sheet(SheetId(2)).create_sheet();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet3", "Sheet3"]);

        // Ids stay unique
        let ids: Vec<_> = wb.sheets().map(|s| s.id).collect();
        assert_eq!(ids, vec![SheetId(1), SheetId(3), SheetId(4)]);
    }

    #[test]
    fn test_delete_last_sheet_is_noop() {
        let wb = Workbook::new().set_cell(SheetId(1), to_id(0, 0), "x");
        let after = wb.delete_sheet(SheetId(1));
        assert_eq!(after.sheet_count(), 1);
        assert_eq!(after.active_sheet_id(), SheetId(1));
        assert_eq!(after.active_cell_value(to_id(0, 0)), "x");
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let wb = Workbook::new().create_sheet();
        let after = wb.delete_sheet(SheetId(99));
        assert_eq!(after.sheet_count(), 2);
        assert_eq!(after.active_sheet_id(), SheetId(2));
    }

    #[test]
    fn test_delete_active_moves_to_first() {
        let wb = Workbook::new().create_sheet().create_sheet();
        assert_eq!(wb.active_sheet_id(), SheetId(3));
        let wb = wb.delete_sheet(SheetId(3));
        assert_eq!(wb.active_sheet_id(), SheetId(1));

        // Deleting the first sheet while it is active moves to the new first
        let wb = wb.delete_sheet(SheetId(1));
        assert_eq!(wb.active_sheet_id(), SheetId(2));
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let wb = Workbook::new().create_sheet().create_sheet();
        let wb = wb.delete_sheet(SheetId(1));
        assert_eq!(wb.active_sheet_id(), SheetId(3));
    }

    #[test]
    fn test_rename_verbatim() {
        let wb = Workbook::new().create_sheet();
        let wb = wb.rename_sheet(SheetId(1), "  Budget ");
        let wb = wb.rename_sheet(SheetId(2), "  Budget ");
        assert_eq!(wb.sheet_names(), vec!["  Budget ", "  Budget "]);

        let wb = wb.rename_sheet(SheetId(1), "");
        assert_eq!(wb.sheet(SheetId(1)).unwrap().name, "");
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let before = Workbook::new();
        let after = before.set_cell(SheetId(1), to_id(0, 0), "new");
        assert_eq!(before.active_cell_value(to_id(0, 0)), "");
        assert_eq!(after.active_cell_value(to_id(0, 0)), "new");

        let renamed = after.rename_sheet(SheetId(1), "Data");
        assert_eq!(after.active_sheet().name, "Sheet1");
        assert_eq!(renamed.active_sheet().name, "Data");
    }

    #[test]
    fn test_set_cell_targets_one_sheet() {
        let wb = Workbook::new().create_sheet();
        let wb = wb.set_cell(SheetId(1), to_id(0, 0), "one");
        assert_eq!(wb.sheet(SheetId(1)).unwrap().get_cell(to_id(0, 0)), "one");
        assert_eq!(wb.sheet(SheetId(2)).unwrap().get_cell(to_id(0, 0)), "");
    }

    #[test]
    fn test_set_geometry_merges() {
        let wb = Workbook::new();
        let wb = wb.set_geometry(SheetId(1), &GeometryPatch::new().with_column_width(0, 120));
        let wb = wb.set_geometry(SheetId(1), &GeometryPatch::new().with_row_height(4, 30));
        assert_eq!(wb.column_width(SheetId(1), 0), 120);
        assert_eq!(wb.column_width(SheetId(1), 1), 96);
        assert_eq!(wb.row_height(SheetId(1), 4), 30);
        assert_eq!(wb.row_height(SheetId(1), 5), 24);
    }

    #[test]
    fn test_geometry_is_per_sheet() {
        let wb = Workbook::new().create_sheet();
        let wb = wb.set_geometry(SheetId(2), &GeometryPatch::single(Axis::Column, 2, 200));
        assert_eq!(wb.column_width(SheetId(2), 2), 200);
        assert_eq!(wb.column_width(SheetId(1), 2), 96);
    }

    #[test]
    fn test_set_active_sheet() {
        let wb = Workbook::new().create_sheet();
        let wb = wb.set_active_sheet(SheetId(1));
        assert_eq!(wb.active_sheet_id(), SheetId(1));
        let wb = wb.set_active_sheet(SheetId(42));
        assert_eq!(wb.active_sheet_id(), SheetId(1));
    }

    #[test]
    fn test_custom_geometry_defaults() {
        let geometry = GridGeometry {
            default_column_width: 80,
            ..GridGeometry::default()
        };
        let wb = Workbook::with_geometry(geometry);
        assert_eq!(wb.column_width(SheetId(1), 0), 80);
    }

    #[test]
    fn test_serde_roundtrip_preserves_counter() {
        let wb = Workbook::new()
            .create_sheet()
            .set_cell(SheetId(2), to_id(1, 1), "42")
            .delete_sheet(SheetId(1));
        let json = serde_json::to_string(&wb).unwrap();
        let back: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(back.active_cell_value(to_id(1, 1)), "42");

        // Counter survives, so the next id is still fresh
        let back = back.create_sheet();
        assert_eq!(back.active_sheet_id(), SheetId(3));
    }

    #[test]
    fn test_deserialize_rejects_broken_collections() {
        let empty = r#"{"sheets":[],"active_sheet":1,"next_sheet_id":2}"#;
        let err = serde_json::from_str::<Workbook>(empty).unwrap_err();
        assert!(err.to_string().contains("no sheets"), "{err}");

        let sheet = serde_json::to_string(&Sheet::new_with_name(SheetId(1), "Sheet1")).unwrap();
        let missing = format!(r#"{{"sheets":[{sheet}],"active_sheet":9,"next_sheet_id":2}}"#);
        let err = serde_json::from_str::<Workbook>(&missing).unwrap_err();
        assert!(err.to_string().contains("active sheet 9"), "{err}");

        let twice = format!(r#"{{"sheets":[{sheet},{sheet}],"active_sheet":1,"next_sheet_id":2}}"#);
        let err = serde_json::from_str::<Workbook>(&twice).unwrap_err();
        assert!(err.to_string().contains("sheet id 1"), "{err}");
    }

    #[test]
    fn test_deserialize_raises_stale_counter() {
        let sheet = serde_json::to_string(&Sheet::new_with_name(SheetId(5), "Sheet1")).unwrap();
        let stale = format!(r#"{{"sheets":[{sheet}],"active_sheet":5,"next_sheet_id":1}}"#);
        let wb: Workbook = serde_json::from_str(&stale).unwrap();
        assert_eq!(wb.active_sheet_id(), SheetId(5));

        let wb = wb.create_sheet();
        let ids: Vec<_> = wb.sheets().map(|s| s.id).collect();
        assert_eq!(ids, vec![SheetId(5), SheetId(6)]);
    }
}
