//! `excelpro-engine`: grid data model.
//!
//! Cell addressing, per-sheet sparse storage, and the sheet collection.
//! Pure data: no input handling, no IO.

pub mod address;
pub mod geometry;
pub mod sheet;
pub mod workbook;

pub use address::{CellId, COLUMN_COUNT, ROW_COUNT};
pub use geometry::{Axis, GeometryPatch, GridGeometry};
pub use sheet::{Sheet, SheetId};
pub use workbook::{Workbook, WorkbookError};
