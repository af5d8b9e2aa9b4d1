//! `excelpro-core`: interaction state for the grid.
//!
//! Selection/editing and resize drags as explicit state machines over
//! `excelpro-engine` snapshots, plus the `GridController` that a view layer
//! drives with input events.

pub mod grid;
pub mod input;
pub mod resize;
pub mod selection;

pub use grid::GridController;
pub use input::{Direction, GridEvent, Key};
pub use resize::{PointerSource, ResizeController, ResizeState, Subscription};
pub use selection::{SelectionEvent, SelectionState};
