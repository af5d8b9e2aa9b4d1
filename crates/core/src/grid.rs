//! Grid controller: the single entry point for view events.
//!
//! Holds the current workbook snapshot, the selection, and the resize drag.
//! The view forwards every [`GridEvent`] to [`GridController::dispatch`] and
//! re-renders from the accessors afterwards. Dispatch is synchronous; each
//! event (including any commit it implies) completes before the next one.

use excelpro_config::Settings;
use excelpro_engine::{Axis, CellId, SheetId, Workbook};
use log::debug;

use crate::input::GridEvent;
use crate::resize::{PointerSource, ResizeController, ResizeState};
use crate::selection::{self, SelectionEvent, SelectionState};

pub struct GridController {
    workbook: Workbook,
    selection: SelectionState,
    resize: ResizeController,
    pointer: Box<dyn PointerSource>,
}

impl GridController {
    pub fn new(workbook: Workbook, pointer: impl PointerSource + 'static) -> Self {
        Self {
            workbook,
            selection: SelectionState::Idle,
            resize: ResizeController::new(),
            pointer: Box::new(pointer),
        }
    }

    /// Fresh one-sheet workbook sized by the user's settings.
    pub fn from_settings(settings: &Settings, pointer: impl PointerSource + 'static) -> Self {
        Self::new(Workbook::with_geometry(settings.geometry()), pointer)
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn resize_state(&self) -> &ResizeState {
        self.resize.state()
    }

    pub fn active_sheet_id(&self) -> SheetId {
        self.workbook.active_sheet_id()
    }

    /// Stored value of a cell on the active sheet.
    pub fn cell_value(&self, cell: CellId) -> &str {
        self.workbook.active_cell_value(cell)
    }

    pub fn formula_bar_text(&self) -> &str {
        selection::formula_bar_text(&self.selection, &self.workbook)
    }

    pub fn column_width(&self, col: usize) -> u32 {
        self.workbook.column_width(self.workbook.active_sheet_id(), col)
    }

    pub fn row_height(&self, row: usize) -> u32 {
        self.workbook.row_height(self.workbook.active_sheet_id(), row)
    }

    /// Apply one view event. Returns the cell whose editor should take focus.
    pub fn dispatch(&mut self, event: GridEvent) -> Option<CellId> {
        match event {
            GridEvent::CellClicked(cell) => self.select(SelectionEvent::Click(cell)),
            GridEvent::CellInput(text) => self.select(SelectionEvent::Input(text)),
            GridEvent::CellBlurred => self.select(SelectionEvent::Commit),
            GridEvent::KeyPressed(key) => self.select(SelectionEvent::Move(key.direction())),
            GridEvent::FormulaBarInput(text) => self.select(SelectionEvent::FormulaBarInput(text)),
            GridEvent::SheetTabClicked(id) => self.select(SelectionEvent::SwitchSheet(id)),
            GridEvent::AddSheet => {
                self.leave_sheet();
                self.workbook = self.workbook.create_sheet();
                None
            }
            GridEvent::DeleteSheet(id) => {
                self.delete_sheet(id);
                None
            }
            GridEvent::RenameSheet(id, name) => {
                self.workbook = self.workbook.rename_sheet(id, &name);
                None
            }
            GridEvent::ResizeStarted { axis, key, x, y } => {
                let pointer = match axis {
                    Axis::Column => x,
                    Axis::Row => y,
                };
                self.resize
                    .start(axis, key, pointer, &self.workbook, self.pointer.as_mut());
                None
            }
            GridEvent::PointerMoved { x, y } => {
                if self.resize.state().is_dragging() {
                    self.workbook = self.resize.on_move(x, y, &self.workbook);
                }
                None
            }
            GridEvent::PointerReleased => {
                self.resize.end();
                None
            }
        }
    }

    fn select(&mut self, event: SelectionEvent) -> Option<CellId> {
        let step = selection::transition(&self.selection, &self.workbook, event);
        self.selection = step.state;
        self.workbook = step.workbook;
        step.focus
    }

    /// Flush any open draft into the active sheet and clear the selection.
    fn leave_sheet(&mut self) {
        let (_, workbook) = selection::commit(&self.selection, &self.workbook);
        self.workbook = workbook;
        self.selection = SelectionState::Idle;
    }

    fn delete_sheet(&mut self, id: SheetId) {
        let was_active = id == self.workbook.active_sheet_id();
        let next = self.workbook.delete_sheet(id);
        if next.sheet_count() == self.workbook.sheet_count() {
            debug!("delete sheet {id} refused");
            return;
        }
        if was_active {
            self.selection = SelectionState::Idle;
        }
        self.workbook = next;
    }
}
