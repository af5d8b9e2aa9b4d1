//! Selection and cell editing.
//!
//! A pure state machine: [`transition`] takes the current selection, the
//! current workbook snapshot, and one event, and returns the next selection,
//! the next workbook, and the cell (if any) whose editor should take focus.
//!
//! # Two write paths
//!
//! Grid edits are buffered in a draft and written on commit. Formula bar
//! edits skip the draft and write the store on every change. Both target the
//! same cell and nothing reconciles them: whichever write happens last wins.
//! A formula bar edit followed by a grid commit therefore overwrites the
//! formula bar text with the (older) draft.

use excelpro_engine::{CellId, SheetId, Workbook};
use log::{debug, trace};

use crate::input::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected (startup, or right after a sheet switch).
    #[default]
    Idle,
    /// A cell is selected; no edit in progress.
    Selected(CellId),
    /// A cell editor is open with uncommitted text.
    Editing { cell: CellId, draft: String },
}

impl SelectionState {
    /// The selected cell, whether or not it is being edited.
    pub fn cell(&self) -> Option<CellId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(cell) => Some(*cell),
            SelectionState::Editing { cell, .. } => Some(*cell),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            SelectionState::Editing { draft, .. } => Some(draft.as_str()),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, SelectionState::Editing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Click(CellId),
    /// New editor text (whole value, not a delta).
    Input(String),
    /// Blur: write the draft, keep the cell selected.
    Commit,
    /// Enter/Tab/arrow: commit, then move if the target is on the grid.
    Move(Direction),
    /// Formula bar text for the selected cell; written immediately.
    FormulaBarInput(String),
    SwitchSheet(SheetId),
}

/// Result of one transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: SelectionState,
    pub workbook: Workbook,
    /// Cell whose editor should receive focus.
    pub focus: Option<CellId>,
}

impl Step {
    fn unchanged(state: &SelectionState, workbook: &Workbook) -> Self {
        Self {
            state: state.clone(),
            workbook: workbook.clone(),
            focus: None,
        }
    }
}

pub fn transition(state: &SelectionState, workbook: &Workbook, event: SelectionEvent) -> Step {
    match event {
        SelectionEvent::Click(cell) => click(state, workbook, cell),
        SelectionEvent::Input(text) => match state {
            SelectionState::Editing { cell, .. } => Step {
                state: SelectionState::Editing { cell: *cell, draft: text },
                workbook: workbook.clone(),
                focus: None,
            },
            _ => Step::unchanged(state, workbook),
        },
        SelectionEvent::Commit => {
            let (state, workbook) = commit(state, workbook);
            Step { state, workbook, focus: None }
        }
        SelectionEvent::Move(direction) => move_selection(state, workbook, direction),
        SelectionEvent::FormulaBarInput(text) => match state.cell() {
            Some(cell) => {
                trace!("formula bar write {cell}");
                Step {
                    state: state.clone(),
                    workbook: workbook.set_cell(workbook.active_sheet_id(), cell, &text),
                    focus: None,
                }
            }
            None => Step::unchanged(state, workbook),
        },
        SelectionEvent::SwitchSheet(id) => switch_sheet(state, workbook, id),
    }
}

/// Write an open draft to the active sheet. Anything but `Editing` is returned as is.
pub fn commit(state: &SelectionState, workbook: &Workbook) -> (SelectionState, Workbook) {
    match state {
        SelectionState::Editing { cell, draft } => {
            trace!("commit {cell}");
            let workbook = workbook.set_cell(workbook.active_sheet_id(), *cell, draft);
            (SelectionState::Selected(*cell), workbook)
        }
        _ => (state.clone(), workbook.clone()),
    }
}

/// Text shown in the formula bar: the stored value of the selected cell.
pub fn formula_bar_text<'a>(state: &SelectionState, workbook: &'a Workbook) -> &'a str {
    match state.cell() {
        Some(cell) => workbook.active_cell_value(cell),
        None => "",
    }
}

/// Open the editor on `cell` with its stored value.
///
/// Clicking another cell blurs the open editor first, so its draft is
/// committed before the new cell's value is read. Clicking the cell already
/// being edited keeps the draft.
fn click(state: &SelectionState, workbook: &Workbook, cell: CellId) -> Step {
    if let SelectionState::Editing { cell: current, .. } = state {
        if *current == cell {
            return Step {
                state: state.clone(),
                workbook: workbook.clone(),
                focus: Some(cell),
            };
        }
    }

    let (_, workbook) = commit(state, workbook);
    let draft = workbook.active_cell_value(cell).to_string();
    Step {
        state: SelectionState::Editing { cell, draft },
        workbook,
        focus: Some(cell),
    }
}

fn move_selection(state: &SelectionState, workbook: &Workbook, direction: Direction) -> Step {
    let Some(current) = state.cell() else {
        return Step::unchanged(state, workbook);
    };

    let (committed, workbook) = commit(state, workbook);
    let (dr, dc) = direction.delta();
    match current.offset(dr, dc) {
        Some(target) => click(&committed, &workbook, target),
        None => Step {
            state: committed,
            workbook,
            focus: None,
        },
    }
}

/// Flush the draft into the sheet being left, then activate `id` with nothing selected.
fn switch_sheet(state: &SelectionState, workbook: &Workbook, id: SheetId) -> Step {
    if id == workbook.active_sheet_id() || workbook.sheet(id).is_none() {
        return Step::unchanged(state, workbook);
    }
    let (_, workbook) = commit(state, workbook);
    debug!("switch sheet {} -> {id}", workbook.active_sheet_id());
    Step {
        state: SelectionState::Idle,
        workbook: workbook.set_active_sheet(id),
        focus: None,
    }
}
