//! Input events forwarded from the view layer.

use excelpro_engine::{Axis, CellId, SheetId};

/// Grid navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, col delta)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Keys the cell editor reacts to. Text keys arrive as `GridEvent::CellInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Parse a DOM-style key name ("Enter", "ArrowUp", ...).
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Enter" => Some(Key::Enter),
            "Tab" => Some(Key::Tab),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            _ => None,
        }
    }

    /// Enter moves down, Tab moves right, arrows move their way.
    pub fn direction(self) -> Direction {
        match self {
            Key::Enter | Key::ArrowDown => Direction::Down,
            Key::Tab | Key::ArrowRight => Direction::Right,
            Key::ArrowUp => Direction::Up,
            Key::ArrowLeft => Direction::Left,
        }
    }
}

/// Everything the view can tell the grid controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Pointer click on a cell.
    CellClicked(CellId),
    /// Cell editor text changed; carries the whole new text.
    CellInput(String),
    /// Cell editor lost focus.
    CellBlurred,
    /// Navigation key pressed inside the cell editor.
    KeyPressed(Key),
    /// Formula bar text changed; carries the whole new text.
    FormulaBarInput(String),
    SheetTabClicked(SheetId),
    AddSheet,
    DeleteSheet(SheetId),
    RenameSheet(SheetId, String),
    /// Pointer pressed on a column or row resize handle.
    ResizeStarted { axis: Axis, key: usize, x: f32, y: f32 },
    /// Global pointer move.
    PointerMoved { x: f32, y: f32 },
    /// Global pointer release.
    PointerReleased,
}
