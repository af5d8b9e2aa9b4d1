//! Column/row resize drags.
//!
//! A drag starts on a header's resize handle, follows the pointer anywhere on
//! screen, and ends on pointer release. While it runs, the view must deliver
//! pointer moves and releases from the whole window, not just the handle;
//! [`PointerSource::capture_pointer`] installs those global listeners and
//! returns a [`Subscription`] that removes them when dropped.

use std::fmt;

use excelpro_engine::{Axis, GeometryPatch, GridGeometry, SheetId, Workbook, COLUMN_COUNT, ROW_COUNT};
use log::{debug, trace};

/// Guard for an installed listener set. Dropping it runs the release callback.
#[must_use = "listeners are removed as soon as the subscription is dropped"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Installs window-wide pointer move/up listeners for the duration of a drag.
pub trait PointerSource {
    fn capture_pointer(&mut self) -> Subscription;
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Sheet that was active when the drag began. Moves only ever resize it.
    pub sheet: SheetId,
    pub axis: Axis,
    /// Column index or row index
    pub key: usize,
    /// Pointer coordinate along the axis when the drag began
    pub start_pointer: f32,
    pub start_size: u32,
}

impl Drag {
    /// Pointer coordinate along this drag's axis: x for columns, y for rows.
    pub fn coordinate(&self, x: f32, y: f32) -> f32 {
        match self.axis {
            Axis::Column => x,
            Axis::Row => y,
        }
    }

    /// Size for the current pointer position, never below the axis minimum.
    pub fn size_at(&self, pointer: f32, geometry: &GridGeometry) -> u32 {
        let min = geometry.min_size(self.axis);
        let requested = f64::from(self.start_size) + f64::from(pointer - self.start_pointer);
        if !(requested > f64::from(min)) {
            return min;
        }
        requested.round().min(f64::from(u32::MAX)) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(Drag),
}

impl ResizeState {
    /// Begin a drag. A drag already in progress is left alone.
    pub fn begin(
        &self,
        sheet: SheetId,
        axis: Axis,
        key: usize,
        pointer: f32,
        start_size: u32,
    ) -> ResizeState {
        match self {
            ResizeState::Idle => ResizeState::Dragging(Drag {
                sheet,
                axis,
                key,
                start_pointer: pointer,
                start_size,
            }),
            dragging => *dragging,
        }
    }

    pub fn end(&self) -> ResizeState {
        ResizeState::Idle
    }

    pub fn drag(&self) -> Option<&Drag> {
        match self {
            ResizeState::Dragging(drag) => Some(drag),
            ResizeState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, ResizeState::Dragging(_))
    }
}

/// Runs at most one drag and owns its listener subscription.
///
/// Dropping the controller mid-drag releases the listeners.
#[derive(Debug, Default)]
pub struct ResizeController {
    state: ResizeState,
    capture: Option<Subscription>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    /// Start dragging `key` on the active sheet.
    ///
    /// Returns false (and does nothing) if a drag is already running or the
    /// key is off the grid.
    pub fn start(
        &mut self,
        axis: Axis,
        key: usize,
        pointer: f32,
        workbook: &Workbook,
        source: &mut dyn PointerSource,
    ) -> bool {
        let limit = match axis {
            Axis::Column => COLUMN_COUNT,
            Axis::Row => ROW_COUNT,
        };
        if self.state.is_dragging() || key >= limit {
            return false;
        }

        let sheet = workbook.active_sheet_id();
        let start_size = workbook.size(sheet, axis, key);
        self.state = self.state.begin(sheet, axis, key, pointer, start_size);
        self.capture = Some(source.capture_pointer());
        debug!("resize start {axis:?} {key} on sheet {sheet} at {start_size}");
        true
    }

    /// Apply a pointer move. Writes exactly the dragged key's size to the
    /// sheet the drag started on, even if another sheet has since become
    /// active. Returns the workbook unchanged when idle or when that sheet is gone.
    pub fn on_move(&mut self, x: f32, y: f32, workbook: &Workbook) -> Workbook {
        let Some(drag) = self.state.drag() else {
            return workbook.clone();
        };
        let size = drag.size_at(drag.coordinate(x, y), workbook.geometry());
        trace!("resize {:?} {} -> {size}", drag.axis, drag.key);
        workbook.set_geometry(drag.sheet, &GeometryPatch::single(drag.axis, drag.key, size))
    }

    /// Finish the drag and release the listeners.
    pub fn end(&mut self) {
        if let Some(drag) = self.state.drag() {
            debug!("resize end {:?} {}", drag.axis, drag.key);
        }
        self.state = self.state.end();
        self.capture = None;
    }
}
