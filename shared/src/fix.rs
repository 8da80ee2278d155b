//! Values exchanged with drag callbacks.

use crate::geometry::{Axis, PagePoint, PerAxis};

/// Pointer position plus the grab offsets, as handed to callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragPosition {
    pub page_x: f64,
    pub start_x: f64,
    pub page_y: f64,
    pub start_y: f64,
}

impl DragPosition {
    pub fn new(pointer: PagePoint, start: PerAxis<f64>) -> Self {
        Self {
            page_x: pointer.x,
            start_x: start.x,
            page_y: pointer.y,
            start_y: start.y,
        }
    }
}

/// Per-frame override record filled in by the drag callback.
///
/// A field counts when it is set, whatever its value: `Some(0.0)` overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixOverrides {
    /// Pointer X used for this frame only
    pub page_x: Option<f64>,
    /// New grab offset, kept for the rest of the gesture
    pub start_x: Option<f64>,
    pub page_y: Option<f64>,
    pub start_y: Option<f64>,
    /// Skip the horizontal style write for this frame
    pub skip_x: bool,
    pub skip_y: bool,
}

impl FixOverrides {
    pub fn page(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.page_x,
            Axis::Y => self.page_y,
        }
    }

    pub fn start(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.start_x,
            Axis::Y => self.start_y,
        }
    }

    pub fn skips(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.skip_x,
            Axis::Y => self.skip_y,
        }
    }

    pub fn skip_all(&mut self) {
        self.skip_x = true;
        self.skip_y = true;
    }
}
