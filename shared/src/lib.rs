//! Host-agnostic core of sdrag
//!
//! Everything here is plain Rust: the browser crate plugs `web-sys` types in
//! through the [`DragTarget`] and [`MoveSurface`] traits, tests plug in fakes.

pub mod controller;
pub mod error;
pub mod fix;
pub mod geometry;
pub mod options;

pub use controller::{DragCallback, DragController, DragSession, DragTarget, MoveSurface, StopCallback};
pub use error::DragError;
pub use fix::{DragPosition, FixOverrides};
pub use geometry::{Anchor, Axis, AxisAnchor, Edge, EdgeOffsets, PagePoint, PerAxis, format_px, parse_offset};
pub use options::{Direction, DragOptions};
