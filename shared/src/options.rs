use serde::{Deserialize, Serialize};

use crate::error::DragError;
use crate::geometry::Axis;

/// Axis restriction for a draggable element
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// No restriction
    #[default]
    Both,
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn allows(self, axis: Axis) -> bool {
        match (self, axis) {
            (Direction::Vertical, Axis::X) => false,
            (Direction::Horizontal, Axis::Y) => false,
            _ => true,
        }
    }
}

// ===== OPTIONS =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DragOptions {
    pub direction: Direction,
    /// Log gesture start/stop to the console
    pub log_events: bool,
}

impl DragOptions {
    pub fn with_direction(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Parse options from a TOML document, e.g. an embedded per-widget config.
    ///
    /// Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, DragError> {
        toml::from_str(source).map_err(|error| DragError::InvalidOptions(error.to_string()))
    }
}
