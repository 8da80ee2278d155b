use std::fmt;

/// Everything that can go wrong while attaching or starting a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragError {
    /// Press landed on something that cannot be positioned with CSS offsets
    InvalidTargetType,
    /// Options could not be parsed
    InvalidOptions(String),
    /// The host refused a listener registration
    Host(String),
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragError::InvalidTargetType => write!(f, "Your target must be an html element"),
            DragError::InvalidOptions(reason) => write!(f, "Invalid drag options: {reason}"),
            DragError::Host(reason) => write!(f, "Host error: {reason}"),
        }
    }
}

impl std::error::Error for DragError {}
