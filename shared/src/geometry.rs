//! Edges, axes and the CSS offset values that connect them.

// ===== EDGES & AXES =====

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    /// CSS property name of this edge offset
    pub fn css_name(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];
}

/// Which side of the containing box the element's position is expressed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// `left` / `top`
    #[default]
    Near,
    /// `right` / `bottom`
    Far,
}

impl Anchor {
    /// Pick the edge with the smaller offset; ties stay on the near edge.
    pub fn from_offsets(near: i32, far: i32) -> Self {
        if far < near { Anchor::Far } else { Anchor::Near }
    }

    pub fn edge(self, axis: Axis) -> Edge {
        match (self, axis) {
            (Anchor::Near, Axis::X) => Edge::Left,
            (Anchor::Far, Axis::X) => Edge::Right,
            (Anchor::Near, Axis::Y) => Edge::Top,
            (Anchor::Far, Axis::Y) => Edge::Bottom,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Anchor::Near => Anchor::Far,
            Anchor::Far => Anchor::Near,
        }
    }

    /// Far edges grow against the pointer direction.
    pub fn sign(self) -> f64 {
        match self {
            Anchor::Near => 1.0,
            Anchor::Far => -1.0,
        }
    }
}

// ===== PER-AXIS VALUES =====

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PerAxis<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

pub type AxisAnchor = PerAxis<Anchor>;

/// Pointer position in page coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

// ===== COMPUTED OFFSETS =====

/// The four edge offsets of an element as read from its computed style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeOffsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl EdgeOffsets {
    /// Build from raw computed-style strings, one lookup per edge.
    pub fn from_css(mut value_of: impl FnMut(Edge) -> Option<String>) -> Self {
        let mut offsets = Self::default();
        for edge in Edge::ALL {
            let value = value_of(edge).map(|raw| parse_offset(&raw)).unwrap_or(0);
            offsets.set(edge, value);
        }
        offsets
    }

    pub fn get(&self, edge: Edge) -> i32 {
        match edge {
            Edge::Left => self.left,
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
        }
    }

    pub fn set(&mut self, edge: Edge, value: i32) {
        match edge {
            Edge::Left => self.left = value,
            Edge::Top => self.top = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
        }
    }

    pub fn anchor(&self) -> AxisAnchor {
        PerAxis::new(
            Anchor::from_offsets(self.left, self.right),
            Anchor::from_offsets(self.top, self.bottom),
        )
    }
}

/// Integer prefix of a CSS length, the way `parseInt` reads it.
///
/// `"10.7px"` is 10, `"-5px"` is -5. Anything without leading digits
/// (`""`, `"auto"`, `"px"`) is 0.
pub fn parse_offset(raw: &str) -> i32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    // Saturate instead of failing on absurd lengths.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Pixel value for an inline style write.
pub fn format_px(value: f64) -> String {
    // Avoid "-0px"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}
