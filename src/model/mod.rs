//! Geometry model for the DXF → G-code compiler
//! Entities as they come out of a drawing, plus the motion commands they compile to

use serde::{Deserialize, Serialize};

/// Two coordinates closer than this (per axis) are the same position.
pub const POSITION_EPSILON: f64 = 1e-9;

/// Direction every generated arc is commanded in.
///
/// DXF arcs sweep counter-clockwise from start to end angle, but the output
/// is always emitted as G02. Changing the output convention is a one-line edit here.
pub const ARC_DIRECTION: ArcDirection = ArcDirection::Clockwise;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,        // G02
    CounterClockwise, // G03
}

impl ArcDirection {
    pub fn is_clockwise(self) -> bool {
        matches!(self, ArcDirection::Clockwise)
    }
}

/// 2D position (X, Y), no units enforced
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` around `self` at `angle_deg` (CCW from +X)
    pub fn polar(self, radius: f64, angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self {
            x: self.x + radius * rad.cos(),
            y: self.y + radius * rad.sin(),
        }
    }
}

/// Polyline vertex; `bulge` describes the segment that starts here
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A single drawing entity supplied by the geometry source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryEntity {
    #[serde(alias = "LINE")]
    Line { start: Point, end: Point },

    /// Angles in degrees, swept counter-clockwise from start to end
    #[serde(alias = "ARC")]
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },

    #[serde(alias = "CIRCLE")]
    Circle { center: Point, radius: f64 },

    #[serde(alias = "LWPOLYLINE")]
    Polyline {
        vertices: Vec<PolylineVertex>,
        #[serde(default)]
        closed: bool,
    },

    /// Anything the compiler has no mapping for (splines, text, hatches...)
    #[serde(other)]
    Unsupported,
}

impl GeometryEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            GeometryEntity::Line { .. } => "LINE",
            GeometryEntity::Arc { .. } => "ARC",
            GeometryEntity::Circle { .. } => "CIRCLE",
            GeometryEntity::Polyline { .. } => "LWPOLYLINE",
            GeometryEntity::Unsupported => "UNSUPPORTED",
        }
    }
}

/// One motion-program instruction
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    RapidXY { x: f64, y: f64 },
    RapidZ { z: f64 },
    LinearXY { x: f64, y: f64, feed: f64 },
    LinearZ { z: f64, feed: f64 },
    /// `i`/`j` are the center offset from the segment's start point
    ArcXY {
        x: f64,
        y: f64,
        i: f64,
        j: f64,
        feed: f64,
        clockwise: bool,
    },
    Comment { text: String },
}

impl MotionCommand {
    pub fn comment(text: impl Into<String>) -> Self {
        MotionCommand::Comment { text: text.into() }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, MotionCommand::ArcXY { .. })
    }
}

/// Tool position tracked while generating and while interpreting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ToolState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True if the tool already sits over `p` within [`POSITION_EPSILON`]
    pub fn is_at(&self, p: Point) -> bool {
        (self.x - p.x).abs() <= POSITION_EPSILON && (self.y - p.y).abs() <= POSITION_EPSILON
    }
}
