use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the drawing plane. The origin is the center, `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One line drawn by a turtle with its pen down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Palette index of the pen when the segment was drawn.
    pub color: usize,
    pub size: f64,
}

pub const DEFAULT_PEN_COLOR: usize = 1;
pub const DEFAULT_PEN_SIZE: f64 = 1.0;

/// A single turtle.
///
/// Heading is in degrees, 0 points north and turning right increases it.
/// It is always kept in `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turtle {
    pub id: u32,
    pub position: Point,
    pub heading: f64,
    pub pen_down: bool,
    pub visible: bool,
    pub pen_color: usize,
    pub pen_size: f64,
    pub trail: Vec<Segment>,
}

impl Turtle {
    /// A fresh turtle at home: origin, heading north, pen down, visible.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            position: Point::ORIGIN,
            heading: 0.0,
            pen_down: true,
            visible: true,
            pen_color: DEFAULT_PEN_COLOR,
            pen_size: DEFAULT_PEN_SIZE,
            trail: Vec::new(),
        }
    }

    /// Move to `target`, leaving a trail segment when the pen is down.
    /// Returns the distance travelled.
    pub fn move_to(&mut self, target: Point) -> f64 {
        let start = self.position;
        if self.pen_down && start != target {
            self.trail.push(Segment {
                start,
                end: target,
                color: self.pen_color,
                size: self.pen_size,
            });
        }
        self.position = target;
        start.distance_to(target)
    }

    /// Set the heading, normalized into `[0, 360)`.
    pub fn set_heading(&mut self, degrees: f64) {
        self.heading = degrees.rem_euclid(360.0);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}
