use super::{CompareAlongDimension, Dim, DistanceTo};

/// A bare point in physical units, for ad hoc queries and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A point from coordinate ticks and the physical size of one tick on
    /// each axis.
    pub fn scaled(x: f64, y: f64, x_unit: f64, y_unit: f64) -> Self {
        Self {
            x: x * x_unit,
            y: y * y_unit,
        }
    }
}

impl CompareAlongDimension for Point {
    fn compare(&self, other: &Self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.x - other.x,
            Dim::Y => self.y - other.y,
        }
    }
}

impl DistanceTo for Point {
    fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}
