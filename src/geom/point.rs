//! 3D point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 3D cartesian point. Used as the anchor of plane queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin point (0, 0, 0)
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create from array
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to array
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_display() {
        assert_eq!(Point::new(1.0, -2.0, 0.5).to_string(), "(1, -2, 0.5)");
    }

    #[test]
    fn test_point_from_array() {
        let p = Point::from_array([1.0, 2.0, 3.0]);
        assert_eq!(p, Point::new(1.0, 2.0, 3.0));
        assert_eq!(Point::origin().to_array(), [0.0; 3]);
    }
}
