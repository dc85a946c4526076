//! Plane in 3D space given by its cartesian equation `ax + by + cz = d`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Point, Vector};
use crate::precision;
use crate::{GeoError, Result};

/// A plane `ax + by + cz = d`. The normal is `(a, b, c)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    /// Creates a plane from its coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Creates a plane from `[a, b, c, d]`.
    pub const fn from_array(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Returns the normal `(a, b, c)`.
    pub const fn normal(&self) -> Vector {
        Vector::new(self.a, self.b, self.c)
    }

    fn checked_normal_modulus(&self) -> Result<f64> {
        let modulus = self.normal().modulus();
        if modulus == 0.0 {
            return Err(GeoError::DegenerateGeometry(format!(
                "plane {} has a zero normal",
                self
            )));
        }
        Ok(modulus)
    }

    /// `a*x + b*y + c*z - d`, zero on the plane.
    fn residual(&self, x: f64, y: f64, z: f64) -> f64 {
        self.a * x + self.b * y + self.c * z - self.d
    }

    /// Exact membership test `a*x + b*y + c*z == d`.
    ///
    /// No tolerance is applied, so derived coordinates rarely satisfy it.
    /// Use [`Plane::contains`] for a tolerant check.
    pub fn on_plane(&self, x: f64, y: f64, z: f64) -> bool {
        self.a * x + self.b * y + self.c * z == self.d
    }

    /// Returns true if `|a*x + b*y + c*z - d| <= tolerance`.
    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        precision::is_close(self.residual(p.x, p.y, p.z), 0.0, tolerance)
    }

    /// Magnitude of the normal `(a, b, c)`.
    pub fn distance_from_origin(&self) -> Result<f64> {
        self.checked_normal_modulus()
    }

    /// Perpendicular distance from `p` to the plane.
    pub fn distance_from_point(&self, p: &Point) -> Result<f64> {
        let modulus = self.checked_normal_modulus()?;
        let distance = self.residual(p.x, p.y, p.z).abs() / modulus;
        if !distance.is_finite() {
            return Err(GeoError::DegenerateGeometry(format!(
                "distance from {} to {} is not finite",
                p, self
            )));
        }
        Ok(distance)
    }

    /// Acute angle between the two planes in degrees, rounded to one decimal.
    pub fn angle_planes(&self, other: &Plane) -> Result<f64> {
        self.checked_normal_modulus()?;
        other.checked_normal_modulus()?;
        let cos_angle = self
            .normal()
            .unit_vector()?
            .dot_product(&other.normal().unit_vector()?)
            .clamp(-1.0, 1.0);
        let angle_deg = cos_angle.acos().to_degrees();
        Ok(precision::round_to(angle_deg.min(180.0 - angle_deg), 1))
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x + {}y + {}z = {}", self.a, self.b, self.c, self.d)
    }
}
