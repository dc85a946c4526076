//! 3D vector.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GeoError, Result};

/// A 3D vector. 2D input is lifted with `z = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create from a 2- or 3-component coordinate slice.
    /// A 2-component slice is lifted to 3D with `z = 0`.
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        match *coords {
            [x, y] => Ok(Self::new(x, y, 0.0)),
            [x, y, z] => Ok(Self::new(x, y, z)),
            _ => Err(GeoError::Parse(format!(
                "coordinate list must have 2 or 3 components, got {}",
                coords.len()
            ))),
        }
    }

    /// Convert to array
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean norm. Does not overflow or underflow for finite components.
    pub fn modulus(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference `self - other`.
    pub fn subtract(&self, other: &Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Multiply every component by `scalar`.
    pub fn scale(&self, scalar: f64) -> Vector {
        Vector::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Divide every component by `scalar`.
    pub fn divide(&self, scalar: f64) -> Result<Vector> {
        if scalar == 0.0 {
            return Err(GeoError::DegenerateGeometry("cannot divide a vector by zero".into()));
        }
        Ok(Vector::new(self.x / scalar, self.y / scalar, self.z / scalar))
    }

    /// Vector of modulus 1 pointing the same way.
    pub fn unit_vector(&self) -> Result<Vector> {
        let modulus = self.modulus();
        if modulus == 0.0 {
            return Err(GeoError::DegenerateGeometry(
                "zero vector does not have a unit vector".into(),
            ));
        }
        self.divide(modulus)
    }

    /// Dot product with another vector
    pub fn dot_product(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector
    pub fn cross_product(&self, other: &Vector) -> Vector {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Angle with another vector, in radians within `[0, PI]`.
    pub fn angle(&self, other: &Vector) -> Result<f64> {
        if self.modulus() == 0.0 || other.modulus() == 0.0 {
            return Err(GeoError::DegenerateGeometry(
                "cannot calculate an angle with a zero vector".into(),
            ));
        }
        // Unit vectors keep the dot product in range for any finite input.
        let cos_angle = self.unit_vector()?.dot_product(&other.unit_vector()?);
        // Rounding can push the cosine just outside [-1, 1].
        Ok(cos_angle.clamp(-1.0, 1.0).acos())
    }

    /// Signed length of the projection of `self` onto `onto`.
    pub fn length_of_projection(&self, onto: &Vector) -> Result<f64> {
        if onto.modulus() == 0.0 {
            return Err(GeoError::DegenerateGeometry(
                "cannot project onto a zero vector".into(),
            ));
        }
        Ok(self.dot_product(&onto.unit_vector()?))
    }

    /// Component of `self` lying along `onto`.
    pub fn projection_vector(&self, onto: &Vector) -> Result<Vector> {
        let length = self.length_of_projection(onto)?;
        Ok(onto.unit_vector()?.scale(length))
    }

    /// Distance between two position vectors.
    pub fn distance(&self, other: &Vector) -> f64 {
        self.subtract(other).modulus()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "({:.*}, {:.*}, {:.*})", p, self.x, p, self.y, p, self.z),
            None => write!(f, "({}, {}, {})", self.x, self.y, self.z),
        }
    }
}
