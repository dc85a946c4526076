//! Operation dispatch.
//!
//! Every supported tag maps to exactly one [`Operation`] variant, and
//! [`dispatch`] handles all variants in a single `match`.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::geom::Vector;
use crate::request::{Operand, Request};
use crate::{GeoError, Result};

/// Number of operands an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A supported geometric computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Echo a single vector.
    Vector,
    /// Display-only listing of every operand.
    Vectors,
    Magnitude,
    UnitVector,
    Addition,
    Subtract,
    DotProduct,
    CrossProduct,
    /// Angle between two vectors.
    Angle,
    /// Length of the projection of the first vector onto the second.
    LengthOfProj,
    /// Projection of the first vector onto the second.
    ProjectionVector,
    /// Distance between two position vectors.
    Distance,
    /// One coordinate list and one bare scalar, in either order.
    ScalarMultiplication,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::Vector,
        Operation::Vectors,
        Operation::Magnitude,
        Operation::UnitVector,
        Operation::Addition,
        Operation::Subtract,
        Operation::DotProduct,
        Operation::CrossProduct,
        Operation::Angle,
        Operation::LengthOfProj,
        Operation::ProjectionVector,
        Operation::Distance,
        Operation::ScalarMultiplication,
    ];

    /// The request tag selecting this operation.
    pub const fn tag(self) -> &'static str {
        match self {
            Operation::Vector => "vector",
            Operation::Vectors => "vectors",
            Operation::Magnitude => "magnitude",
            Operation::UnitVector => "unit_vector",
            Operation::Addition => "addition",
            Operation::Subtract => "subtract",
            Operation::DotProduct => "dot_product",
            Operation::CrossProduct => "cross_product",
            Operation::Angle => "angle",
            Operation::LengthOfProj => "length_of_proj",
            Operation::ProjectionVector => "projection_vector",
            Operation::Distance => "distance",
            Operation::ScalarMultiplication => "scalar_multiplication",
        }
    }

    pub const fn arity(self) -> Arity {
        match self {
            Operation::Vectors => Arity::AtLeast(1),
            Operation::Vector | Operation::Magnitude | Operation::UnitVector => Arity::Exactly(1),
            Operation::Addition
            | Operation::Subtract
            | Operation::DotProduct
            | Operation::CrossProduct
            | Operation::Angle
            | Operation::LengthOfProj
            | Operation::ProjectionVector
            | Operation::Distance
            | Operation::ScalarMultiplication => Arity::Exactly(2),
        }
    }

    /// Looks up an operation by its (lowercase) tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }

    fn check_arity(self, found: usize) -> Result<()> {
        let expected = self.arity();
        if expected.accepts(found) {
            Ok(())
        } else {
            Err(GeoError::Arity {
                operation: self.tag().to_string(),
                expected,
                found,
            })
        }
    }
}

impl FromStr for Operation {
    type Err = GeoError;

    fn from_str(tag: &str) -> Result<Self> {
        Self::from_tag(tag).ok_or_else(|| GeoError::UnsupportedOperation(tag.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw result of a dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Vector(Vector),
    Scalar(f64),
    /// Angle in radians; reported in degrees.
    Angle(f64),
    /// Nothing computed; the operands are the result.
    Display,
}

impl Outcome {
    /// False if any computed component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Outcome::Vector(v) => v.to_array().iter().all(|c| c.is_finite()),
            Outcome::Scalar(s) | Outcome::Angle(s) => s.is_finite(),
            Outcome::Display => true,
        }
    }
}

fn vector_operand(operation: Operation, index: usize, operand: &Operand) -> Result<Vector> {
    match operand {
        Operand::Vector(v) => Ok(*v),
        Operand::Scalar(s) => Err(GeoError::Parse(format!(
            "operation '{}' expects a coordinate list as operand {}, got the scalar {}",
            operation,
            index + 1,
            s
        ))),
    }
}

fn single(operation: Operation, operands: &[Operand]) -> Result<Vector> {
    vector_operand(operation, 0, &operands[0])
}

fn pair(operation: Operation, operands: &[Operand]) -> Result<(Vector, Vector)> {
    Ok((
        vector_operand(operation, 0, &operands[0])?,
        vector_operand(operation, 1, &operands[1])?,
    ))
}

/// Validates the request against its operation and runs the primitive.
pub fn dispatch(request: &Request) -> Result<(Operation, Outcome)> {
    let operation = request.tag.parse::<Operation>()?;
    let operands = request.operands.as_slice();
    operation.check_arity(operands.len())?;
    debug!(%operation, operands = operands.len(), "dispatching");

    let outcome = match operation {
        Operation::Vector => Outcome::Vector(single(operation, operands)?),
        Operation::Vectors => {
            for (index, operand) in operands.iter().enumerate() {
                vector_operand(operation, index, operand)?;
            }
            Outcome::Display
        }
        Operation::Magnitude => Outcome::Scalar(single(operation, operands)?.modulus()),
        Operation::UnitVector => Outcome::Vector(single(operation, operands)?.unit_vector()?),
        Operation::Addition => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Vector(a.add(&b))
        }
        Operation::Subtract => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Vector(a.subtract(&b))
        }
        Operation::DotProduct => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Scalar(a.dot_product(&b))
        }
        Operation::CrossProduct => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Vector(a.cross_product(&b))
        }
        Operation::Angle => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Angle(a.angle(&b)?)
        }
        Operation::LengthOfProj => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Scalar(a.length_of_projection(&b)?)
        }
        Operation::ProjectionVector => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Vector(a.projection_vector(&b)?)
        }
        Operation::Distance => {
            let (a, b) = pair(operation, operands)?;
            Outcome::Scalar(a.distance(&b))
        }
        Operation::ScalarMultiplication => match (operands[0], operands[1]) {
            (Operand::Vector(v), Operand::Scalar(s)) | (Operand::Scalar(s), Operand::Vector(v)) => {
                Outcome::Vector(v.scale(s))
            }
            _ => {
                return Err(GeoError::Parse(format!(
                    "{} takes one coordinate list and one bare scalar",
                    operation
                )))
            }
        },
    };

    if !outcome.is_finite() {
        return Err(GeoError::DegenerateGeometry(format!(
            "{} overflowed to a non-finite result",
            operation
        )));
    }
    Ok((operation, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::parse_request;
    use approx::assert_relative_eq;

    fn run(src: &str) -> Result<(Operation, Outcome)> {
        dispatch(&parse_request(src)?)
    }

    #[test]
    fn test_tags_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_tag(op.tag()), Some(op));
            assert_eq!(op.tag().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(Operation::from_tag("bogus_op"), None);
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(Operation::Vectors.arity(), Arity::AtLeast(1));
        assert_eq!(Operation::UnitVector.arity(), Arity::Exactly(1));
        assert_eq!(Operation::ScalarMultiplication.arity(), Arity::Exactly(2));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::Exactly(2).accepts(3));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }

    #[test]
    fn test_dispatch_vector_results() {
        assert_eq!(
            run("[[1,2,3],[4,5,6],'addition']").unwrap(),
            (Operation::Addition, Outcome::Vector(Vector::new(5.0, 7.0, 9.0)))
        );
        assert_eq!(
            run("[[1,0,0],[0,1,0],'cross_product']").unwrap().1,
            Outcome::Vector(Vector::new(0.0, 0.0, 1.0))
        );
        assert_eq!(
            run("[[4,5,6],[1,2,3],'subtract']").unwrap().1,
            Outcome::Vector(Vector::new(3.0, 3.0, 3.0))
        );
        assert_eq!(
            run("[[1,2,3],'vector']").unwrap().1,
            Outcome::Vector(Vector::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_dispatch_scalar_results() {
        match run("[[3,4],'magnitude']").unwrap().1 {
            Outcome::Scalar(s) => assert_relative_eq!(s, 5.0),
            other => panic!("unexpected outcome {:?}", other),
        }
        match run("[[1,2,3],[4,5,6],'dot_product']").unwrap().1 {
            Outcome::Scalar(s) => assert_relative_eq!(s, 32.0),
            other => panic!("unexpected outcome {:?}", other),
        }
        match run("[[1,0,0],[0,2,0],'angle']").unwrap().1 {
            Outcome::Angle(rad) => assert_relative_eq!(rad, std::f64::consts::FRAC_PI_2),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_scalar_multiplication() {
        assert_eq!(
            run("[[1,2,3],2,'scalar_multiplication']").unwrap().1,
            Outcome::Vector(Vector::new(2.0, 4.0, 6.0))
        );
        assert_eq!(
            run("[-1,[1,2],'scalar_multiplication']").unwrap().1,
            Outcome::Vector(Vector::new(-1.0, -2.0, 0.0))
        );
        assert!(matches!(
            run("[[1,2,3],[4,5,6],'scalar_multiplication']"),
            Err(GeoError::Parse(_))
        ));
        assert!(matches!(run("[2,3,'scalar_multiplication']"), Err(GeoError::Parse(_))));
    }

    #[test]
    fn test_dispatch_arity_errors() {
        let err = run("[[1,2,3],'addition']").unwrap_err();
        assert_eq!(
            err,
            GeoError::Arity {
                operation: "addition".into(),
                expected: Arity::Exactly(2),
                found: 1,
            }
        );
        assert!(matches!(run("[[1,2,3],[1,2,3],'magnitude']"), Err(GeoError::Arity { .. })));
        assert!(matches!(run("['vectors']"), Err(GeoError::Arity { .. })));
        assert!(matches!(run("[[1,2,3],'scalar_multiplication']"), Err(GeoError::Arity { .. })));
    }

    #[test]
    fn test_dispatch_degenerate_and_unsupported() {
        assert!(matches!(
            run("[[0,0,0],'unit_vector']"),
            Err(GeoError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            run("[[1,2,3],[0,0],'projection_vector']"),
            Err(GeoError::DegenerateGeometry(_))
        ));
        assert_eq!(
            run("[[1,2,3],[4,5,6],'bogus_op']").unwrap_err(),
            GeoError::UnsupportedOperation("bogus_op".into())
        );
    }

    #[test]
    fn test_dispatch_extreme_magnitudes() {
        match run("[[1e200,0,0],[1e200,1e200,0],'angle']").unwrap().1 {
            Outcome::Angle(rad) => {
                assert_relative_eq!(rad, std::f64::consts::FRAC_PI_4, epsilon = 1e-12)
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(
            run("[[1e200,0,0],'unit_vector']").unwrap().1,
            Outcome::Vector(Vector::new(1.0, 0.0, 0.0))
        );
        assert_eq!(
            run("[[1e-200,0,0],'unit_vector']").unwrap().1,
            Outcome::Vector(Vector::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_dispatch_rejects_non_finite_results() {
        assert!(matches!(
            run("[[1e308,0,0],[1e308,0,0],'addition']"),
            Err(GeoError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            run("[[1e200,1e200,1e200],[1e200,1e200,1e200],'dot_product']"),
            Err(GeoError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            run("[[1e300,0,0],1e300,'scalar_multiplication']"),
            Err(GeoError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_dispatch_rejects_scalars_in_vector_operations() {
        let request = Request {
            tag: "addition".into(),
            operands: vec![Operand::Vector(Vector::zero()), Operand::Scalar(1.0)],
        };
        assert!(matches!(dispatch(&request), Err(GeoError::Parse(_))));
    }
}
