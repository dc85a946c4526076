//! Request parsing.
//!
//! A request is a list literal whose final element, if it is a string, names
//! the operation. Every other element is an operand: a coordinate list of 2
//! or 3 numbers, or (for `scalar_multiplication` only) a bare number.
//!
//! ```
//! use geocalc::{parse_request, Operand, Vector};
//!
//! let request = parse_request("[[1, 2], [3, 4, 5], 'Addition']").unwrap();
//! assert_eq!(request.tag, "addition");
//! assert_eq!(request.operands[0], Operand::Vector(Vector::new(1.0, 2.0, 0.0)));
//! ```

pub mod literal;

use std::fmt;

use tracing::debug;

pub use literal::Literal;

use crate::dispatch::Operation;
use crate::geom::Vector;
use crate::{GeoError, Result};

/// Tag used when a request carries only coordinate lists.
pub const DEFAULT_TAG: &str = "vectors";

/// A typed request operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Vector(Vector),
    Scalar(f64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, f.precision()) {
            (Operand::Vector(v), _) => fmt::Display::fmt(v, f),
            (Operand::Scalar(s), Some(p)) => write!(f, "{:.*}", p, s),
            (Operand::Scalar(s), None) => write!(f, "{}", s),
        }
    }
}

/// A decoded request whose operands have not been shape-checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    tag: String,
    elements: Vec<Literal>,
}

impl RawRequest {
    /// Decodes the text and splits off the operation tag.
    pub fn decode(source: &str) -> Result<Self> {
        let items = match literal::decode(source)? {
            Literal::List(items) => items,
            other => {
                return Err(GeoError::Parse(format!(
                    "request must be a list, got a {}",
                    other.kind()
                )))
            }
        };
        Self::from_items(items)
    }

    fn from_items(mut items: Vec<Literal>) -> Result<Self> {
        if items.is_empty() {
            return Err(GeoError::Parse("request list is empty".into()));
        }

        let trailing_tag = match items.last() {
            Some(Literal::Str(tag)) => Some(tag.trim().to_lowercase()),
            _ => None,
        };
        let tag = match trailing_tag {
            Some(tag) => {
                items.pop();
                tag
            }
            None if items.iter().all(is_coordinate_list) => DEFAULT_TAG.to_string(),
            None => {
                return Err(GeoError::Parse(
                    "request has no operation tag and is not a list of coordinate lists".into(),
                ))
            }
        };

        if items.iter().any(|item| matches!(item, Literal::Str(_))) {
            return Err(GeoError::Parse(
                "the operation tag must be the final element of the request".into(),
            ));
        }

        Ok(Self { tag, elements: items })
    }

    /// The lowercase operation tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Checks every operand's shape and lifts 2D coordinates to 3D.
    pub fn into_request(self) -> Result<Request> {
        let allow_scalar =
            self.tag == Operation::ScalarMultiplication.tag() && self.elements.len() == 2;

        let operands = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| operand(index, element, allow_scalar))
            .collect::<Result<Vec<_>>>()?;

        Ok(Request { tag: self.tag, operands })
    }
}

fn is_coordinate_list(literal: &Literal) -> bool {
    match literal {
        Literal::List(items) => {
            matches!(items.len(), 2 | 3) && items.iter().all(|i| matches!(i, Literal::Number(_)))
        }
        _ => false,
    }
}

fn operand(index: usize, literal: &Literal, allow_scalar: bool) -> Result<Operand> {
    match literal {
        Literal::Number(n) if allow_scalar => Ok(Operand::Scalar(*n)),
        Literal::Number(n) => Err(GeoError::Parse(format!(
            "operand {} is a bare number ({}); bare numbers are only accepted by {} with two operands",
            index + 1,
            n,
            Operation::ScalarMultiplication.tag()
        ))),
        Literal::List(items) => {
            let coords = items
                .iter()
                .map(|item| match item {
                    Literal::Number(n) => Ok(*n),
                    other => Err(GeoError::Parse(format!(
                        "operand {} contains a {} where a coordinate was expected",
                        index + 1,
                        other.kind()
                    ))),
                })
                .collect::<Result<Vec<f64>>>()?;
            Vector::from_coords(&coords)
                .map(Operand::Vector)
                .map_err(|e| match e {
                    GeoError::Parse(msg) => GeoError::Parse(format!("operand {}: {}", index + 1, msg)),
                    other => other,
                })
        }
        Literal::Str(_) => Err(GeoError::Parse(format!(
            "operand {} is a string; only the final element may be one",
            index + 1
        ))),
    }
}

/// A parsed request: lowercase tag plus typed operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub tag: String,
    pub operands: Vec<Operand>,
}

impl Request {
    /// Coordinates of every vector operand, in order, for echoing back.
    pub fn input_vectors(&self) -> Vec<[f64; 3]> {
        self.operands
            .iter()
            .filter_map(|operand| match operand {
                Operand::Vector(v) => Some(v.to_array()),
                Operand::Scalar(_) => None,
            })
            .collect()
    }
}

/// Parses request text into a [`Request`].
pub fn parse_request(source: &str) -> Result<Request> {
    let request = RawRequest::decode(source)?.into_request()?;
    debug!(tag = %request.tag, operands = request.operands.len(), "parsed request");
    Ok(request)
}
