//! Result records.
//!
//! Every request ends as a [`ResultRecord`], whether it succeeded or not.
//! A record holds at most one computed value, and an error record holds
//! none. Consumers only need to check [`ResultRecord::error_message`].

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, warn};

use crate::dispatch::{dispatch, Operation, Outcome};
use crate::geom::{Plane, Point};
use crate::request::{RawRequest, Request};
use crate::GeoError;

/// Operation name reported when a request fails before its tag is known.
pub const UNKNOWN_OPERATION: &str = "unknown";

/// Decimal places for vectors and scalars in display messages.
pub const DISPLAY_DECIMALS: usize = 3;

/// Decimal places for plane angles in display messages.
pub const PLANE_ANGLE_DECIMALS: usize = 2;

/// What a record carries besides its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordResult {
    Vector([f64; 3]),
    Scalar(f64),
    /// Display-only success with nothing computed.
    Empty,
    Error(String),
}

/// Uniform outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    operation_name: String,
    input_vectors_coords: Vec<[f64; 3]>,
    display_message: String,
    result: RecordResult,
}

impl ResultRecord {
    /// Builds a success record from a dispatched outcome.
    pub fn success(operation: Operation, request: &Request, outcome: Outcome) -> Self {
        let display_message = describe(operation, request, &outcome);
        let result = match outcome {
            Outcome::Vector(v) => RecordResult::Vector(v.to_array()),
            Outcome::Scalar(s) => RecordResult::Scalar(s),
            Outcome::Angle(radians) => RecordResult::Scalar(radians.to_degrees()),
            Outcome::Display => RecordResult::Empty,
        };
        Self {
            operation_name: operation.tag().to_string(),
            input_vectors_coords: request.input_vectors(),
            display_message,
            result,
        }
    }

    /// Builds an error record. The message is mirrored into the display message.
    pub fn failure(
        operation_name: impl Into<String>,
        input_vectors_coords: Vec<[f64; 3]>,
        error: &GeoError,
    ) -> Self {
        let message = error.to_string();
        Self {
            operation_name: operation_name.into(),
            input_vectors_coords,
            display_message: message.clone(),
            result: RecordResult::Error(message),
        }
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn input_vectors_coords(&self) -> &[[f64; 3]] {
        &self.input_vectors_coords
    }

    pub fn display_message(&self) -> &str {
        &self.display_message
    }

    pub fn result(&self) -> &RecordResult {
        &self.result
    }

    pub fn result_vector_coords(&self) -> Option<[f64; 3]> {
        match self.result {
            RecordResult::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn scalar_result(&self) -> Option<f64> {
        match self.result {
            RecordResult::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            RecordResult::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.result, RecordResult::Error(_))
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultRecord", 6)?;
        state.serialize_field("operation_name", &self.operation_name)?;
        state.serialize_field("input_vectors_coords", &self.input_vectors_coords)?;
        state.serialize_field("result_vector_coords", &self.result_vector_coords())?;
        state.serialize_field("scalar_result", &self.scalar_result())?;
        state.serialize_field("display_message", &self.display_message)?;
        state.serialize_field("error_message", &self.error_message())?;
        state.end()
    }
}

fn describe(operation: Operation, request: &Request, outcome: &Outcome) -> String {
    const P: usize = DISPLAY_DECIMALS;
    let shown: Vec<String> = request
        .operands
        .iter()
        .map(|operand| format!("{:.*}", P, operand))
        .collect();
    let arg = |i: usize| shown.get(i).map(String::as_str).unwrap_or("");
    let value = match outcome {
        Outcome::Vector(v) => format!("{:.*}", P, v),
        Outcome::Scalar(s) => format!("{:.*}", P, s),
        Outcome::Angle(radians) => format!("{:.*}°", P, radians.to_degrees()),
        Outcome::Display => String::new(),
    };

    match operation {
        Operation::Vector => format!("Vector: {}", value),
        Operation::Vectors => format!("Vectors: {}", shown.join(", ")),
        Operation::Magnitude => format!("Magnitude of {} = {}", arg(0), value),
        Operation::UnitVector => format!("Unit vector of {} = {}", arg(0), value),
        Operation::Addition => format!("{} + {} = {}", arg(0), arg(1), value),
        Operation::Subtract => format!("{} - {} = {}", arg(0), arg(1), value),
        Operation::DotProduct => format!("{} · {} = {}", arg(0), arg(1), value),
        Operation::CrossProduct => format!("{} × {} = {}", arg(0), arg(1), value),
        Operation::Angle => format!("Angle between {} and {} = {}", arg(0), arg(1), value),
        Operation::LengthOfProj => {
            format!("Length of projection of {} onto {} = {}", arg(0), arg(1), value)
        }
        Operation::ProjectionVector => {
            format!("Projection of {} onto {} = {}", arg(0), arg(1), value)
        }
        Operation::Distance => format!("Distance between {} and {} = {}", arg(0), arg(1), value),
        Operation::ScalarMultiplication => format!("{} × {} = {}", arg(0), arg(1), value),
    }
}

fn log_failure(operation_name: &str, error: &GeoError) {
    match error {
        GeoError::UnsupportedOperation(_) | GeoError::DegenerateGeometry(_) => {
            warn!(operation = operation_name, kind = error.kind(), %error, "request failed")
        }
        _ => debug!(operation = operation_name, kind = error.kind(), %error, "request failed"),
    }
}

/// Parses, dispatches and packages one request. Never fails.
pub fn evaluate(source: &str) -> ResultRecord {
    let raw = match RawRequest::decode(source) {
        Ok(raw) => raw,
        Err(e) => {
            log_failure(UNKNOWN_OPERATION, &e);
            return ResultRecord::failure(UNKNOWN_OPERATION, Vec::new(), &e);
        }
    };
    let tag = raw.tag().to_string();
    let request = match raw.into_request() {
        Ok(request) => request,
        Err(e) => {
            log_failure(&tag, &e);
            return ResultRecord::failure(tag, Vec::new(), &e);
        }
    };
    debug!(tag = %request.tag, operands = request.operands.len(), "parsed request");

    match dispatch(&request) {
        Ok((operation, outcome)) => ResultRecord::success(operation, &request, outcome),
        Err(e) => {
            log_failure(&request.tag, &e);
            ResultRecord::failure(request.tag.as_str(), request.input_vectors(), &e)
        }
    }
}

/// Evaluates independent requests, one record per request, in order.
pub fn evaluate_batch<I, S>(requests: I) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    requests.into_iter().map(|r| evaluate(r.as_ref())).collect()
}

/// A query against a single plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneQuery {
    /// Membership; exact unless a tolerance is given.
    Contains { point: Point, tolerance: Option<f64> },
    DistanceToPoint(Point),
    DistanceFromOrigin,
    AngleWith(Plane),
}

impl PlaneQuery {
    pub fn name(&self) -> &'static str {
        match self {
            PlaneQuery::Contains { .. } => "on_plane",
            PlaneQuery::DistanceToPoint(_) => "distance_from_point",
            PlaneQuery::DistanceFromOrigin => "distance_from_origin",
            PlaneQuery::AngleWith(_) => "angle_planes",
        }
    }
}

/// Outcome of a plane query.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlaneReport {
    pub operation_name: String,
    pub plane: Plane,
    pub on_plane: Option<bool>,
    pub scalar_result: Option<f64>,
    pub display_message: String,
    pub error_message: Option<String>,
}

/// Runs a plane query and packages the answer like a [`ResultRecord`].
pub fn plane_report(plane: Plane, query: PlaneQuery) -> PlaneReport {
    const P: usize = DISPLAY_DECIMALS;
    let mut report = PlaneReport {
        operation_name: query.name().to_string(),
        plane,
        on_plane: None,
        scalar_result: None,
        display_message: String::new(),
        error_message: None,
    };

    let computed = match query {
        PlaneQuery::Contains { point, tolerance } => {
            let inside = match tolerance {
                Some(tol) => plane.contains(&point, tol),
                None => plane.on_plane(point.x, point.y, point.z),
            };
            report.on_plane = Some(inside);
            let message = if inside { "Point lies on plane" } else { "Point does not lie on plane" };
            Ok(message.to_string())
        }
        PlaneQuery::DistanceToPoint(point) => plane.distance_from_point(&point).map(|d| {
            report.scalar_result = Some(d);
            format!("Distance from {} to {} = {:.*}", point, plane, P, d)
        }),
        PlaneQuery::DistanceFromOrigin => plane.distance_from_origin().map(|d| {
            report.scalar_result = Some(d);
            format!("Distance from origin for {} = {:.*}", plane, P, d)
        }),
        PlaneQuery::AngleWith(other) => plane.angle_planes(&other).map(|angle| {
            report.scalar_result = Some(angle);
            format!(
                "Angle between {} and {} = {:.*}°",
                plane, other, PLANE_ANGLE_DECIMALS, angle
            )
        }),
    };

    match computed {
        Ok(message) => report.display_message = message,
        Err(e) => {
            log_failure(query.name(), &e);
            report.display_message = e.to_string();
            report.error_message = Some(e.to_string());
        }
    }
    report
}
