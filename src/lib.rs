//! geocalc: vector and plane algebra behind a typed request pipeline.
//!
//! A request is a textual list literal such as `[[1,2,3],[4,5,6],"addition"]`.
//! It is decoded by [`request`], resolved to an [`Operation`] and executed by
//! [`dispatch`], and always comes back as a [`ResultRecord`].

pub mod precision;
pub mod geom;
pub mod request;
pub mod dispatch;
pub mod record;

// Re-exports for convenience
pub use geom::{Vector, Point, Plane};
pub use request::{parse_request, Operand, Request};
pub use dispatch::{dispatch, Arity, Operation, Outcome};
pub use record::{
    evaluate, evaluate_batch, plane_report, PlaneQuery, PlaneReport, RecordResult, ResultRecord,
};

/// Result type for geocalc operations
pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Arity error: operation '{operation}' expects {expected} operand(s), got {found}")]
    Arity {
        operation: String,
        expected: Arity,
        found: usize,
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Unsupported operation: '{0}'")]
    UnsupportedOperation(String),
}

impl GeoError {
    /// Stable lowercase name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GeoError::Parse(_) => "parse",
            GeoError::Arity { .. } => "arity",
            GeoError::DegenerateGeometry(_) => "degenerate_geometry",
            GeoError::UnsupportedOperation(_) => "unsupported_operation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(GeoError::Parse("x".into()).kind(), "parse");
        assert_eq!(GeoError::DegenerateGeometry("x".into()).kind(), "degenerate_geometry");
        assert_eq!(GeoError::UnsupportedOperation("x".into()).kind(), "unsupported_operation");
    }

    #[test]
    fn test_arity_message_names_expected_count() {
        let err = GeoError::Arity {
            operation: "addition".into(),
            expected: Arity::Exactly(2),
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Arity error: operation 'addition' expects 2 operand(s), got 1"
        );
    }
}
