//! Error types for the planner.
//!
//! None of these reach callers of [`crate::optimizer::RouteOptimizer::optimize_route`];
//! the optimizer degrades to the radial fallback instead.

use thiserror::Error;

/// The distance/duration matrix could not be obtained.
#[derive(Debug, Error)]
pub enum MatrixUnavailable {
    /// Transport-level failure, including client timeouts.
    #[error("matrix request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered but refused the request.
    #[error("matrix service returned code {code}: {message}")]
    Service { code: String, message: String },

    /// The response did not describe an N x N matrix.
    #[error("matrix has shape {rows}x{cols}, expected {expected}x{expected}")]
    Shape {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    /// Provider configured to never answer (tests, offline mode).
    #[error("matrix provider is offline")]
    Offline,
}

/// Failure inside the optimization pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Matrix(#[from] MatrixUnavailable),

    #[error("duplicate place id {0:?}")]
    DuplicatePlaceId(String),

    #[error("place {0:?} is not part of the distance matrix")]
    UnknownPlace(String),

    #[error("matrix covers {matrix} places but {places} were requested")]
    MatrixSizeMismatch { matrix: usize, places: usize },
}

/// A clock string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time {input:?}, expected e.g. \"9:00 AM\"")]
pub struct ParseTimeError {
    pub input: String,
}

pub type PlanResult<T> = Result<T, PlanError>;
