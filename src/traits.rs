//! Seams between the optimizer and its collaborators.
//!
//! Concrete providers live in [`crate::osrm`], [`crate::haversine`] and
//! [`crate::opening_hours`]; apps may plug in their own.

use crate::error::MatrixUnavailable;
use crate::matrix::DurationMatrix;
use crate::model::{OpeningWindow, Place, TravelMode};

/// Provides a distance/duration matrix for a set of locations.
///
/// The matrix is indexed by the provided location order. Implementations
/// must return a full N x N matrix or fail; partial data is never returned.
pub trait DistanceMatrixProvider {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &T {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        (**self).matrix_for(locations, mode)
    }
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for Box<T> {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        (**self).matrix_for(locations, mode)
    }
}

/// Derives the opening window that constrains a visit, if any.
pub trait OpeningHoursOracle {
    fn window_for(&self, place: &Place) -> Option<OpeningWindow>;
}
