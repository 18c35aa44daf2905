//! Haversine distance matrix provider (fallback when the routing service is unavailable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than a routing service (ignores streets) but always available.

use rayon::prelude::*;
use tracing::warn;

use crate::error::MatrixUnavailable;
use crate::matrix::{DurationMatrix, MatrixCell, MatrixSource};
use crate::model::{Coordinate, TravelMode};
use crate::traits::DistanceMatrixProvider;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Pedestrian speed assumption, about 5 km/h.
pub const WALKING_SPEED_MPS: f64 = 1.4;
pub const BICYCLING_SPEED_MPS: f64 = 4.2;
pub const DRIVING_SPEED_MPS: f64 = 11.1;
pub const TRANSIT_SPEED_MPS: f64 = 8.3;

/// Adjacent places are never modeled as closer than this.
pub const MIN_LEG_SECONDS: u32 = 300;

/// Great-circle distance between two (lat, lng) points in meters.
pub fn haversine_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Arithmetic mean of the coordinates, or `None` for an empty slice.
pub fn centroid(coordinates: &[Coordinate]) -> Option<Coordinate> {
    if coordinates.is_empty() {
        return None;
    }
    let n = coordinates.len() as f64;
    let (lat, lng) = coordinates
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.latitude, lng + c.longitude));
    Some(Coordinate::new(lat / n, lng / n))
}

/// Haversine-based distance matrix provider.
///
/// Estimates travel time using straight-line distance and an assumed speed.
/// Without an explicit speed, the speed follows the travel mode.
#[derive(Debug, Clone, Default)]
pub struct HaversineMatrix {
    /// Fixed speed in m/s overriding the per-mode table.
    pub speed_mps: Option<f64>,
}

impl HaversineMatrix {
    pub fn new(speed_mps: f64) -> Self {
        Self {
            speed_mps: Some(speed_mps),
        }
    }

    pub fn speed_for(&self, mode: TravelMode) -> f64 {
        self.speed_mps.unwrap_or(match mode {
            TravelMode::Walking => WALKING_SPEED_MPS,
            TravelMode::Bicycling => BICYCLING_SPEED_MPS,
            TravelMode::Driving => DRIVING_SPEED_MPS,
            TravelMode::Transit => TRANSIT_SPEED_MPS,
        })
    }

    /// Convert a distance to travel seconds, floored at [`MIN_LEG_SECONDS`].
    fn meters_to_seconds(meters: f64, speed_mps: f64) -> u32 {
        let seconds = (meters / speed_mps).round() as u32;
        seconds.max(MIN_LEG_SECONDS)
    }

    /// Estimated leg between two points.
    pub fn leg(&self, from: (f64, f64), to: (f64, f64), mode: TravelMode) -> MatrixCell {
        let meters = haversine_meters(from, to);
        MatrixCell::new(
            Self::meters_to_seconds(meters, self.speed_for(mode)),
            meters.round() as u32,
        )
    }

    /// Infallible form of [`DistanceMatrixProvider::matrix_for`].
    pub fn estimate(&self, locations: &[(f64, f64)], mode: TravelMode) -> DurationMatrix {
        let rows: Vec<Vec<MatrixCell>> = locations
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, to)| {
                        if i == j {
                            MatrixCell::zero()
                        } else {
                            self.leg(*from, *to, mode)
                        }
                    })
                    .collect()
            })
            .collect();

        DurationMatrix::from_cell_rows(rows, MatrixSource::Estimated)
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        Ok(self.estimate(locations, mode))
    }
}

/// Tries `primary` and substitutes the Haversine estimate when it fails.
#[derive(Debug, Clone)]
pub struct WithHaversineFallback<P> {
    pub primary: P,
    pub fallback: HaversineMatrix,
}

impl<P> WithHaversineFallback<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: HaversineMatrix::default(),
        }
    }
}

impl<P: DistanceMatrixProvider> DistanceMatrixProvider for WithHaversineFallback<P> {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        match self.primary.matrix_for(locations, mode) {
            Ok(matrix) => Ok(matrix),
            Err(err) => {
                warn!(error = %err, "distance matrix unavailable, estimating from straight-line distance");
                Ok(self.fallback.estimate(locations, mode))
            }
        }
    }
}
