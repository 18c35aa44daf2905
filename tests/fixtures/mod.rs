//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data including:
//! - Real Stockholm sights with typical opening hours
//! - Builders and providers shared by the integration tests

#![allow(dead_code)]

pub mod stockholm_locations;

#[allow(unused_imports)]
pub use stockholm_locations::*;

use itinerary_planner::error::MatrixUnavailable;
use itinerary_planner::matrix::{DurationMatrix, MatrixCell, MatrixSource};
use itinerary_planner::{DistanceMatrixProvider, OptimizationResult, Place, TravelMode};

/// Provider that is always down.
pub struct OfflineMatrix;

impl DistanceMatrixProvider for OfflineMatrix {
    fn matrix_for(
        &self,
        _locations: &[(f64, f64)],
        _mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        Err(MatrixUnavailable::Offline)
    }
}

/// Manhattan distance matrix (simple, predictable).
///
/// One degree of latitude or longitude is one minute of travel and 1 km.
pub struct ManhattanMatrix;

impl DistanceMatrixProvider for ManhattanMatrix {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        _mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        let locations = locations.to_vec();
        Ok(DurationMatrix::from_fn(
            locations.len(),
            MatrixSource::Provider,
            |i, j| {
                let (from, to) = (locations[i], locations[j]);
                let units = (from.0 - to.0).abs() + (from.1 - to.1).abs();
                MatrixCell::new((units * 60.0).round() as u32, (units * 1000.0).round() as u32)
            },
        ))
    }
}

/// Place at `x` on the latitude axis with a one-hour visit.
pub fn place_at(id: &str, x: f64) -> Place {
    Place::new(id, id.to_uppercase(), x, 0.0).with_visit_duration(60)
}

pub fn ids(result: &OptimizationResult) -> Vec<&str> {
    result
        .optimized_places
        .iter()
        .map(|entry| entry.place.id.as_str())
        .collect()
}

/// Check the structural invariants every result must satisfy.
pub fn assert_well_formed(result: &OptimizationResult, input: &[Place]) {
    assert!(result.optimized_places.len() <= input.len());

    for (position, entry) in result.optimized_places.iter().enumerate() {
        assert_eq!(entry.order, position + 1, "orders must be 1..N");
        assert!(
            input.iter().any(|place| *place == entry.place),
            "{} is not an input place",
            entry.place.id
        );
        assert_eq!(
            entry.scheduled_departure_minutes,
            entry.scheduled_arrival_minutes + entry.place.visit_duration()
        );
        assert_eq!(entry.travel_from_previous.is_none(), position == 0);
    }

    for pair in result.optimized_places.windows(2) {
        assert!(
            pair[1].scheduled_arrival_minutes >= pair[0].scheduled_departure_minutes,
            "{} overlaps {}",
            pair[1].place.id,
            pair[0].place.id
        );
    }

    let visits: u32 = result
        .optimized_places
        .iter()
        .map(|entry| entry.place.visit_duration())
        .sum();
    assert_eq!(result.total_visit_time_minutes, visits);
}
