//! Visiting-order construction (nearest neighbor) and improvement (2-opt).
//!
//! Both operate on borrowed places and address the matrix through a
//! [`PlaceIndex`], so reordering never disturbs the lookups.

use tracing::debug;

use crate::error::{PlanError, PlanResult};
use crate::matrix::{DurationMatrix, PlaceIndex};
use crate::model::Place;

/// Default number of 2-opt passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Total travel seconds along `route`.
pub fn route_duration(
    route: &[&Place],
    matrix: &DurationMatrix,
    index: &PlaceIndex,
) -> PlanResult<u64> {
    route.windows(2).try_fold(0u64, |total, pair| {
        let cell = index.cell(matrix, pair[0], pair[1])?;
        Ok(total + u64::from(cell.duration_seconds))
    })
}

/// Greedy nearest-neighbor order starting from the first place.
///
/// Ties go to the lowest input position. Two places or fewer are returned
/// in input order.
pub fn nearest_neighbor<'a>(
    places: &'a [Place],
    matrix: &DurationMatrix,
    index: &PlaceIndex,
) -> PlanResult<Vec<&'a Place>> {
    if places.len() <= 2 {
        return Ok(places.iter().collect());
    }

    let mut visited = vec![false; places.len()];
    let mut route = Vec::with_capacity(places.len());
    let mut current = 0;
    visited[current] = true;
    route.push(&places[current]);

    while route.len() < places.len() {
        let mut nearest: Option<(usize, u32)> = None;

        for (candidate, place) in places.iter().enumerate() {
            if visited[candidate] {
                continue;
            }
            let duration = index.cell(matrix, &places[current], place)?.duration_seconds;
            if nearest.is_none_or(|(_, best)| duration < best) {
                nearest = Some((candidate, duration));
            }
        }

        let (next, _) = nearest.ok_or(PlanError::MatrixSizeMismatch {
            matrix: matrix.len(),
            places: places.len(),
        })?;
        visited[next] = true;
        route.push(&places[next]);
        current = next;
    }

    debug!(
        route = ?route.iter().map(|place| place.id.as_str()).collect::<Vec<_>>(),
        "nearest neighbor route"
    );
    Ok(route)
}

/// 2-opt: reverse inner segments while that shortens the route.
///
/// The first and last stops stay fixed. Each pass accepts the first
/// strictly improving reversal and starts over; a pass without one ends
/// the search. At most `max_iterations` passes run. Routes shorter than
/// four stops are returned unchanged.
pub fn two_opt<'a>(
    route: Vec<&'a Place>,
    matrix: &DurationMatrix,
    index: &PlaceIndex,
    max_iterations: usize,
) -> PlanResult<Vec<&'a Place>> {
    let n = route.len();
    if n < 4 {
        return Ok(route);
    }

    let mut current = route;
    let mut best = route_duration(&current, matrix, index)?;
    let initial = best;
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let mut improved = false;

        'scan: for i in 1..n - 2 {
            for j in i + 1..n - 1 {
                let mut candidate = current.clone();
                candidate[i..=j].reverse();
                // Full recompute: reversal flips leg direction, which matters
                // for asymmetric matrices.
                let cost = route_duration(&candidate, matrix, index)?;
                if cost < best {
                    current = candidate;
                    best = cost;
                    improved = true;
                    break 'scan;
                }
            }
        }

        if !improved {
            break;
        }
    }

    debug!(iterations, initial, best, "2-opt finished");
    Ok(current)
}
