//! Route optimization orchestrator.
//!
//! Runs matrix retrieval, nearest-neighbor construction, 2-opt, the
//! opening-hours filter and scheduling in sequence. Any failure along the
//! way switches to the radial fallback, so callers always get a result.

use std::convert::Infallible;

use tracing::{debug, info, warn};

use crate::error::{PlanError, PlanResult};
use crate::feasibility::filter_by_opening_hours;
use crate::haversine::{centroid, haversine_meters};
use crate::insights::{generate_insights, InsightContext};
use crate::matrix::{MatrixCell, MatrixSource, PlaceIndex, FALLBACK_LEG_SECONDS};
use crate::model::{
    Algorithm, Coordinate, Insight, InsightKind, OptimizationResult, PacingPolicy, Place,
    TravelMode,
};
use crate::opening_hours::PlaceWindows;
use crate::schedule::{
    build_schedule, single_place_schedule, LegSource, MatrixLegs, Schedule, ScheduleParams,
};
use crate::solver::{nearest_neighbor, route_duration, two_opt, DEFAULT_MAX_ITERATIONS};
use crate::traits::{DistanceMatrixProvider, OpeningHoursOracle};

/// 10:00 AM.
pub const DEFAULT_START_MINUTES: u32 = 10 * 60;

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Day start in minutes since midnight.
    pub start_time_minutes: u32,
    pub schedule_type: PacingPolicy,
    pub consider_opening_hours: bool,
    /// Upper bound on 2-opt passes.
    pub max_iterations: usize,
    pub travel_mode: TravelMode,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            start_time_minutes: DEFAULT_START_MINUTES,
            schedule_type: PacingPolicy::default(),
            consider_opening_hours: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            travel_mode: TravelMode::default(),
        }
    }
}

/// Pipeline stage, reported when a stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingMatrix,
    Constructing,
    Improving,
    Filtering,
    Scheduling,
}

type StageResult<T> = Result<T, (Stage, PlanError)>;

fn at<T>(stage: Stage, result: PlanResult<T>) -> StageResult<T> {
    result.map_err(|err| (stage, err))
}

/// Plans a day's visiting order over a distance matrix provider.
///
/// Holds no per-call state; one optimizer can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct RouteOptimizer<M, O = PlaceWindows> {
    provider: M,
    oracle: O,
}

impl<M> RouteOptimizer<M, PlaceWindows> {
    pub fn new(provider: M) -> Self {
        Self {
            provider,
            oracle: PlaceWindows,
        }
    }
}

impl<M, O> RouteOptimizer<M, O> {
    /// Swap the opening-hours oracle.
    pub fn with_oracle<P>(self, oracle: P) -> RouteOptimizer<M, P> {
        RouteOptimizer {
            provider: self.provider,
            oracle,
        }
    }

    pub fn provider(&self) -> &M {
        &self.provider
    }
}

impl<M, O> RouteOptimizer<M, O>
where
    M: DistanceMatrixProvider,
    O: OpeningHoursOracle,
{
    /// Order and schedule `places`. Never fails: an empty input yields an
    /// empty result and pipeline failures yield a radial-fallback result.
    pub fn optimize_route(&self, places: &[Place], options: &OptimizeOptions) -> OptimizationResult {
        match places {
            [] => OptimizationResult::empty(options.start_time_minutes, options.schedule_type),
            [place] => self.single_place(place, options),
            _ => {
                info!(
                    places = places.len(),
                    schedule = %options.schedule_type,
                    "optimizing route"
                );
                match self.run_pipeline(places, options) {
                    Ok(result) => result,
                    Err((stage, err)) => {
                        warn!(?stage, error = %err, "route optimization failed, using radial fallback");
                        self.fallback(places, options, &err)
                    }
                }
            }
        }
    }

    fn params(&self, options: &OptimizeOptions) -> ScheduleParams<'_, O> {
        ScheduleParams {
            start_minutes: options.start_time_minutes,
            pacing: options.schedule_type,
            oracle: options.consider_opening_hours.then_some(&self.oracle),
        }
    }

    fn single_place(&self, place: &Place, options: &OptimizeOptions) -> OptimizationResult {
        let schedule = single_place_schedule(place, &self.params(options));
        let insights = generate_insights(&InsightContext {
            schedule: &schedule,
            pacing: options.schedule_type,
            requested: 1,
            skipped: 0,
            travel_saved_seconds: 0,
            estimated_travel: false,
        });
        assemble(schedule, Vec::new(), insights, options, Algorithm::SinglePlace)
    }

    fn run_pipeline(
        &self,
        places: &[Place],
        options: &OptimizeOptions,
    ) -> StageResult<OptimizationResult> {
        let index = at(Stage::FetchingMatrix, PlaceIndex::build(places))?;
        let locations: Vec<(f64, f64)> = places
            .iter()
            .map(|place| place.coordinate.lat_lng())
            .collect();
        let matrix = at(
            Stage::FetchingMatrix,
            self.provider
                .matrix_for(&locations, options.travel_mode)
                .map_err(PlanError::from),
        )?;
        if matrix.len() != places.len() {
            return Err((
                Stage::FetchingMatrix,
                PlanError::MatrixSizeMismatch {
                    matrix: matrix.len(),
                    places: places.len(),
                },
            ));
        }
        debug!(source = ?matrix.source(), "distance matrix ready");

        let initial = at(Stage::Constructing, nearest_neighbor(places, &matrix, &index))?;
        let improved = at(
            Stage::Improving,
            two_opt(initial, &matrix, &index, options.max_iterations),
        )?;

        let input_order: Vec<&Place> = places.iter().collect();
        let travel_saved_seconds = at(
            Stage::Improving,
            route_duration(&input_order, &matrix, &index),
        )?
        .saturating_sub(at(Stage::Improving, route_duration(&improved, &matrix, &index))?);

        // Filter times decide inclusion only; the schedule below recomputes
        // every timestamp with travel and buffers.
        let (route, notes) = if options.consider_opening_hours {
            let outcome = filter_by_opening_hours(improved, options.start_time_minutes, &self.oracle);
            debug!(stage = ?Stage::Filtering, dropped = outcome.dropped.len(), "opening hours applied");
            (outcome.kept, outcome.notes)
        } else {
            (improved, Vec::new())
        };
        let skipped = notes.len();

        let legs = MatrixLegs {
            matrix: &matrix,
            index: &index,
        };
        let schedule = at(Stage::Scheduling, build_schedule(&route, &legs, &self.params(options)))?;

        let insights = generate_insights(&InsightContext {
            schedule: &schedule,
            pacing: options.schedule_type,
            requested: places.len(),
            skipped,
            travel_saved_seconds,
            estimated_travel: matrix.source() == MatrixSource::Estimated,
        });

        info!(
            stops = schedule.entries.len(),
            skipped,
            total_minutes = schedule.total_time_minutes,
            travel_minutes = schedule.total_travel_time_minutes,
            "route optimized"
        );

        Ok(assemble(
            schedule,
            notes,
            insights,
            options,
            Algorithm::NearestNeighborTwoOpt,
        ))
    }

    /// Order by distance from the centroid and schedule with the default
    /// leg. Uses nothing but the places themselves.
    fn fallback(&self, places: &[Place], options: &OptimizeOptions, cause: &PlanError) -> OptimizationResult {
        let coordinates: Vec<Coordinate> = places.iter().map(|place| place.coordinate).collect();
        let center = centroid(&coordinates).unwrap_or(Coordinate::new(0.0, 0.0));

        let mut by_distance: Vec<(f64, &Place)> = places
            .iter()
            .map(|place| (haversine_meters(center.lat_lng(), place.coordinate.lat_lng()), place))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
        let route: Vec<&Place> = by_distance.into_iter().map(|(_, place)| place).collect();

        let warning = format!(
            "Route optimization unavailable ({}); places are ordered by distance from the center",
            cause
        );

        let Ok(schedule) = build_schedule(&route, &RadialLegs, &self.params(options));

        let mut insights = vec![Insight::new(
            InsightKind::Warning,
            "Approximate route",
            format!(
                "Travel data was unavailable, so stops are ordered by distance from the center with {} min of travel between them.",
                FALLBACK_LEG_SECONDS / 60
            ),
        )];
        insights.extend(generate_insights(&InsightContext {
            schedule: &schedule,
            pacing: options.schedule_type,
            requested: places.len(),
            skipped: 0,
            travel_saved_seconds: 0,
            estimated_travel: false,
        }));

        assemble(
            schedule,
            vec![warning],
            insights,
            options,
            Algorithm::RadialFallback,
        )
    }
}

/// Default-duration legs with straight-line distances.
struct RadialLegs;

impl LegSource for RadialLegs {
    type Error = Infallible;

    fn leg(&self, from: &Place, to: &Place) -> Result<MatrixCell, Infallible> {
        let meters = haversine_meters(from.coordinate.lat_lng(), to.coordinate.lat_lng());
        Ok(MatrixCell::new(FALLBACK_LEG_SECONDS, meters.round() as u32))
    }
}

fn assemble(
    schedule: Schedule,
    mut warnings: Vec<String>,
    insights: Vec<Insight>,
    options: &OptimizeOptions,
    algorithm: Algorithm,
) -> OptimizationResult {
    let start_time = schedule.start_time();
    let end_time = schedule.end_time();
    let total_time_text = schedule.total_time_text();
    let total_travel_time_text = schedule.total_travel_time_text();
    let total_visit_time_text = schedule.total_visit_time_text();
    warnings.extend(schedule.warnings);

    OptimizationResult {
        optimized_places: schedule.entries,
        total_time_minutes: schedule.total_time_minutes,
        total_travel_time_minutes: schedule.total_travel_time_minutes,
        total_visit_time_minutes: schedule.total_visit_time_minutes,
        total_time_text,
        total_travel_time_text,
        total_visit_time_text,
        warnings,
        insights,
        schedule_type: options.schedule_type,
        start_time,
        end_time,
        buffer_minutes: schedule.buffer_minutes,
        algorithm,
    }
}
