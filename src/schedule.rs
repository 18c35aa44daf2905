//! Authoritative itinerary timing.
//!
//! The clock starts at the requested start time and is not wrapped at
//! midnight, so departure = arrival + visit and stops never overlap even
//! for overlong days. Display strings wrap. Clock additions saturate at
//! `u32::MAX`.

use tracing::debug;

use crate::clock::{format_duration, format_time};
use crate::error::{PlanError, PlanResult};
use crate::matrix::{DurationMatrix, MatrixCell, PlaceIndex};
use crate::model::{PacingPolicy, Place, ScheduleEntry};
use crate::traits::OpeningHoursOracle;

/// Departures after this time (20:00) are flagged.
pub const LATE_DAY_MINUTES: u32 = 20 * 60;

/// Timing for a route, ready to be assembled into a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub total_time_minutes: u32,
    pub total_travel_time_minutes: u32,
    pub total_visit_time_minutes: u32,
    pub buffer_minutes: u32,
    pub warnings: Vec<String>,
}

impl Schedule {
    pub fn start_time(&self) -> String {
        format_time(self.start_minutes)
    }

    pub fn end_time(&self) -> String {
        format_time(self.end_minutes)
    }

    pub fn total_time_text(&self) -> String {
        format_duration(self.total_time_minutes)
    }

    pub fn total_travel_time_text(&self) -> String {
        format_duration(self.total_travel_time_minutes)
    }

    pub fn total_visit_time_text(&self) -> String {
        format_duration(self.total_visit_time_minutes)
    }
}

/// Source of travel legs between consecutive stops.
pub trait LegSource {
    type Error;

    fn leg(&self, from: &Place, to: &Place) -> Result<MatrixCell, Self::Error>;
}

/// Legs read from a matrix through the place index.
pub struct MatrixLegs<'m> {
    pub matrix: &'m DurationMatrix,
    pub index: &'m PlaceIndex,
}

impl LegSource for MatrixLegs<'_> {
    type Error = PlanError;

    fn leg(&self, from: &Place, to: &Place) -> PlanResult<MatrixCell> {
        self.index.cell(self.matrix, from, to).cloned()
    }
}

/// Schedule builder inputs other than the route itself.
pub struct ScheduleParams<'o, O: ?Sized> {
    pub start_minutes: u32,
    pub pacing: PacingPolicy,
    /// Opening windows to warn about; `None` skips those warnings.
    pub oracle: Option<&'o O>,
}

/// Build the itinerary for `route` in order.
///
/// Every stop after the first adds its travel minutes (rounded up) plus the
/// pacing buffer before arrival.
pub fn build_schedule<L, O>(
    route: &[&Place],
    legs: &L,
    params: &ScheduleParams<'_, O>,
) -> Result<Schedule, L::Error>
where
    L: LegSource + ?Sized,
    O: OpeningHoursOracle + ?Sized,
{
    let buffer = params.pacing.buffer_minutes();
    let mut current = params.start_minutes;
    let mut entries = Vec::with_capacity(route.len());
    let mut warnings = Vec::new();
    let mut travel_total: u32 = 0;

    for (position, place) in route.iter().enumerate() {
        let travel = match position {
            0 => None,
            _ => {
                let leg = legs.leg(route[position - 1], place)?;
                let minutes = leg.duration_minutes();
                travel_total = travel_total.saturating_add(minutes);
                current = current.saturating_add(minutes).saturating_add(buffer);
                Some(leg.to_leg())
            }
        };

        let arrival = current;
        let departure = arrival.saturating_add(place.visit_duration());
        current = departure;

        warnings.extend(stop_warnings(place, arrival, departure, params.oracle));

        entries.push(ScheduleEntry {
            place: (*place).clone(),
            order: position + 1,
            scheduled_arrival_minutes: arrival,
            scheduled_departure_minutes: departure,
            arrival_time: format_time(arrival),
            departure_time: format_time(departure),
            travel_from_previous: travel,
        });
    }

    let end = entries
        .last()
        .map(|entry| entry.scheduled_departure_minutes)
        .unwrap_or(params.start_minutes);
    let visit_total = entries
        .iter()
        .fold(0u32, |total, entry| total.saturating_add(entry.place.visit_duration()));

    debug!(
        stops = entries.len(),
        travel_minutes = travel_total,
        end = %format_time(end),
        "schedule built"
    );

    Ok(Schedule {
        entries,
        start_minutes: params.start_minutes,
        end_minutes: end,
        total_time_minutes: end - params.start_minutes,
        total_travel_time_minutes: travel_total,
        total_visit_time_minutes: visit_total,
        buffer_minutes: buffer,
        warnings,
    })
}

/// Schedule for a lone place: arrive at the start time, no travel.
pub fn single_place_schedule<O>(place: &Place, params: &ScheduleParams<'_, O>) -> Schedule
where
    O: OpeningHoursOracle + ?Sized,
{
    let arrival = params.start_minutes;
    let departure = arrival.saturating_add(place.visit_duration());

    Schedule {
        entries: vec![ScheduleEntry {
            place: place.clone(),
            order: 1,
            scheduled_arrival_minutes: arrival,
            scheduled_departure_minutes: departure,
            arrival_time: format_time(arrival),
            departure_time: format_time(departure),
            travel_from_previous: None,
        }],
        start_minutes: arrival,
        end_minutes: departure,
        total_time_minutes: departure - arrival,
        total_travel_time_minutes: 0,
        total_visit_time_minutes: place.visit_duration(),
        buffer_minutes: params.pacing.buffer_minutes(),
        warnings: stop_warnings(place, arrival, departure, params.oracle),
    }
}

fn stop_warnings<O>(place: &Place, arrival: u32, departure: u32, oracle: Option<&O>) -> Vec<String>
where
    O: OpeningHoursOracle + ?Sized,
{
    let mut warnings = Vec::new();

    if let Some(window) = oracle.and_then(|oracle| oracle.window_for(place)) {
        if arrival < window.open_minutes {
            warnings.push(format!(
                "{}: arrives at {}, before opening at {}",
                place.name,
                format_time(arrival),
                format_time(window.open_minutes)
            ));
        }
        if departure > window.close_minutes {
            warnings.push(format!(
                "{}: leaves at {}, after closing at {}",
                place.name,
                format_time(departure),
                format_time(window.close_minutes)
            ));
        }
    }

    if departure > LATE_DAY_MINUTES {
        warnings.push(format!(
            "{}: visit ends at {}, late in the day",
            place.name,
            format_time(departure)
        ));
    }

    warnings
}
