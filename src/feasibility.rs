//! Opening-hours pre-filter.
//!
//! Decides which places stay in the route using a clock that only counts
//! waiting and visit time, never travel or buffers. The times computed
//! here are not shown to anyone; [`crate::schedule`] produces the
//! authoritative timestamps for whatever survives.

use tracing::debug;

use crate::clock::format_time;
use crate::model::Place;
use crate::traits::OpeningHoursOracle;

#[derive(Debug, Clone, Default)]
pub struct FeasibilityOutcome<'a> {
    pub kept: Vec<&'a Place>,
    pub dropped: Vec<&'a Place>,
    /// One note per dropped place.
    pub notes: Vec<String>,
}

/// Walk `route` from `start_time` and drop places that cannot fit inside
/// their opening window. Dropped places do not advance the clock.
pub fn filter_by_opening_hours<'a, O>(
    route: Vec<&'a Place>,
    start_time: u32,
    oracle: &O,
) -> FeasibilityOutcome<'a>
where
    O: OpeningHoursOracle + ?Sized,
{
    let mut outcome = FeasibilityOutcome::default();
    let mut current = start_time;

    for place in route {
        let visit = place.visit_duration();

        let Some(window) = oracle.window_for(place) else {
            outcome.kept.push(place);
            current = current.saturating_add(visit);
            continue;
        };

        if current < window.open_minutes {
            debug!(
                place = %place.id,
                opens = %format_time(window.open_minutes),
                "waiting for opening"
            );
            current = window.open_minutes;
        }

        if window.fits(current, visit) {
            outcome.kept.push(place);
            current = current.saturating_add(visit);
        } else {
            debug!(place = %place.id, at = current, "dropping place outside opening hours");
            outcome.notes.push(format!(
                "{} cannot be visited (closes at {})",
                place.name,
                format_time(window.close_minutes)
            ));
            outcome.dropped.push(place);
        }
    }

    outcome
}
