//! Advisory insights shown alongside an optimized itinerary.

use crate::clock::format_time;
use crate::model::{Insight, InsightKind, PacingPolicy};
use crate::schedule::{Schedule, LATE_DAY_MINUTES};

/// What the optimizer learned while building a schedule.
#[derive(Debug, Clone)]
pub struct InsightContext<'a> {
    pub schedule: &'a Schedule,
    pub pacing: PacingPolicy,
    /// Places the caller asked for.
    pub requested: usize,
    /// Places removed by the opening-hours filter.
    pub skipped: usize,
    /// Travel seconds saved relative to the caller's order.
    pub travel_saved_seconds: u64,
    /// Travel times were estimated from straight-line distance.
    pub estimated_travel: bool,
}

pub fn generate_insights(ctx: &InsightContext<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    let saved_minutes = ctx.travel_saved_seconds / 60;
    if saved_minutes > 0 {
        insights.push(Insight::new(
            InsightKind::Efficiency,
            "Shorter route",
            format!(
                "The optimized order saves about {} min of travel compared to your original order.",
                saved_minutes
            ),
        ));
    }

    if ctx.skipped > 0 {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Places skipped",
            format!(
                "{} of {} places could not fit within their opening hours.",
                ctx.skipped, ctx.requested
            ),
        ));
    }

    if ctx.estimated_travel {
        insights.push(Insight::new(
            InsightKind::Info,
            "Estimated travel times",
            "Travel times are estimated from straight-line distance and may be optimistic.",
        ));
    }

    if ctx.schedule.end_minutes > LATE_DAY_MINUTES {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Long day",
            format!(
                "The itinerary ends at {}. Consider moving a place to another day.",
                ctx.schedule.end_time()
            ),
        ));
    }

    insights.push(Insight::new(
        InsightKind::Info,
        pacing_title(ctx.pacing),
        format!(
            "{} pacing adds {} min between stops. Day runs {} to {}.",
            capitalize(ctx.pacing.as_str()),
            ctx.pacing.buffer_minutes(),
            format_time(ctx.schedule.start_minutes),
            ctx.schedule.end_time()
        ),
    ));

    if ctx.skipped == 0 && ctx.schedule.warnings.is_empty() && !ctx.schedule.entries.is_empty() {
        insights.push(Insight::new(
            InsightKind::Success,
            "Everything fits",
            format!("All {} places fit into the day.", ctx.schedule.entries.len()),
        ));
    }

    insights
}

fn pacing_title(pacing: PacingPolicy) -> &'static str {
    match pacing {
        PacingPolicy::Tight => "Packed schedule",
        PacingPolicy::Balanced => "Balanced schedule",
        PacingPolicy::Relaxed => "Relaxed schedule",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
