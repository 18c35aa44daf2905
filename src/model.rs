//! Value types flowing in and out of the optimizer.
//!
//! Everything here is created fresh per optimization call. Field names
//! serialize in camelCase so results can be stored as-is by the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock;

/// Visit duration applied when a place does not specify one.
pub const DEFAULT_VISIT_MINUTES: u32 = 60;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// (lat, lng) tuple as consumed by matrix providers.
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Daily opening window in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningWindow {
    pub open_minutes: u32,
    pub close_minutes: u32,
}

impl OpeningWindow {
    pub fn new(open_minutes: u32, close_minutes: u32) -> Self {
        Self {
            open_minutes,
            close_minutes,
        }
    }

    /// Both ends inside the day and the window is non-empty.
    pub fn is_valid(&self) -> bool {
        self.open_minutes < self.close_minutes && self.close_minutes < clock::MINUTES_PER_DAY
    }

    /// Whether `[start, start + duration]` lies inside the window.
    pub fn fits(&self, start: u32, duration: u32) -> bool {
        start >= self.open_minutes
            && start <= self.close_minutes
            && duration <= self.close_minutes - start
    }
}

/// A point of interest to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_window: Option<OpeningWindow>,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: None,
            coordinate: Coordinate::new(latitude, longitude),
            visit_duration_minutes: None,
            opening_window: None,
        }
    }

    pub fn with_visit_duration(mut self, minutes: u32) -> Self {
        self.visit_duration_minutes = Some(minutes);
        self
    }

    pub fn with_opening_window(mut self, open_minutes: u32, close_minutes: u32) -> Self {
        self.opening_window = Some(OpeningWindow::new(open_minutes, close_minutes));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Visit duration in minutes; absent or zero falls back to 60.
    pub fn visit_duration(&self) -> u32 {
        self.visit_duration_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_VISIT_MINUTES)
    }
}

/// Inter-stop pacing. The buffer table is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingPolicy {
    Tight,
    #[default]
    Balanced,
    Relaxed,
}

impl PacingPolicy {
    pub fn buffer_minutes(self) -> u32 {
        match self {
            PacingPolicy::Tight => 10,
            PacingPolicy::Balanced => 20,
            PacingPolicy::Relaxed => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacingPolicy::Tight => "tight",
            PacingPolicy::Balanced => "balanced",
            PacingPolicy::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for PacingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PacingPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "tight" => Ok(PacingPolicy::Tight),
            "balanced" => Ok(PacingPolicy::Balanced),
            "relaxed" => Ok(PacingPolicy::Relaxed),
            other => Err(format!("unknown schedule type {:?}", other)),
        }
    }
}

/// How the traveller moves between places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// OSRM routing profile. OSRM has no transit profile; transit is
    /// approximated by the road network.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TravelMode::Walking => "foot",
            TravelMode::Driving | TravelMode::Transit => "car",
            TravelMode::Bicycling => "bike",
        }
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "none")]
    Empty,
    #[serde(rename = "single-place")]
    SinglePlace,
    #[serde(rename = "nearest-neighbor + 2-opt")]
    NearestNeighborTwoOpt,
    #[serde(rename = "radial-fallback")]
    RadialFallback,
}

impl Algorithm {
    pub fn is_fallback(self) -> bool {
        matches!(self, Algorithm::RadialFallback)
    }
}

/// Travel from the previous stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLeg {
    pub duration_seconds: u32,
    pub distance_meters: u32,
    /// Whole minutes, rounded up.
    pub duration_minutes: u32,
    pub duration_text: String,
    pub distance_text: String,
}

/// A place decorated with its slot in the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub place: Place,
    pub order: usize,
    pub scheduled_arrival_minutes: u32,
    pub scheduled_departure_minutes: u32,
    pub arrival_time: String,
    pub departure_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_from_previous: Option<TravelLeg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
    Efficiency,
}

/// Advisory note for display next to the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Ordered, time-stamped itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_places: Vec<ScheduleEntry>,
    pub total_time_minutes: u32,
    pub total_travel_time_minutes: u32,
    pub total_visit_time_minutes: u32,
    pub total_time_text: String,
    pub total_travel_time_text: String,
    pub total_visit_time_text: String,
    pub warnings: Vec<String>,
    pub insights: Vec<Insight>,
    pub schedule_type: PacingPolicy,
    pub start_time: String,
    pub end_time: String,
    pub buffer_minutes: u32,
    pub algorithm: Algorithm,
}

impl OptimizationResult {
    /// Well-formed result with no stops.
    pub fn empty(start_time_minutes: u32, schedule_type: PacingPolicy) -> Self {
        let start = clock::format_time(start_time_minutes);
        Self {
            optimized_places: Vec::new(),
            total_time_minutes: 0,
            total_travel_time_minutes: 0,
            total_visit_time_minutes: 0,
            total_time_text: clock::format_duration(0),
            total_travel_time_text: clock::format_duration(0),
            total_visit_time_text: clock::format_duration(0),
            warnings: Vec::new(),
            insights: Vec::new(),
            schedule_type,
            start_time: start.clone(),
            end_time: start,
            buffer_minutes: schedule_type.buffer_minutes(),
            algorithm: Algorithm::Empty,
        }
    }
}
