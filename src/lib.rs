//! itinerary-planner core
//!
//! Orders a day's places of interest to keep travel short, respects opening
//! hours, and produces a time-stamped itinerary.

pub mod clock;
pub mod error;
pub mod feasibility;
pub mod haversine;
pub mod insights;
pub mod matrix;
pub mod model;
pub mod opening_hours;
pub mod optimizer;
pub mod osrm;
pub mod schedule;
pub mod solver;
pub mod traits;

pub use error::{MatrixUnavailable, PlanError};
pub use model::{
    Algorithm, Coordinate, Insight, InsightKind, OpeningWindow, OptimizationResult, PacingPolicy,
    Place, ScheduleEntry, TravelLeg, TravelMode,
};
pub use optimizer::{OptimizeOptions, RouteOptimizer};
pub use traits::{DistanceMatrixProvider, OpeningHoursOracle};
