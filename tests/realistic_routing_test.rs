//! Realistic routing tests using real Stockholm sights.
//!
//! These tests run the full pipeline over real-world coordinates with
//! straight-line estimates, an unreachable routing service, and (when
//! configured) a live OSRM server.

mod fixtures;

use std::net::TcpListener;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use itinerary_planner::haversine::{HaversineMatrix, WithHaversineFallback};
use itinerary_planner::osrm::{OsrmClient, OsrmConfig};
use itinerary_planner::{
    Algorithm, OptimizationResult, OptimizeOptions, PacingPolicy, Place, RouteOptimizer, TravelMode,
};

use fixtures::{assert_well_formed, full_day, ids, museum_day, walking_tour, OfflineMatrix};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn unreachable_osrm() -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        profile: None,
        timeout_secs: 1,
    })
    .expect("build OSRM client")
}

fn at(hour: u32, pacing: PacingPolicy, mode: TravelMode) -> OptimizeOptions {
    OptimizeOptions {
        start_time_minutes: hour * 60,
        schedule_type: pacing,
        travel_mode: mode,
        ..OptimizeOptions::default()
    }
}

fn skipped_notes(result: &OptimizationResult) -> usize {
    result
        .warnings
        .iter()
        .filter(|warning| warning.contains("cannot be visited"))
        .count()
}

// ============================================================================
// Straight-line estimates
// ============================================================================

#[test]
fn test_museum_day_on_foot() {
    let places = museum_day();
    let optimizer = RouteOptimizer::new(HaversineMatrix::default());

    let result = optimizer.optimize_route(&places, &at(10, PacingPolicy::Balanced, TravelMode::Walking));

    assert_well_formed(&result, &places);
    assert_eq!(result.algorithm, Algorithm::NearestNeighborTwoOpt);
    assert_eq!(ids(&result)[0], "vasa");
    assert_eq!(skipped_notes(&result), places.len() - result.optimized_places.len());
    assert!(result
        .insights
        .iter()
        .any(|insight| insight.title == "Estimated travel times"));
    // Djurgården and the old town are a few kilometres apart at most
    assert!(result.total_travel_time_minutes < 120, "{}", result.total_travel_time_minutes);
}

#[test]
fn test_late_start_drops_closing_museums() {
    let places = museum_day();
    let optimizer = RouteOptimizer::new(HaversineMatrix::default());

    let result = optimizer.optimize_route(&places, &at(16, PacingPolicy::Balanced, TravelMode::Walking));

    assert_well_formed(&result, &places);
    assert!(result.optimized_places.len() < places.len());
    assert_eq!(skipped_notes(&result), places.len() - result.optimized_places.len());
    assert!(result.insights.iter().any(|insight| insight.title == "Places skipped"));
}

#[test]
fn test_driving_is_never_slower_than_walking_downtown() {
    let places = walking_tour();
    let optimizer = RouteOptimizer::new(HaversineMatrix::default());

    let walking = optimizer.optimize_route(&places, &at(10, PacingPolicy::Tight, TravelMode::Walking));
    let driving = optimizer.optimize_route(&places, &at(10, PacingPolicy::Tight, TravelMode::Driving));

    assert_eq!(walking.optimized_places.len(), driving.optimized_places.len());
    assert!(driving.total_travel_time_minutes <= walking.total_travel_time_minutes);
    for entry in driving.optimized_places.iter().skip(1) {
        let leg = entry.travel_from_previous.as_ref().unwrap();
        assert!(leg.duration_seconds >= 300, "legs have a five-minute floor");
    }
}

#[test]
fn test_full_day_all_pacings() {
    let places = full_day();
    let optimizer = RouteOptimizer::new(HaversineMatrix::default());

    for pacing in [PacingPolicy::Tight, PacingPolicy::Balanced, PacingPolicy::Relaxed] {
        let result = optimizer.optimize_route(&places, &at(9, pacing, TravelMode::Walking));
        assert_well_formed(&result, &places);
        assert_eq!(result.buffer_minutes, pacing.buffer_minutes());
    }
}

#[test]
fn test_concurrent_requests_share_one_optimizer() {
    let places = full_day();
    let optimizer = RouteOptimizer::new(HaversineMatrix::default());
    let requests: Vec<OptimizeOptions> = (8..16)
        .map(|hour| at(hour, PacingPolicy::Balanced, TravelMode::Walking))
        .collect();

    let sequential: Vec<OptimizationResult> = requests
        .iter()
        .map(|options| optimizer.optimize_route(&places, options))
        .collect();
    let parallel: Vec<OptimizationResult> = requests
        .par_iter()
        .map(|options| optimizer.optimize_route(&places, options))
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_optimizer_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RouteOptimizer<HaversineMatrix>>();
    assert_send_sync::<RouteOptimizer<OsrmClient>>();
    assert_send_sync::<RouteOptimizer<WithHaversineFallback<OsrmClient>>>();
}

// ============================================================================
// Routing service failures
// ============================================================================

#[test]
fn test_unreachable_service_uses_radial_fallback() {
    let places = full_day();
    let optimizer = RouteOptimizer::new(unreachable_osrm());

    let result = optimizer.optimize_route(&places, &OptimizeOptions::default());

    assert_eq!(result.algorithm, Algorithm::RadialFallback);
    assert_eq!(result.optimized_places.len(), places.len());
    assert!(result.warnings[0].starts_with("Route optimization unavailable"));
    assert!(result.insights.iter().any(|insight| insight.title == "Approximate route"));
    assert_well_formed(&result, &places);
}

#[test]
fn test_silent_service_times_out_into_fallback() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let client = OsrmClient::new(OsrmConfig {
        base_url: format!("http://{}", listener.local_addr().expect("local addr")),
        profile: None,
        timeout_secs: 1,
    })
    .expect("build OSRM client");
    let places = walking_tour();

    let started = Instant::now();
    let result = RouteOptimizer::new(client).optimize_route(&places, &OptimizeOptions::default());

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.algorithm, Algorithm::RadialFallback);
    assert!(result.warnings[0].starts_with("Route optimization unavailable"));
    assert_well_formed(&result, &places);
    drop(listener);
}

#[test]
fn test_unreachable_service_with_estimate_fallback() {
    let places = full_day();
    let options = at(10, PacingPolicy::Relaxed, TravelMode::Walking);

    let estimated = RouteOptimizer::new(WithHaversineFallback::new(unreachable_osrm()))
        .optimize_route(&places, &options);
    let direct = RouteOptimizer::new(HaversineMatrix::default()).optimize_route(&places, &options);

    assert_eq!(estimated.algorithm, Algorithm::NearestNeighborTwoOpt);
    assert_eq!(estimated, direct);
}

#[test]
fn test_offline_provider_keeps_every_place() {
    let places: Vec<Place> = full_day().into_iter().rev().collect();
    let optimizer = RouteOptimizer::new(OfflineMatrix);

    let result = optimizer.optimize_route(&places, &at(8, PacingPolicy::Tight, TravelMode::Walking));

    assert_eq!(result.optimized_places.len(), places.len());
    assert_eq!(result.total_travel_time_minutes, 15 * (places.len() as u32 - 1));
}

// ============================================================================
// Live OSRM
// ============================================================================

#[test]
#[ignore = "requires a running OSRM server with Stockholm data (OSRM_BASE_URL)"]
fn test_museum_day_with_osrm() {
    let client = OsrmClient::new(OsrmConfig::from_env()).expect("build OSRM client");
    let optimizer = RouteOptimizer::new(client);
    let places = museum_day();

    let result = optimizer.optimize_route(&places, &at(10, PacingPolicy::Balanced, TravelMode::Walking));

    assert_eq!(result.algorithm, Algorithm::NearestNeighborTwoOpt);
    assert!(result
        .insights
        .iter()
        .all(|insight| insight.title != "Estimated travel times"));
    assert_well_formed(&result, &places);
}
