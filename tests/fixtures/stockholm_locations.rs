//! Real Stockholm sights for realistic test fixtures.
//!
//! Coordinates and typical summer opening hours of well-known attractions.

use itinerary_planner::Place;

/// A named sight with coordinates, visit length and opening hours.
#[derive(Debug, Clone)]
pub struct Sight {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub visit_minutes: u32,
    /// (open, close) in minutes since midnight.
    pub hours: Option<(u32, u32)>,
}

impl Sight {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        lat: f64,
        lng: f64,
        visit_minutes: u32,
        hours: Option<(u32, u32)>,
    ) -> Self {
        Self {
            id,
            name,
            lat,
            lng,
            visit_minutes,
            hours,
        }
    }

    pub fn to_place(&self) -> Place {
        let place = Place::new(self.id, self.name, self.lat, self.lng)
            .with_visit_duration(self.visit_minutes);
        match self.hours {
            Some((open, close)) => place.with_opening_window(open, close),
            None => place,
        }
    }
}

// ============================================================================
// Djurgården and the city centre
// ============================================================================

pub const MUSEUMS: &[Sight] = &[
    Sight::new("vasa", "Vasa Museum", 59.3280, 18.0918, 120, Some((10 * 60, 17 * 60))),
    Sight::new("skansen", "Skansen", 59.3259, 18.1038, 180, Some((10 * 60, 20 * 60))),
    Sight::new("abba", "ABBA Museum", 59.3252, 18.0963, 90, Some((10 * 60, 18 * 60))),
    Sight::new("palace", "Royal Palace", 59.3267, 18.0717, 90, Some((10 * 60, 17 * 60))),
    Sight::new("fotografiska", "Fotografiska", 59.3176, 18.0851, 60, Some((9 * 60, 21 * 60))),
];

// ============================================================================
// Open-air places without opening hours
// ============================================================================

pub const OUTDOORS: &[Sight] = &[
    Sight::new("gamla-stan", "Gamla Stan", 59.3251, 18.0711, 60, None),
    Sight::new("sodermalm", "Monteliusvägen", 59.3206, 18.0598, 30, None),
    Sight::new("kungstradgarden", "Kungsträdgården", 59.3310, 18.0717, 30, None),
    Sight::new("city-hall", "Stockholm City Hall", 59.3275, 18.0543, 45, None),
];

/// The five museums, in the order a visitor typically lists them.
pub fn museum_day() -> Vec<Place> {
    MUSEUMS.iter().map(Sight::to_place).collect()
}

/// Museums followed by outdoor stops.
pub fn full_day() -> Vec<Place> {
    MUSEUMS.iter().chain(OUTDOORS.iter()).map(Sight::to_place).collect()
}

/// Outdoor stops only; nothing can be dropped for opening hours.
pub fn walking_tour() -> Vec<Place> {
    OUTDOORS.iter().map(Sight::to_place).collect()
}
