//! Opening-hours oracles.

use tracing::debug;

use crate::model::{OpeningWindow, Place};
use crate::traits::OpeningHoursOracle;

/// Uses the window recorded on the place. Malformed windows (empty,
/// inverted or outside the day) are treated as unconstrained.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceWindows;

impl OpeningHoursOracle for PlaceWindows {
    fn window_for(&self, place: &Place) -> Option<OpeningWindow> {
        let window = place.opening_window?;
        if window.is_valid() {
            Some(window)
        } else {
            debug!(place = %place.id, ?window, "ignoring malformed opening window");
            None
        }
    }
}

/// Like [`PlaceWindows`], but places without a usable window get `hours`.
#[derive(Debug, Clone, Copy)]
pub struct UniformHours {
    pub hours: OpeningWindow,
}

impl UniformHours {
    pub fn new(open_minutes: u32, close_minutes: u32) -> Self {
        Self {
            hours: OpeningWindow::new(open_minutes, close_minutes),
        }
    }
}

impl OpeningHoursOracle for UniformHours {
    fn window_for(&self, place: &Place) -> Option<OpeningWindow> {
        PlaceWindows
            .window_for(place)
            .or_else(|| self.hours.is_valid().then_some(self.hours))
    }
}
