use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{constants::DEFAULT_SPEED_KMH, kilometers::Kilometers};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Kmh(f64);

impl Kmh {
    pub fn new(value: f64) -> Self {
        Kmh(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Time needed to cover `distance` at this speed. `None` when the distance is
    /// infinite or the speed is not positive.
    pub fn travel_time(&self, distance: Kilometers) -> Option<SignedDuration> {
        if !distance.is_finite() || !(self.0 > 0.0) {
            return None;
        }

        SignedDuration::try_from_secs_f64(distance.value() / self.0 * 3600.0).ok()
    }
}

impl Default for Kmh {
    fn default() -> Self {
        Kmh(DEFAULT_SPEED_KMH)
    }
}
