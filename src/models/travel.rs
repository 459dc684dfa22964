//! Travel estimates produced by a routing capability

use serde::{Deserialize, Serialize};

/// Distance and duration of a single trip, as returned by a travel estimator
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TravelTime {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl TravelTime {
    #[must_use]
    pub fn new(distance_km: f64, duration_minutes: f64) -> Self {
        Self {
            distance_km,
            duration_minutes,
        }
    }

    /// Both components are finite and non-negative
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.distance_km.is_finite()
            && self.duration_minutes.is_finite()
            && self.distance_km >= 0.0
            && self.duration_minutes >= 0.0
    }
}

/// Travel time for one participant to one venue
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelEstimate {
    pub participant_id: String,
    pub venue_id: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl TravelEstimate {
    #[must_use]
    pub fn from_travel_time(participant_id: &str, venue_id: &str, travel: TravelTime) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            venue_id: venue_id.to_string(),
            distance_km: travel.distance_km,
            duration_minutes: travel.duration_minutes,
        }
    }
}
