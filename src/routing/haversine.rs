use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{EstimateError, TravelEstimator};
use crate::models::{Coordinate, TravelTime};

/// Roads are typically 20-40% longer than the straight line
pub const DEFAULT_ROAD_FACTOR: f64 = 1.3;
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 50.0;

/// Offline travel estimate: great-circle distance stretched by a road factor,
/// driven at a constant average speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaversineEstimator {
    pub road_factor: f64,
    pub average_speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            road_factor: DEFAULT_ROAD_FACTOR,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    #[must_use]
    pub fn new(road_factor: f64, average_speed_kmh: f64) -> Self {
        Self {
            road_factor,
            average_speed_kmh,
        }
    }

    #[must_use]
    pub fn estimate(&self, origin: &Coordinate, destination: &Coordinate) -> TravelTime {
        let road_km = origin.distance_km(destination) * self.road_factor;
        let minutes = road_km / self.average_speed_kmh * 60.0;
        TravelTime::new(road_km, minutes)
    }
}

#[async_trait]
impl TravelEstimator for HaversineEstimator {
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError> {
        Ok(self.estimate(origin, destination))
    }
}
