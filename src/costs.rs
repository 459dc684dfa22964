//! Meeting cost estimation
//!
//! Rough cost breakdown for holding a meeting at a ranked venue: room rental,
//! catering, equipment the venue does not provide, and participant travel.

use serde::{Deserialize, Serialize};

use crate::models::RankedVenue;
use crate::{FindMyMapError, Result};

/// Price rates used by [`CostEstimator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    /// Hourly rental per price level step
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate_per_price_level: f64,
    /// Catering per participant per price level step
    #[serde(default = "default_catering_rate")]
    pub catering_per_participant: f64,
    /// Standard equipment, always charged
    #[serde(default = "default_base_equipment")]
    pub base_equipment: f64,
    #[serde(default = "default_projector")]
    pub projector_rental: f64,
    #[serde(default = "default_video_conferencing")]
    pub video_conferencing_rental: f64,
    #[serde(default = "default_av_equipment")]
    pub av_equipment_rental: f64,
    /// Travel cost per kilometer, charged for the round trip
    #[serde(default = "default_cost_per_km")]
    pub cost_per_km: f64,
}

fn default_hourly_rate() -> f64 {
    50.0
}

fn default_catering_rate() -> f64 {
    15.0
}

fn default_base_equipment() -> f64 {
    50.0
}

fn default_projector() -> f64 {
    25.0
}

fn default_video_conferencing() -> f64 {
    50.0
}

fn default_av_equipment() -> f64 {
    35.0
}

fn default_cost_per_km() -> f64 {
    0.5
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            hourly_rate_per_price_level: default_hourly_rate(),
            catering_per_participant: default_catering_rate(),
            base_equipment: default_base_equipment(),
            projector_rental: default_projector(),
            video_conferencing_rental: default_video_conferencing(),
            av_equipment_rental: default_av_equipment(),
            cost_per_km: default_cost_per_km(),
        }
    }
}

impl CostRates {
    /// All rates must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("hourly_rate_per_price_level", self.hourly_rate_per_price_level),
            ("catering_per_participant", self.catering_per_participant),
            ("base_equipment", self.base_equipment),
            ("projector_rental", self.projector_rental),
            ("video_conferencing_rental", self.video_conferencing_rental),
            ("av_equipment_rental", self.av_equipment_rental),
            ("cost_per_km", self.cost_per_km),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(FindMyMapError::config(format!(
                    "Cost rate '{name}' must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Cost breakdown for one venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub venue_id: String,
    pub venue_cost: f64,
    pub catering_cost: f64,
    pub equipment_cost: f64,
    pub travel_cost: f64,
    pub total_cost: f64,
}

/// Estimates meeting costs from a [`RankedVenue`]
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    rates: CostRates,
}

impl CostEstimator {
    #[must_use]
    pub fn new(rates: CostRates) -> Self {
        Self { rates }
    }

    /// Estimate the cost of a `duration_hours` meeting at `ranked`.
    ///
    /// The participant count is the number of travel estimates on the venue.
    pub fn estimate(&self, ranked: &RankedVenue, duration_hours: f64) -> Result<CostEstimate> {
        if !duration_hours.is_finite() || duration_hours < 0.0 {
            return Err(FindMyMapError::invalid_input(format!(
                "meeting duration {duration_hours} must be a non-negative number of hours"
            )));
        }

        let venue = &ranked.venue;
        let price_level = f64::from(venue.price_level);
        let participants = ranked.per_participant.len() as f64;

        let venue_cost = price_level * self.rates.hourly_rate_per_price_level * duration_hours;
        let catering_cost = price_level * self.rates.catering_per_participant * participants;

        let mut equipment_cost = self.rates.base_equipment;
        if !venue.has_amenity("Projector") {
            equipment_cost += self.rates.projector_rental;
        }
        if !venue.has_amenity("Video Conferencing") {
            equipment_cost += self.rates.video_conferencing_rental;
        }
        if !venue.has_amenity("AV Equipment") {
            equipment_cost += self.rates.av_equipment_rental;
        }

        let travel_cost = ranked.total_distance_km() * self.rates.cost_per_km * 2.0;

        Ok(CostEstimate {
            venue_id: venue.id.clone(),
            venue_cost,
            catering_cost,
            equipment_cost,
            travel_cost,
            total_cost: venue_cost + catering_cost + equipment_cost + travel_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, TravelEstimate, Venue};
    use std::collections::BTreeSet;

    fn ranked(amenities: &[&str], distances_km: &[f64]) -> RankedVenue {
        let venue = Venue {
            id: "hub".to_string(),
            name: "Executive Meeting Hub".to_string(),
            coordinate: Coordinate { lat: 40.7, lng: -74.0 },
            rating: 4.5,
            price_level: 2,
            capacity: 50,
            amenities: amenities.iter().map(|a| a.to_string()).collect::<BTreeSet<_>>(),
        };
        let estimates = distances_km
            .iter()
            .enumerate()
            .map(|(i, km)| TravelEstimate {
                participant_id: format!("p{i}"),
                venue_id: "hub".to_string(),
                distance_km: *km,
                duration_minutes: km * 1.2,
            })
            .collect();
        RankedVenue::new(venue, estimates)
    }

    #[test]
    fn test_cost_breakdown_without_equipment() {
        let estimate = CostEstimator::default()
            .estimate(&ranked(&["WiFi"], &[10.0, 5.0, 5.0]), 2.0)
            .unwrap();

        assert_eq!(estimate.venue_cost, 200.0);
        assert_eq!(estimate.catering_cost, 90.0);
        assert_eq!(estimate.equipment_cost, 160.0);
        assert_eq!(estimate.travel_cost, 20.0);
        assert_eq!(estimate.total_cost, 470.0);
    }

    #[test]
    fn test_included_equipment_is_not_charged() {
        let estimate = CostEstimator::default()
            .estimate(
                &ranked(&["Projector", "Video Conferencing", "AV Equipment"], &[1.0]),
                1.0,
            )
            .unwrap();
        assert_eq!(estimate.equipment_cost, 50.0);
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let result = CostEstimator::default().estimate(&ranked(&[], &[1.0]), -1.0);
        assert!(matches!(result, Err(FindMyMapError::InvalidInput { .. })));
    }

    #[test]
    fn test_rates_validation() {
        assert!(CostRates::default().validate().is_ok());
        let rates = CostRates {
            cost_per_km: -0.1,
            ..CostRates::default()
        };
        assert!(rates.validate().is_err());
    }
}
