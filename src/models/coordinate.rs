//! Coordinate model for participant and venue positions

use serde::{Deserialize, Serialize};

use crate::{FindMyMapError, Result};

/// A WGS84 position in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, within [-90, 90]
    pub lat: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub lng: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both components are finite and in range.
    ///
    /// Coordinates built with struct literals or deserialized from caller
    /// data skip [`Coordinate::new`], so every public operation re-checks.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(FindMyMapError::invalid_input(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(FindMyMapError::invalid_input(format!(
                "longitude {} is outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Format coordinate as a `lat, lng` string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.lat * multiplier).round() / multiplier;
        let lng = (self.lng * multiplier).round() / multiplier;
        (lat, lng)
    }

    /// Generate cache key for this coordinate
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lat, lng) = self.rounded(4);
        format!("{lat:.4}:{lng:.4}")
    }

    /// Great-circle distance to `other` in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lng,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lng,
            },
            haversine::Units::Kilometers,
        )
    }
}
