use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, Venue};

/// Optional venue requirements; unset criteria always pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueFilter {
    #[serde(default)]
    pub min_rating: Option<f64>,
    /// Every listed amenity must be present; empty means no requirement
    #[serde(default)]
    pub required_amenities: BTreeSet<String>,
    #[serde(default)]
    pub min_capacity: Option<u32>,
}

impl VenueFilter {
    #[must_use]
    pub fn matches(&self, venue: &Venue) -> bool {
        if let Some(min_rating) = self.min_rating {
            if venue.rating < min_rating {
                return false;
            }
        }
        if !self.required_amenities.is_subset(&venue.amenities) {
            return false;
        }
        if let Some(min_capacity) = self.min_capacity {
            if venue.capacity < min_capacity {
                return false;
            }
        }
        true
    }
}

/// Venues that satisfy every criterion of `filter`, in input order
#[must_use]
pub fn filter_venues(venues: &[Venue], filter: &VenueFilter) -> Vec<Venue> {
    venues
        .iter()
        .filter(|venue| filter.matches(venue))
        .cloned()
        .collect()
}

/// Venues within `radius_km` great-circle distance of `center`, in input order
#[must_use]
pub fn venues_within_radius(venues: &[Venue], center: &Coordinate, radius_km: f64) -> Vec<Venue> {
    venues
        .iter()
        .filter(|venue| center.distance_km(&venue.coordinate) <= radius_km)
        .cloned()
        .collect()
}
