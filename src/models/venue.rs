//! Venue model and ranked venue results

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Coordinate, TravelEstimate};
use crate::{FindMyMapError, Result};

/// A candidate meeting venue supplied by the caller
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Venue {
    /// Unique venue identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    pub coordinate: Coordinate,
    /// Average review rating in [0, 5]
    pub rating: f64,
    /// Price bracket in [1, 4]
    pub price_level: u8,
    /// Maximum number of attendees
    pub capacity: u32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

impl Venue {
    /// Check coordinate, rating and price level ranges
    pub fn validate(&self) -> Result<()> {
        self.coordinate.validate().map_err(|e| {
            FindMyMapError::invalid_input(format!("venue '{}': {}", self.id, e.user_message()))
        })?;
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(FindMyMapError::invalid_input(format!(
                "venue '{}': rating {} is outside [0, 5]",
                self.id, self.rating
            )));
        }
        if !(1..=4).contains(&self.price_level) {
            return Err(FindMyMapError::invalid_input(format!(
                "venue '{}': price level {} is outside [1, 4]",
                self.id, self.price_level
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.contains(amenity)
    }
}

/// Parse a JSON array of venues, validating every entry
pub fn venues_from_json(json: &str) -> Result<Vec<Venue>> {
    let venues: Vec<Venue> = serde_json::from_str(json)
        .map_err(|e| FindMyMapError::invalid_input(format!("malformed venue catalogue: {e}")))?;
    for venue in &venues {
        venue.validate()?;
    }
    Ok(venues)
}

/// Read a venue catalogue from a JSON file
pub fn load_venues(path: impl AsRef<Path>) -> Result<Vec<Venue>> {
    let json = fs::read_to_string(path)?;
    venues_from_json(&json)
}

/// Criterion used to rank venues by participant travel time
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Minimize the average travel time
    #[default]
    Average,
    /// Minimize the longest single travel time
    Fairness,
    /// Minimize the sum of all travel times
    Total,
}

impl FromStr for Objective {
    type Err = FindMyMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(Objective::Average),
            "fairness" => Ok(Objective::Fairness),
            "total" => Ok(Objective::Total),
            other => Err(FindMyMapError::invalid_input(format!(
                "unknown objective '{other}', expected one of: average, fairness, total"
            ))),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Objective::Average => "average",
            Objective::Fairness => "fairness",
            Objective::Total => "total",
        };
        write!(f, "{name}")
    }
}

/// A venue annotated with travel estimates for every participant
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RankedVenue {
    pub venue: Venue,
    /// One estimate per participant, in participant input order
    pub per_participant: Vec<TravelEstimate>,
    pub total_duration_minutes: f64,
    pub average_duration_minutes: f64,
    pub max_duration_minutes: f64,
}

impl RankedVenue {
    /// Aggregate the per-participant estimates of `venue`.
    ///
    /// `per_participant` must not be empty.
    #[must_use]
    pub fn new(venue: Venue, per_participant: Vec<TravelEstimate>) -> Self {
        let total: f64 = per_participant.iter().map(|e| e.duration_minutes).sum();
        let max = per_participant
            .iter()
            .map(|e| e.duration_minutes)
            .fold(0.0_f64, f64::max);
        let average = total / per_participant.len() as f64;

        Self {
            venue,
            per_participant,
            total_duration_minutes: total,
            average_duration_minutes: average,
            max_duration_minutes: max,
        }
    }

    /// The sort key for `objective`
    #[must_use]
    pub fn score(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Average => self.average_duration_minutes,
            Objective::Fairness => self.max_duration_minutes,
            Objective::Total => self.total_duration_minutes,
        }
    }

    #[must_use]
    pub fn total_distance_km(&self) -> f64 {
        self.per_participant.iter().map(|e| e.distance_km).sum()
    }
}
