//! Business trip itinerary
//!
//! Single-trip planning on top of a travel estimator: how far, how long and
//! when the traveller arrives.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Coordinate;
use crate::routing::{EstimateError, TravelEstimator};
use crate::{FindMyMapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Transit,
    Walking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub mode: TransportMode,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

/// Arrival time for a trip of `duration_minutes` leaving at `departure`.
///
/// Negative, non-finite or unrepresentably long durations are `InvalidInput`.
pub fn arrival_time(departure: DateTime<Utc>, duration_minutes: f64) -> Result<DateTime<Utc>> {
    let millis = (duration_minutes * 60_000.0).round();
    if !millis.is_finite() || millis < 0.0 || millis >= i64::MAX as f64 {
        return Err(FindMyMapError::invalid_input(format!(
            "trip duration of {duration_minutes} minutes cannot be scheduled"
        )));
    }

    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| departure.checked_add_signed(delta))
        .ok_or_else(|| {
            FindMyMapError::invalid_input(format!(
                "arrival after a {duration_minutes} minute trip is out of range"
            ))
        })
}

/// Plan a single trip with `estimator`.
///
/// `mode` is recorded on the itinerary; picking an estimator that matches it
/// is up to the caller.
pub async fn plan_itinerary<E>(
    estimator: &E,
    origin: Coordinate,
    destination: Coordinate,
    departure: DateTime<Utc>,
    mode: TransportMode,
) -> Result<Itinerary>
where
    E: TravelEstimator + ?Sized,
{
    origin.validate()?;
    destination.validate()?;

    let travel = estimator
        .estimate_travel(&origin, &destination)
        .await
        .and_then(|travel| {
            if travel.is_valid() {
                Ok(travel)
            } else {
                Err(EstimateError::InvalidEstimate(format!(
                    "distance {} km, duration {} min",
                    travel.distance_km, travel.duration_minutes
                )))
            }
        })
        .map_err(|e| {
            FindMyMapError::travel_estimation(
                origin.format_coordinates(),
                destination.format_coordinates(),
                e,
            )
        })?;

    let arrival = arrival_time(departure, travel.duration_minutes)?;
    debug!(
        "Itinerary {} -> {}: {:.1} km, {:.0} min",
        origin.format_coordinates(),
        destination.format_coordinates(),
        travel.distance_km,
        travel.duration_minutes
    );

    Ok(Itinerary {
        origin,
        destination,
        distance_km: travel.distance_km,
        duration_minutes: travel.duration_minutes,
        mode,
        departure,
        arrival,
    })
}
