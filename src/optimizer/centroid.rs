use crate::models::{Coordinate, Objective};
use crate::{FindMyMapError, Result};

/// Arithmetic mean of latitudes and longitudes.
///
/// Not geodesically correct for sets that cross the antimeridian.
pub fn centroid(coordinates: &[Coordinate]) -> Result<Coordinate> {
    if coordinates.is_empty() {
        return Err(FindMyMapError::invalid_input(
            "at least one coordinate is required to compute a centroid",
        ));
    }
    for coordinate in coordinates {
        coordinate.validate()?;
    }

    let count = coordinates.len() as f64;
    let (sum_lat, sum_lng) = coordinates
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));

    Ok(Coordinate {
        lat: sum_lat / count,
        lng: sum_lng / count,
    })
}

/// The point to search for venues around, for a given objective.
///
/// Fairness and total-time objectives use the centroid as well; they only
/// change how venues are ranked, not where the search is centered.
pub fn meeting_point(coordinates: &[Coordinate], objective: Objective) -> Result<Coordinate> {
    match objective {
        Objective::Average | Objective::Fairness | Objective::Total => centroid(coordinates),
    }
}
