use crate::models::RankedVenue;
use crate::{FindMyMapError, Result};

/// Pick the venues with the given ids for a side-by-side comparison.
///
/// Keeps ranking order. Unknown ids are ignored, but at least one must match.
pub fn compare_venues<'a, S: AsRef<str>>(
    ranked: &'a [RankedVenue],
    venue_ids: &[S],
) -> Result<Vec<&'a RankedVenue>> {
    if ranked.is_empty() {
        return Err(FindMyMapError::invalid_input(
            "no ranked venues available to compare",
        ));
    }

    let selected: Vec<&RankedVenue> = ranked
        .iter()
        .filter(|r| venue_ids.iter().any(|id| id.as_ref() == r.venue.id))
        .collect();

    if selected.is_empty() {
        return Err(FindMyMapError::invalid_input(
            "none of the requested venues were found",
        ));
    }
    Ok(selected)
}
