//! Meeting-point optimizer
//!
//! Pure venue selection logic. Nothing here performs I/O on its own; travel
//! estimation goes through the injected [`TravelEstimator`](crate::routing::TravelEstimator).

pub mod centroid;
pub mod comparison;
pub mod filter;
pub mod ranking;

pub use centroid::{centroid, meeting_point};
pub use comparison::compare_venues;
pub use filter::{VenueFilter, filter_venues, venues_within_radius};
pub use ranking::{FailurePolicy, Ranking, RankingOptions, rank_venues, rank_venues_until};
