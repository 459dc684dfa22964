//! `FindMyMap` - Meeting-point optimization for business travel
//!
//! This library finds a fair meeting point for a group of participants,
//! filters candidate venues and ranks them by travel time, with pluggable
//! travel estimation (offline heuristic, routing API, persistent cache).

pub mod cache;
pub mod config;
pub mod costs;
pub mod error;
pub mod itinerary;
pub mod models;
pub mod optimizer;
pub mod planner;
pub mod routing;
pub mod telemetry;

// Re-export core types for public API
pub use cache::TravelCache;
pub use config::FindMyMapConfig;
pub use costs::{CostEstimate, CostEstimator, CostRates};
pub use error::FindMyMapError;
pub use itinerary::{Itinerary, TransportMode, plan_itinerary};
pub use models::{
    Coordinate, Objective, Participant, RankedVenue, TravelEstimate, TravelTime, Venue, load_venues,
    venues_from_json,
};
pub use optimizer::{
    FailurePolicy, Ranking, RankingOptions, VenueFilter, centroid, compare_venues, filter_venues,
    meeting_point, rank_venues, rank_venues_until, venues_within_radius,
};
pub use planner::{MeetingPlan, MeetingPlanner};
pub use routing::{EstimateError, HaversineEstimator, TravelEstimator, estimator_fn};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FindMyMapError>;
