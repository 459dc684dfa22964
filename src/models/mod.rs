//! Data models for the FindMyMap meeting planner
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: Geographic positions and distance helpers
//! - Participant: Meeting attendees
//! - Venue: Candidate venues, objectives and ranked results
//! - Travel: Travel times returned by estimators

pub mod coordinate;
pub mod participant;
pub mod travel;
pub mod venue;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use participant::Participant;
pub use travel::{TravelEstimate, TravelTime};
pub use venue::{Objective, RankedVenue, Venue, load_venues, venues_from_json};
