//! Error types and handling for the `FindMyMap` meeting planner

use thiserror::Error;

use crate::routing::EstimateError;

/// Main error type for the `FindMyMap` library
#[derive(Error, Debug)]
pub enum FindMyMapError {
    /// Input validation errors (empty participant list, out-of-range coordinates, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A single (participant, venue) travel estimate could not be produced
    #[error("Travel estimation failed for participant '{participant_id}' to venue '{venue_id}': {source}")]
    TravelEstimationFailed {
        participant_id: String,
        venue_id: String,
        #[source]
        source: EstimateError,
    },

    /// The caller cancelled an in-flight ranking request
    #[error("Ranking request was cancelled")]
    Cancelled,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Travel cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FindMyMapError {
    /// Create a new input validation error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new travel estimation error for one participant/venue pair
    pub fn travel_estimation<P, V>(participant_id: P, venue_id: V, source: EstimateError) -> Self
    where
        P: Into<String>,
        V: Into<String>,
    {
        Self::TravelEstimationFailed {
            participant_id: participant_id.into(),
            venue_id: venue_id.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FindMyMapError::InvalidInput { message } => format!("Invalid input: {message}"),
            FindMyMapError::TravelEstimationFailed { venue_id, .. } => {
                format!("Travel times to venue '{venue_id}' could not be calculated.")
            }
            FindMyMapError::Cancelled => "The venue search was cancelled.".to_string(),
            FindMyMapError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            FindMyMapError::Cache { .. } => {
                "Travel cache operation failed. You may need to clear your cache.".to_string()
            }
            FindMyMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
