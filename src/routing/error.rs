use thiserror::Error;

/// Failure reported by a travel estimator for a single origin/destination pair
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit error: {0}")]
    RateLimited(String),

    #[error("No route found: {0}")]
    NoRoute(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid estimate: {0}")]
    InvalidEstimate(String),
}

impl From<reqwest::Error> for EstimateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EstimateError::Parse(err.to_string())
        } else {
            EstimateError::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for EstimateError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            reqwest_middleware::Error::Middleware(err) => EstimateError::Network(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for EstimateError {
    fn from(err: anyhow::Error) -> Self {
        EstimateError::Cache(err.to_string())
    }
}
