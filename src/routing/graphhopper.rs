use std::{env, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::instrument;

use super::{EstimateError, TravelEstimator};
use crate::config::RoutingConfig;
use crate::models::{Coordinate, TravelTime};
use crate::{FindMyMapError, Result};

/// Driving-time estimates from the GraphHopper routing API
pub struct GraphHopperEstimator {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl GraphHopperEstimator {
    /// Build a client from routing settings; the API key may come from the
    /// `GRAPHHOPPER_API_KEY` environment variable instead of the config.
    pub fn from_config(config: &RoutingConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => env::var("GRAPHHOPPER_API_KEY").map_err(|_| {
                FindMyMapError::config(
                    "Missing routing API key: set routing.api_key or GRAPHHOPPER_API_KEY",
                )
            })?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("FindMyMap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FindMyMapError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn route_url(&self, origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route?point={},{}&point={},{}&profile=car&points_encoded=false&calc_points=false&key={}",
            self.base_url,
            origin.lat,
            origin.lng,
            destination.lat,
            destination.lng,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl TravelEstimator for GraphHopperEstimator {
    #[instrument(level = "debug", skip(self))]
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> std::result::Result<TravelTime, EstimateError> {
        tracing::debug!("Calling the routing API");
        let response = self
            .client
            .get(self.route_url(origin, destination))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EstimateError::RateLimited(format!(
                "routing API answered {status}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EstimateError::Api(format!(
                "routing API answered {status}: {body}"
            )));
        }

        let response: ApiResponse = response
            .json()
            .await
            .map_err(|e| EstimateError::Parse(e.to_string()))?;

        response
            .paths
            .first()
            .map(|path| TravelTime::new(path.distance / 1000.0, path.time as f64 / 60_000.0))
            .ok_or_else(|| {
                EstimateError::NoRoute(format!(
                    "no paths between {} and {}",
                    origin.format_coordinates(),
                    destination.format_coordinates()
                ))
            })
    }
}

#[derive(Debug, Deserialize)]
struct PathResponse {
    /// Meters
    distance: f64,
    /// Milliseconds
    time: u64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    paths: Vec<PathResponse>,
}
