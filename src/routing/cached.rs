use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{instrument, warn};

use super::{EstimateError, TravelEstimator};
use crate::cache::TravelCache;
use crate::models::{Coordinate, TravelTime};

/// Serves repeated origin/destination pairs from a [`TravelCache`] and only
/// calls the inner estimator on a miss.
pub struct CachingEstimator<E> {
    inner: E,
    cache: TravelCache,
    ttl: Duration,
}

impl<E: TravelEstimator> CachingEstimator<E> {
    pub fn new(inner: E, cache: TravelCache, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    fn key(origin: &Coordinate, destination: &Coordinate) -> String {
        format!("travel:{}-{}", origin.cache_key(), destination.cache_key())
    }

    /// Spread expiry so entries written together do not all expire together
    fn jittered_ttl(&self) -> Duration {
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        self.ttl.mul_f64(jitter)
    }
}

#[async_trait]
impl<E: TravelEstimator> TravelEstimator for CachingEstimator<E> {
    #[instrument(level = "debug", skip(self))]
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError> {
        let key = Self::key(origin, destination);

        if let Some(cached) = self.cache.get::<TravelTime>(&key).await? {
            return Ok(cached);
        }

        let travel = self.inner.estimate_travel(origin, destination).await?;
        if let Err(e) = self.cache.put(&key, travel, self.jittered_ttl()).await {
            warn!("Failed to cache travel time for {key}: {e:#}");
        }
        Ok(travel)
    }
}
