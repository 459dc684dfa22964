//! Routing module
//!
//! Travel estimation is a capability injected into the optimizer. This module
//! defines the [`TravelEstimator`] trait and its implementations:
//! - Haversine road-distance heuristic (offline, never fails)
//! - GraphHopper routing API client
//! - Persistent caching decorator over any other estimator

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Coordinate, TravelTime};

pub mod cached;
pub mod error;
pub mod graphhopper;
pub mod haversine;

pub use cached::CachingEstimator;
pub use error::EstimateError;
pub use graphhopper::GraphHopperEstimator;
pub use haversine::HaversineEstimator;

/// Estimates distance and duration of a trip between two coordinates
#[async_trait]
pub trait TravelEstimator: Send + Sync {
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError>;
}

#[async_trait]
impl<T: TravelEstimator + ?Sized> TravelEstimator for Arc<T> {
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError> {
        (**self).estimate_travel(origin, destination).await
    }
}

#[async_trait]
impl<T: TravelEstimator + ?Sized> TravelEstimator for Box<T> {
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError> {
        (**self).estimate_travel(origin, destination).await
    }
}

/// Adapts an async closure into a [`TravelEstimator`]
pub struct FnEstimator<F>(F);

/// Wrap `f` so it can be passed wherever a [`TravelEstimator`] is expected
pub fn estimator_fn<F, Fut>(f: F) -> FnEstimator<F>
where
    F: Fn(Coordinate, Coordinate) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TravelTime, EstimateError>> + Send + 'static,
{
    FnEstimator(f)
}

#[async_trait]
impl<F, Fut> TravelEstimator for FnEstimator<F>
where
    F: Fn(Coordinate, Coordinate) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TravelTime, EstimateError>> + Send + 'static,
{
    async fn estimate_travel(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<TravelTime, EstimateError> {
        (self.0)(*origin, *destination).await
    }
}
