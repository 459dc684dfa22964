//! Meeting planner
//!
//! Wires configuration, travel estimation and the optimizer together:
//! meeting point, venue filtering, optional radius search, then ranking.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::cache::TravelCache;
use crate::config::{FailureMode, FindMyMapConfig, RoutingProvider};
use crate::costs::{CostEstimate, CostEstimator};
use crate::itinerary::{Itinerary, TransportMode, plan_itinerary};
use crate::models::{Coordinate, Objective, Participant, RankedVenue, Venue};
use crate::optimizer::{
    FailurePolicy, Ranking, RankingOptions, VenueFilter, filter_venues, meeting_point,
    rank_venues, rank_venues_until, venues_within_radius,
};
use crate::routing::{CachingEstimator, GraphHopperEstimator, HaversineEstimator, TravelEstimator};
use crate::{FindMyMapError, Result};

/// Outcome of a planning request
#[derive(Debug)]
pub struct MeetingPlan {
    pub meeting_point: Coordinate,
    pub objective: Objective,
    /// Number of venues that passed filtering and the radius search
    pub candidates: usize,
    pub ranking: Ranking,
}

pub struct MeetingPlanner {
    estimator: Arc<dyn TravelEstimator>,
    options: RankingOptions,
    search_radius_km: Option<f64>,
    costs: CostEstimator,
}

impl MeetingPlanner {
    pub fn new(estimator: Arc<dyn TravelEstimator>, options: RankingOptions) -> Self {
        Self {
            estimator,
            options,
            search_radius_km: None,
            costs: CostEstimator::default(),
        }
    }

    /// Build the estimator stack and ranking options described by `config`
    pub fn from_config(config: &FindMyMapConfig) -> Result<Self> {
        config.validate()?;

        let routing = &config.routing;
        let heuristic = HaversineEstimator::new(routing.road_factor, routing.average_speed_kmh);

        let mut estimator: Arc<dyn TravelEstimator> = match routing.provider {
            RoutingProvider::Haversine => Arc::new(heuristic),
            RoutingProvider::GraphHopper => Arc::new(GraphHopperEstimator::from_config(routing)?),
        };

        if config.cache.enabled {
            let location = Path::new(&config.cache.location);
            std::fs::create_dir_all(location)?;
            let cache = TravelCache::open(location).map_err(|e| {
                FindMyMapError::cache(format!(
                    "Failed to open travel cache at {}: {e}",
                    location.display()
                ))
            })?;
            let ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 3600);
            estimator = Arc::new(CachingEstimator::new(estimator, cache, ttl));
            debug!("Travel cache enabled at {}", location.display());
        }

        let failure_policy = match config.optimizer.on_failure {
            FailureMode::Exclude => FailurePolicy::Exclude,
            FailureMode::Fallback => FailurePolicy::Fallback(heuristic),
        };

        let options = RankingOptions {
            objective: config.optimizer.objective,
            failure_policy,
            max_concurrent_estimates: config.optimizer.max_concurrent_estimates,
        };

        info!(
            "Meeting planner ready: provider {:?}, objective {}, concurrency {}",
            routing.provider, options.objective, options.max_concurrent_estimates
        );

        Ok(Self::new(estimator, options)
            .with_search_radius(config.optimizer.search_radius_km)
            .with_costs(CostEstimator::new(config.costs.clone())))
    }

    #[must_use]
    pub fn with_search_radius(mut self, radius_km: Option<f64>) -> Self {
        self.search_radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn with_costs(mut self, costs: CostEstimator) -> Self {
        self.costs = costs;
        self
    }

    #[must_use]
    pub fn options(&self) -> &RankingOptions {
        &self.options
    }

    /// Compute the meeting point, narrow the venues and rank them.
    ///
    /// `objective` overrides the configured one for this request.
    #[instrument(level = "debug", skip_all, fields(participants = participants.len(), venues = venues.len()))]
    pub async fn plan(
        &self,
        participants: &[Participant],
        venues: &[Venue],
        filter: &VenueFilter,
        objective: Option<Objective>,
    ) -> Result<MeetingPlan> {
        self.plan_until(participants, venues, filter, objective, std::future::pending())
            .await
    }

    /// [`plan`](Self::plan), abandoned with `Cancelled` once `cancel` completes
    pub async fn plan_until<C>(
        &self,
        participants: &[Participant],
        venues: &[Venue],
        filter: &VenueFilter,
        objective: Option<Objective>,
        cancel: C,
    ) -> Result<MeetingPlan>
    where
        C: Future<Output = ()>,
    {
        let options = self
            .options
            .with_objective(objective.unwrap_or(self.options.objective));

        let coordinates: Vec<Coordinate> = participants.iter().map(|p| p.coordinate).collect();
        let point = meeting_point(&coordinates, options.objective)?;
        debug!("Meeting point at {}", point.format_coordinates());

        let mut candidates = filter_venues(venues, filter);
        if let Some(radius_km) = self.search_radius_km {
            candidates = venues_within_radius(&candidates, &point, radius_km);
        }
        debug!("{} of {} venues are candidates", candidates.len(), venues.len());

        let ranking = rank_venues_until(
            participants,
            &candidates,
            self.estimator.as_ref(),
            &options,
            cancel,
        )
        .await?;

        for failure in &ranking.failures {
            warn!("{failure}");
        }
        match ranking.best() {
            Some(best) => info!(
                "Best venue '{}' by {}: score {:.1} min",
                best.venue.id,
                options.objective,
                best.score(options.objective)
            ),
            None => info!("No venue could be ranked"),
        }

        Ok(MeetingPlan {
            meeting_point: point,
            objective: options.objective,
            candidates: candidates.len(),
            ranking,
        })
    }

    /// Rank explicit venues without meeting-point or radius narrowing
    pub async fn rank(&self, participants: &[Participant], venues: &[Venue]) -> Result<Ranking> {
        rank_venues(participants, venues, self.estimator.as_ref(), &self.options).await
    }

    /// Plan one trip with the configured estimator
    pub async fn itinerary(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        departure: DateTime<Utc>,
        mode: TransportMode,
    ) -> Result<Itinerary> {
        plan_itinerary(self.estimator.as_ref(), origin, destination, departure, mode).await
    }

    /// Cost of a `duration_hours` meeting at a ranked venue
    pub fn estimate_costs(&self, ranked: &RankedVenue, duration_hours: f64) -> Result<CostEstimate> {
        self.costs.estimate(ranked, duration_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelTime;
    use crate::routing::{EstimateError, estimator_fn};
    use std::collections::BTreeSet;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn venue(id: &str, lat: f64, lng: f64, rating: f64) -> Venue {
        Venue {
            id: id.to_string(),
            name: id.to_uppercase(),
            coordinate: Coordinate { lat, lng },
            rating,
            price_level: 2,
            capacity: 40,
            amenities: BTreeSet::from(["Projector".to_string()]),
        }
    }

    fn team() -> Vec<Participant> {
        vec![
            Participant::new("alice", Coordinate { lat: 48.10, lng: 11.50 }),
            Participant::new("bob", Coordinate { lat: 48.20, lng: 11.70 }),
        ]
    }

    /// Duration equals great-circle kilometers
    fn distance_estimator() -> Arc<dyn TravelEstimator> {
        Arc::new(estimator_fn(|o: Coordinate, d: Coordinate| async move {
            let km = o.distance_km(&d);
            Ok::<_, EstimateError>(TravelTime::new(km, km))
        }))
    }

    #[test_log::test(tokio::test)]
    async fn test_plan_ranks_filtered_venues() {
        let planner = MeetingPlanner::new(distance_estimator(), RankingOptions::default());
        let venues = vec![
            venue("far", 48.60, 12.40, 4.8),
            venue("near", 48.15, 11.60, 4.5),
            venue("shabby", 48.15, 11.60, 2.0),
        ];
        let filter = VenueFilter {
            min_rating: Some(4.0),
            ..VenueFilter::default()
        };

        let plan = planner.plan(&team(), &venues, &filter, None).await.unwrap();

        assert_eq!(plan.objective, Objective::Average);
        assert_eq!(plan.candidates, 2);
        assert_eq!(plan.ranking.venue_ids(), vec!["near", "far"]);
        assert!((plan.meeting_point.lat - 48.15).abs() < 1e-9);
        assert!((plan.meeting_point.lng - 11.60).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_search_radius_narrows_candidates() {
        let planner = MeetingPlanner::new(distance_estimator(), RankingOptions::default())
            .with_search_radius(Some(10.0));
        let venues = vec![venue("far", 48.60, 12.40, 4.8), venue("near", 48.15, 11.60, 4.5)];

        let plan = planner
            .plan(&team(), &venues, &VenueFilter::default(), Some(Objective::Fairness))
            .await
            .unwrap();

        assert_eq!(plan.objective, Objective::Fairness);
        assert_eq!(plan.candidates, 1);
        assert_eq!(plan.ranking.venue_ids(), vec!["near"]);
    }

    #[tokio::test]
    async fn test_no_participants_is_invalid() {
        let planner = MeetingPlanner::new(distance_estimator(), RankingOptions::default());
        let result = planner
            .plan(&[], &[venue("v", 1.0, 1.0, 4.0)], &VenueFilter::default(), None)
            .await;
        assert!(matches!(result, Err(FindMyMapError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_plan_can_be_cancelled() {
        let slow: Arc<dyn TravelEstimator> =
            Arc::new(estimator_fn(|_o: Coordinate, _d: Coordinate| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, EstimateError>(TravelTime::new(1.0, 1.0))
            }));
        let planner = MeetingPlanner::new(slow, RankingOptions::default());

        let result = planner
            .plan_until(
                &team(),
                &[venue("v", 48.15, 11.60, 4.0)],
                &VenueFilter::default(),
                None,
                tokio::time::sleep(Duration::from_millis(10)),
            )
            .await;

        assert!(matches!(result, Err(FindMyMapError::Cancelled)));
    }

    #[tokio::test]
    async fn test_from_default_config_uses_haversine() {
        let planner = MeetingPlanner::from_config(&FindMyMapConfig::default()).unwrap();
        assert_eq!(planner.options().failure_policy, FailurePolicy::Exclude);

        let ranking = planner
            .rank(&team(), &[venue("v", 48.15, 11.60, 4.0)])
            .await
            .unwrap();
        let expected = HaversineEstimator::default()
            .estimate(&team()[0].coordinate, &Coordinate { lat: 48.15, lng: 11.60 });
        assert_eq!(
            ranking.venues[0].per_participant[0].duration_minutes,
            expected.duration_minutes
        );
    }

    #[tokio::test]
    async fn test_from_config_with_cache_and_fallback() {
        let mut config = FindMyMapConfig::default();
        config.optimizer.on_failure = FailureMode::Fallback;
        config.cache.enabled = true;
        config.cache.location = std::env::temp_dir()
            .join(format!(
                "findmymap-planner-{}-{}",
                std::process::id(),
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ))
            .display()
            .to_string();

        let planner = MeetingPlanner::from_config(&config).unwrap();
        assert!(matches!(
            planner.options().failure_policy,
            FailurePolicy::Fallback(_)
        ));

        let first = planner
            .rank(&team(), &[venue("v", 48.15, 11.60, 4.0)])
            .await
            .unwrap();
        let second = planner
            .rank(&team(), &[venue("v", 48.15, 11.60, 4.0)])
            .await
            .unwrap();
        assert_eq!(
            first.venues[0].average_duration_minutes,
            second.venues[0].average_duration_minutes
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = FindMyMapConfig::default();
        config.routing.road_factor = 0.5;
        assert!(matches!(
            MeetingPlanner::from_config(&config),
            Err(FindMyMapError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn test_itinerary_and_costs() {
        let planner = MeetingPlanner::new(distance_estimator(), RankingOptions::default());
        let departure = Utc::now();

        let trip = planner
            .itinerary(
                team()[0].coordinate,
                team()[1].coordinate,
                departure,
                TransportMode::Driving,
            )
            .await
            .unwrap();
        assert!(trip.arrival > departure);

        let ranking = planner
            .rank(&team(), &[venue("v", 48.15, 11.60, 4.0)])
            .await
            .unwrap();
        let costs = planner.estimate_costs(&ranking.venues[0], 2.0).unwrap();
        assert_eq!(costs.venue_id, "v");
        assert!(costs.total_cost > costs.venue_cost);
    }
}
