use std::collections::HashSet;
use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::models::{Objective, Participant, RankedVenue, TravelEstimate, Venue};
use crate::routing::{EstimateError, HaversineEstimator, TravelEstimator};
use crate::{FindMyMapError, Result};

pub const DEFAULT_MAX_CONCURRENT_ESTIMATES: usize = 8;

/// How a failed (participant, venue) estimate is handled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FailurePolicy {
    /// Drop the whole venue and record the failure
    #[default]
    Exclude,
    /// Substitute the heuristic estimate for the failed pair
    Fallback(HaversineEstimator),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    pub objective: Objective,
    pub failure_policy: FailurePolicy,
    /// Upper bound on in-flight estimator calls, at least 1
    pub max_concurrent_estimates: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            objective: Objective::default(),
            failure_policy: FailurePolicy::default(),
            max_concurrent_estimates: DEFAULT_MAX_CONCURRENT_ESTIMATES,
        }
    }
}

impl RankingOptions {
    #[must_use]
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}

/// Ranked venues, best first, plus the venues dropped because an estimate failed
#[derive(Debug, Default)]
pub struct Ranking {
    pub venues: Vec<RankedVenue>,
    /// One `TravelEstimationFailed` per excluded venue
    pub failures: Vec<FindMyMapError>,
}

impl Ranking {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    #[must_use]
    pub fn best(&self) -> Option<&RankedVenue> {
        self.venues.first()
    }

    /// Venue ids in ranking order
    #[must_use]
    pub fn venue_ids(&self) -> Vec<&str> {
        self.venues.iter().map(|r| r.venue.id.as_str()).collect()
    }
}

/// Estimate travel from every participant to every venue and rank the venues
/// ascending by `options.objective`.
///
/// Ties keep the input venue order. Zero venues yields an empty ranking.
/// Participant ids and venue ids must each be unique.
pub async fn rank_venues<E>(
    participants: &[Participant],
    venues: &[Venue],
    estimator: &E,
    options: &RankingOptions,
) -> Result<Ranking>
where
    E: TravelEstimator + ?Sized,
{
    if participants.is_empty() {
        return Err(FindMyMapError::invalid_input(
            "at least one participant is required to rank venues",
        ));
    }
    if options.max_concurrent_estimates == 0 {
        return Err(FindMyMapError::invalid_input(
            "max_concurrent_estimates must be at least 1",
        ));
    }
    for participant in participants {
        participant.coordinate.validate().map_err(|e| {
            FindMyMapError::invalid_input(format!(
                "participant '{}': {}",
                participant.id,
                e.user_message()
            ))
        })?;
    }
    for venue in venues {
        venue.coordinate.validate().map_err(|e| {
            FindMyMapError::invalid_input(format!("venue '{}': {}", venue.id, e.user_message()))
        })?;
    }
    ensure_unique_ids("participant", participants.iter().map(|p| p.id.as_str()))?;
    ensure_unique_ids("venue", venues.iter().map(|v| v.id.as_str()))?;
    if venues.is_empty() {
        return Ok(Ranking::default());
    }

    let pairs = venues.iter().enumerate().flat_map(|(venue_index, venue)| {
        participants
            .iter()
            .enumerate()
            .map(move |(participant_index, participant)| {
                (venue_index, participant_index, venue, participant)
            })
    });

    let mut outcomes: Vec<_> = stream::iter(pairs)
        .map(|(venue_index, participant_index, venue, participant)| async move {
            let outcome = estimator
                .estimate_travel(&participant.coordinate, &venue.coordinate)
                .await
                .and_then(|travel| {
                    if travel.is_valid() {
                        Ok(travel)
                    } else {
                        Err(EstimateError::InvalidEstimate(format!(
                            "distance {} km, duration {} min",
                            travel.distance_km, travel.duration_minutes
                        )))
                    }
                });
            (venue_index, participant_index, outcome)
        })
        .buffer_unordered(options.max_concurrent_estimates)
        .collect()
        .await;

    // Back to venue-major, participant-minor slot order
    outcomes.sort_unstable_by_key(|(venue_index, participant_index, _)| {
        (*venue_index, *participant_index)
    });

    let mut outcomes = outcomes.into_iter();
    let mut ranking = Ranking::default();

    for venue in venues {
        let mut estimates = Vec::with_capacity(participants.len());
        let mut failure = None;

        let venue_outcomes = outcomes.by_ref().take(participants.len());
        for ((_, _, outcome), participant) in venue_outcomes.zip(participants) {
            let travel = match (outcome, &options.failure_policy) {
                (Ok(travel), _) => travel,
                (Err(_), FailurePolicy::Fallback(fallback)) => {
                    fallback.estimate(&participant.coordinate, &venue.coordinate)
                }
                (Err(error), FailurePolicy::Exclude) => {
                    if failure.is_none() {
                        failure = Some(FindMyMapError::travel_estimation(
                            participant.id.as_str(),
                            venue.id.as_str(),
                            error,
                        ));
                    }
                    continue;
                }
            };
            estimates.push(TravelEstimate::from_travel_time(&participant.id, &venue.id, travel));
        }

        match failure {
            Some(error) => ranking.failures.push(error),
            None => ranking.venues.push(RankedVenue::new(venue.clone(), estimates)),
        }
    }

    let objective = options.objective;
    ranking
        .venues
        .sort_by(|a, b| a.score(objective).total_cmp(&b.score(objective)));

    Ok(ranking)
}

fn ensure_unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FindMyMapError::invalid_input(format!(
                "duplicate {kind} id '{id}'"
            )));
        }
    }
    Ok(())
}

/// [`rank_venues`], abandoned as soon as `cancel` completes.
///
/// In-flight estimates are dropped and `Cancelled` is returned; no partial
/// ranking is ever produced.
pub async fn rank_venues_until<E, C>(
    participants: &[Participant],
    venues: &[Venue],
    estimator: &E,
    options: &RankingOptions,
    cancel: C,
) -> Result<Ranking>
where
    E: TravelEstimator + ?Sized,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = cancel => Err(FindMyMapError::Cancelled),
        ranking = rank_venues(participants, venues, estimator, options) => ranking,
    }
}
