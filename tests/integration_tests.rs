//! Integration tests for the FindMyMap public API

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use findmymap::{
    Coordinate, EstimateError, FailurePolicy, FindMyMapConfig, FindMyMapError, HaversineEstimator,
    MeetingPlanner, Objective, Participant, RankingOptions, TravelEstimator, TravelTime, Venue,
    VenueFilter, compare_venues, estimator_fn, filter_venues, load_venues, rank_venues,
    rank_venues_until,
};

fn venue(id: &str, lat: f64, lng: f64, rating: f64, capacity: u32, amenities: &[&str]) -> Venue {
    Venue {
        id: id.to_string(),
        name: format!("Venue {id}"),
        coordinate: Coordinate { lat, lng },
        rating,
        price_level: 2,
        capacity,
        amenities: amenities.iter().map(|a| a.to_string()).collect::<BTreeSet<_>>(),
    }
}

/// Three colleagues around Berlin
fn berlin_team() -> Vec<Participant> {
    vec![
        Participant::new("anna", Coordinate { lat: 52.52, lng: 13.40 }).with_name("Anna"),
        Participant::new("ben", Coordinate { lat: 52.40, lng: 13.06 }).with_name("Ben"),
        Participant::new("cleo", Coordinate { lat: 52.39, lng: 13.52 }).with_name("Cleo"),
    ]
}

fn berlin_venues() -> Vec<Venue> {
    vec![
        venue("mitte", 52.52, 13.40, 4.6, 30, &["Projector", "WiFi"]),
        venue("potsdam", 52.40, 13.06, 4.2, 80, &["Projector"]),
        venue("schoeneberg", 52.48, 13.35, 4.8, 20, &["Projector", "WiFi", "AV Equipment"]),
        venue("hostel", 52.47, 13.33, 2.9, 12, &[]),
    ]
}

#[tokio::test]
async fn test_end_to_end_ranking_with_heuristic_estimator() {
    let estimator = HaversineEstimator::default();
    let candidates = filter_venues(
        &berlin_venues(),
        &VenueFilter {
            min_rating: Some(4.0),
            required_amenities: BTreeSet::from(["Projector".to_string()]),
            min_capacity: None,
        },
    );
    assert_eq!(candidates.len(), 3);

    let ranking = rank_venues(&berlin_team(), &candidates, &estimator, &RankingOptions::default())
        .await
        .unwrap();

    assert_eq!(ranking.len(), 3);
    assert!(ranking.failures.is_empty());
    // The central venue beats the one at a participant's doorstep on the edge of town
    assert_eq!(ranking.best().unwrap().venue.id, "schoeneberg");
    for pair in ranking.venues.windows(2) {
        assert!(pair[0].average_duration_minutes <= pair[1].average_duration_minutes);
    }
    for ranked in &ranking.venues {
        assert_eq!(ranked.per_participant.len(), 3);
    }
}

#[tokio::test]
async fn test_objectives_can_disagree() {
    // venue 0 is quick for most but terrible for one person
    let estimator = estimator_fn(|origin: Coordinate, destination: Coordinate| async move {
        let minutes = match (origin.lat as i64, destination.lng as i64) {
            (0, 0) | (1, 0) => 5.0,
            (2, 0) => 60.0,
            (_, _) => 24.0,
        };
        Ok::<_, EstimateError>(TravelTime::new(minutes, minutes))
    });
    let participants: Vec<_> = (0..3_i32)
        .map(|i| Participant::new(format!("p{i}"), Coordinate { lat: f64::from(i), lng: 0.0 }))
        .collect();
    let venues = vec![venue("v0", 10.0, 0.0, 4.0, 10, &[]), venue("v1", 10.0, 1.0, 4.0, 10, &[])];

    let average = rank_venues(&participants, &venues, &estimator, &RankingOptions::default())
        .await
        .unwrap();
    let fairness = rank_venues(
        &participants,
        &venues,
        &estimator,
        &RankingOptions::default().with_objective(Objective::Fairness),
    )
    .await
    .unwrap();
    let total = rank_venues(
        &participants,
        &venues,
        &estimator,
        &RankingOptions::default().with_objective(Objective::Total),
    )
    .await
    .unwrap();

    assert_eq!(average.venue_ids(), vec!["v0", "v1"]);
    assert_eq!(total.venue_ids(), vec!["v0", "v1"]);
    assert_eq!(fairness.venue_ids(), vec!["v1", "v0"]);
}

#[tokio::test]
async fn test_flaky_backend_excludes_or_falls_back() {
    let flaky = Arc::new(estimator_fn(|_origin: Coordinate, destination: Coordinate| async move {
        if destination.lng > 13.2 && destination.lng < 13.38 {
            Err(EstimateError::RateLimited("slow down".to_string()))
        } else {
            Ok(TravelTime::new(10.0, 15.0))
        }
    }));
    let venues = vec![
        venue("mitte", 52.52, 13.40, 4.6, 30, &[]),
        venue("schoeneberg", 52.48, 13.35, 4.8, 20, &[]),
    ];

    let excluded = rank_venues(&berlin_team(), &venues, &flaky, &RankingOptions::default())
        .await
        .unwrap();
    assert_eq!(excluded.venue_ids(), vec!["mitte"]);
    assert_eq!(excluded.failures.len(), 1);
    assert!(matches!(
        &excluded.failures[0],
        FindMyMapError::TravelEstimationFailed { venue_id, source: EstimateError::RateLimited(_), .. }
            if venue_id == "schoeneberg"
    ));

    let options = RankingOptions {
        failure_policy: FailurePolicy::Fallback(HaversineEstimator::default()),
        ..RankingOptions::default()
    };
    let kept = rank_venues(&berlin_team(), &venues, &flaky, &options)
        .await
        .unwrap();
    assert_eq!(kept.len(), 2);
    assert!(kept.failures.is_empty());
}

#[tokio::test]
async fn test_cancelled_request_yields_no_ranking() {
    let stalled: Arc<dyn TravelEstimator> =
        Arc::new(estimator_fn(|_o: Coordinate, _d: Coordinate| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, EstimateError>(TravelTime::new(1.0, 1.0))
        }));

    let result = rank_venues_until(
        &berlin_team(),
        &berlin_venues(),
        stalled.as_ref(),
        &RankingOptions::default(),
        tokio::time::sleep(Duration::from_millis(25)),
    )
    .await;

    assert!(matches!(result, Err(FindMyMapError::Cancelled)));
}

#[tokio::test]
async fn test_planner_from_config_and_compare() {
    let mut config = FindMyMapConfig::default();
    config.optimizer.objective = Objective::Fairness;
    config.optimizer.search_radius_km = Some(25.0);

    let planner = MeetingPlanner::from_config(&config).unwrap();
    let plan = planner
        .plan(&berlin_team(), &berlin_venues(), &VenueFilter::default(), None)
        .await
        .unwrap();

    assert_eq!(plan.objective, Objective::Fairness);
    assert_eq!(plan.candidates, 4);
    assert_eq!(plan.ranking.len(), 4);
    for pair in plan.ranking.venues.windows(2) {
        assert!(pair[0].max_duration_minutes <= pair[1].max_duration_minutes);
    }

    let compared = compare_venues(&plan.ranking.venues, &["potsdam", "mitte"]).unwrap();
    let ids: Vec<_> = compared.iter().map(|r| r.venue.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"potsdam") && ids.contains(&"mitte"));

    let costs = planner.estimate_costs(compared[0], 3.0).unwrap();
    assert!(costs.total_cost > 0.0);
}

#[tokio::test]
async fn test_empty_venue_list_is_not_an_error() {
    let ranking = rank_venues(
        &berlin_team(),
        &[],
        &HaversineEstimator::default(),
        &RankingOptions::default(),
    )
    .await
    .unwrap();
    assert!(ranking.is_empty());
}

#[tokio::test]
async fn test_plan_from_venue_catalogue_file() {
    let path = std::env::temp_dir().join(format!("findmymap-venues-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"[
            {"id": "kreuzberg", "coordinate": {"lat": 52.49, "lng": 13.40}, "rating": 4.4,
             "price_level": 2, "capacity": 30, "amenities": ["Projector"]},
            {"id": "spandau", "coordinate": {"lat": 52.53, "lng": 13.20}, "rating": 4.0,
             "price_level": 1, "capacity": 10}
        ]"#,
    )
    .unwrap();

    let venues = load_venues(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(venues.len(), 2);

    let planner = MeetingPlanner::from_config(&FindMyMapConfig::default()).unwrap();
    let filter = VenueFilter {
        min_capacity: Some(20),
        ..VenueFilter::default()
    };
    let plan = planner.plan(&berlin_team(), &venues, &filter, None).await.unwrap();
    assert_eq!(plan.ranking.venue_ids(), vec!["kreuzberg"]);

    assert!(matches!(
        load_venues(std::env::temp_dir().join("findmymap-no-such-catalogue.json")),
        Err(FindMyMapError::Io { .. })
    ));
}
