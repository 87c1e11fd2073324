//! End-to-end checks through the public API: feed, graph, resolver and
//! planners together.

use chrono::{Duration, NaiveDate};

use transit_planner::domain::{ServiceTime, StopId, TransitTime};
use transit_planner::feed::{FeedBuilder, FeedSnapshot};
use transit_planner::graph::{GraphBuilder, ModeFilter, TransitGraph};
use transit_planner::planner::{
    NextDepartureScanner, PlanRequest, Planner, ScanConfig, StrategyPipeline, TimedPlanner,
};
use transit_planner::resolver::{DirectionAwareResolver, Pairing, StopIndex};
use transit_planner::snapshot::{self, SnapshotKey};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
}

fn at(s: &str) -> TransitTime {
    ServiceTime::parse(s).unwrap().on(date())
}

fn build(feed: &FeedSnapshot) -> TransitGraph {
    GraphBuilder::new(date(), ModeFilter::RailOnly).build(feed)
}

fn request(from: &str, to: &str, start: &str) -> PlanRequest {
    PlanRequest::new(StopId::from(from), StopId::from(to), at(start))
}

#[test]
fn direct_trip_between_same_direction_platforms() {
    let feed = FeedBuilder::new()
        .stop("A", "Alpha")
        .platform("A:1:1", "Alpha", "A")
        .platform("A:2:2", "Alpha", "A")
        .stop("B", "Beta")
        .platform("B:1:1", "Beta", "B")
        .platform("B:2:2", "Beta", "B")
        .route("R1", Some("S1"), None, 2)
        .trip("T1", "R1", "WD", Some("Beta"))
        .stop_time("T1", "A:1:1", "08:00:00", "08:00:00", "1")
        .stop_time("T1", "B:1:1", "08:10:00", "08:10:00", "2")
        .daily_service("WD", date(), date())
        .build();
    let graph = build(&feed);
    let resolver = DirectionAwareResolver::new(StopIndex::from_feed(&feed));

    let resolution = resolver
        .resolve(&graph, "Alpha", "Beta", at("08:00:00"))
        .unwrap()
        .unwrap();

    assert_eq!(resolution.pairing, Pairing::SameDirection1);
    let legs = resolution.itinerary.legs();
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0].departure_time().to_string(), "08:00");
    assert_eq!(legs[0].arrival_time().to_string(), "08:10");
    assert!(!legs[0].is_transfer());
}

fn chain(second_departure: &str) -> FeedSnapshot {
    FeedBuilder::new()
        .stop("A", "Alpha")
        .stop("B", "Beta")
        .stop("C", "Gamma")
        .route("R1", Some("S1"), None, 2)
        .route("R2", Some("S2"), None, 2)
        .trip("T1", "R1", "WD", None)
        .stop_time("T1", "A", "08:00:00", "08:00:00", "1")
        .stop_time("T1", "B", "08:10:00", "08:10:00", "2")
        .trip("T2", "R2", "WD", None)
        .stop_time("T2", "B", second_departure, second_departure, "1")
        .stop_time("T2", "C", "08:30:00", "08:30:00", "2")
        .daily_service("WD", date(), date())
        .build()
}

#[test]
fn transfer_with_enough_dwell() {
    let graph = build(&chain("08:20:00"));

    let itinerary = TimedPlanner::default()
        .plan(&graph, &request("A", "C", "08:00:00"))
        .unwrap()
        .unwrap();

    assert_eq!(itinerary.leg_count(), 2);
    assert!(!itinerary.legs()[0].is_transfer());
    assert!(itinerary.legs()[1].is_transfer());
}

#[test]
fn transfer_with_short_dwell_has_no_route() {
    let graph = build(&chain("08:05:00"));

    let outcome = StrategyPipeline::timed()
        .run(&graph, &request("A", "C", "08:00:00"))
        .unwrap();

    assert!(outcome.is_none());
}

#[test]
fn trip_entering_the_network_contributes_no_edges() {
    let feed = FeedBuilder::new()
        .stop("A", "Alpha")
        .stop("B", "Beta")
        .route("R1", Some("S1"), None, 2)
        .trip("T1", "R1", "WD", None)
        .stop_time("T1", "FAR", "07:50:00", "07:50:00", "1")
        .stop_time("T1", "A", "08:00:00", "08:00:00", "2")
        .stop_time("T1", "B", "08:10:00", "08:10:00", "3")
        .daily_service("WD", date(), date())
        .build();

    let graph = build(&feed);

    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.node_count(), 2);
}

fn late_only() -> FeedSnapshot {
    FeedBuilder::new()
        .stop("A", "Alpha")
        .stop("B", "Beta")
        .route("R1", Some("S1"), None, 2)
        .trip("T1", "R1", "WD", None)
        .stop_time("T1", "A", "10:00:00", "10:00:00", "1")
        .stop_time("T1", "B", "10:15:00", "10:15:00", "2")
        .daily_service("WD", date(), date())
        .build()
}

#[test]
fn scanner_finds_a_later_departure() {
    let graph = build(&late_only());
    let req = request("A", "B", "08:00:00");
    let scanner = NextDepartureScanner::new(TimedPlanner::default(), ScanConfig::default());

    assert!(TimedPlanner::default().plan(&graph, &req).unwrap().is_none());

    let hit = scanner.scan(&graph, &req).unwrap().unwrap();
    assert_eq!(hit.offset, Duration::minutes(90));
    assert!(hit.itinerary.departure_time() >= req.start);
    assert_eq!(hit.itinerary.departure_time().to_string(), "10:00");
}

#[test]
fn scanner_gives_up_at_the_horizon() {
    let graph = build(&late_only());
    let scanner = NextDepartureScanner::new(
        TimedPlanner::default(),
        ScanConfig {
            horizon_mins: 60,
            step_mins: 5,
        },
    );

    assert!(
        scanner
            .scan(&graph, &request("A", "B", "08:00:00"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn scan_offsets_strictly_increase() {
    for config in [ScanConfig::default(), ScanConfig::coarse()] {
        let offsets: Vec<Duration> = config.offsets().collect();
        assert!(!offsets.is_empty());
        assert_eq!(offsets[0], Duration::zero());
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert!(offsets.iter().all(|o| *o < config.horizon()));
    }
}

#[test]
fn resolver_with_scanner_pipeline() {
    let feed = late_only();
    let graph = build(&feed);
    let scanner = NextDepartureScanner::new(TimedPlanner::default(), ScanConfig::default());
    let resolver = DirectionAwareResolver::new(StopIndex::from_feed(&feed))
        .with_pipeline(StrategyPipeline::new(vec![Box::new(scanner)]));

    let resolution = resolver
        .resolve(&graph, "Alpha", "Beta", at("08:00:00"))
        .unwrap()
        .unwrap();

    assert_eq!(resolution.pairing, Pairing::Other);
    assert_eq!(resolution.itinerary.arrival_time().to_string(), "10:15");
}

#[test]
fn restored_snapshot_plans_like_a_rebuild() {
    let feed = chain("08:20:00");
    let builder = GraphBuilder::new(date(), ModeFilter::RailOnly);
    let graph = builder.build(&feed);
    let key = SnapshotKey::new(&feed, builder.date(), builder.mode());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");

    snapshot::save(&path, &key, &graph).unwrap();
    let restored = snapshot::load(&path, &key).unwrap().unwrap();

    assert_eq!(restored, graph);
    let req = request("A", "C", "08:00:00");
    assert_eq!(
        TimedPlanner::default().plan(&restored, &req).unwrap(),
        TimedPlanner::default().plan(&graph, &req).unwrap()
    );
}
