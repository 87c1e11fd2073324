//! Connectivity search that ignores the clock.
//!
//! Every outgoing connection is traversable regardless of its time. Trip
//! identity is tracked only to count transfers. Useful for "is there any way
//! to get there" questions, and as a last resort when no timed search finds
//! anything.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::domain::{Connection, Itinerary, Leg, StopId, TransitTime, TripId};
use crate::graph::TransitGraph;

use super::config::TopologicalConfig;
use super::search::{PlanRequest, Planner, SearchError, Strategy};

/// BFS state: a path of connections ending at `stop`.
#[derive(Clone)]
struct BfsState<'g> {
    stop: &'g StopId,
    trip: Option<&'g TripId>,
    transfers: usize,
    path: Vec<&'g Connection>,
}

/// Breadth-first planner bounded by transfers and hop depth.
#[derive(Debug, Clone, Default)]
pub struct TopologicalPlanner {
    config: TopologicalConfig,
}

impl TopologicalPlanner {
    pub fn new(config: TopologicalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TopologicalConfig {
        &self.config
    }

    /// Find the path with the fewest hops, within the limits.
    fn find_path<'g>(
        &self,
        graph: &'g TransitGraph,
        origin: &'g StopId,
        destination: &StopId,
    ) -> Option<Vec<&'g Connection>> {
        let mut visited: HashSet<(&StopId, Option<&TripId>)> = HashSet::new();
        let mut queue = VecDeque::new();
        let mut explored = 0usize;

        visited.insert((origin, None));
        queue.push_back(BfsState {
            stop: origin,
            trip: None,
            transfers: 0,
            path: Vec::new(),
        });

        while let Some(state) = queue.pop_front() {
            explored += 1;

            if state.stop == destination {
                debug!(explored, hops = state.path.len(), "topological path found");
                return Some(state.path);
            }

            if state.path.len() >= self.config.max_depth {
                continue;
            }

            for conn in graph.outgoing(state.stop) {
                let transfer = state.trip.is_some_and(|t| t != &conn.trip_id);
                let transfers = state.transfers + usize::from(transfer);
                if transfers > self.config.max_transfers {
                    continue;
                }

                if !visited.insert((&conn.to, Some(&conn.trip_id))) {
                    continue;
                }

                let mut path = state.path.clone();
                path.push(conn);
                queue.push_back(BfsState {
                    stop: &conn.to,
                    trip: Some(&conn.trip_id),
                    transfers,
                    path,
                });
            }
        }

        trace!(explored, "topological search exhausted");
        None
    }
}

/// Turn a path into legs, labelling each hop with its next occurrence after
/// the previous arrival.
fn label_path(path: &[&Connection], start: TransitTime) -> Option<Itinerary> {
    let mut cursor = start;
    let mut previous_trip: Option<&TripId> = None;
    let mut legs = Vec::with_capacity(path.len());

    for conn in path {
        let departure = cursor.next_on_or_after(conn.departure);
        let arrival = departure.next_on_or_after(conn.arrival);
        let transfer = previous_trip.is_some_and(|t| t != &conn.trip_id);

        legs.push(Leg::new(conn, departure, arrival, transfer).ok()?);
        cursor = arrival;
        previous_trip = Some(&conn.trip_id);
    }

    Itinerary::new(legs).ok()
}

impl Planner for TopologicalPlanner {
    fn strategy(&self) -> Strategy {
        Strategy::Topological
    }

    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        request.validate(graph)?;

        Ok(self
            .find_path(graph, &request.origin, &request.destination)
            .and_then(|path| label_path(&path, request.start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceTime;
    use crate::feed::FeedBuilder;
    use crate::graph::{GraphBuilder, ModeFilter};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 16).unwrap()
    }

    fn time(s: &str) -> TransitTime {
        ServiceTime::parse(s).unwrap().on(date())
    }

    /// A line of trips, each running one hop: A-B on T0, B-C on T1, ...
    fn chain(stops: &[&str], times: &[(&str, &str)]) -> TransitGraph {
        let mut feed = FeedBuilder::new()
            .route("R1", None, None, 2)
            .daily_service("WD", date(), date());
        for stop in stops {
            feed = feed.stop(stop, stop);
        }
        for (i, pair) in stops.windows(2).enumerate() {
            let trip = format!("T{i}");
            let (dep, arr) = times[i];
            feed = feed
                .trip(&trip, "R1", "WD", None)
                .stop_time(&trip, pair[0], dep, dep, "1")
                .stop_time(&trip, pair[1], arr, arr, "2");
        }
        GraphBuilder::new(date(), ModeFilter::RailOnly).build(&feed.build())
    }

    fn request(from: &str, to: &str, start: &str) -> PlanRequest {
        PlanRequest::new(from.into(), to.into(), time(start))
    }

    #[test]
    fn ignores_the_clock() {
        // The second hop leaves before the first arrives
        let graph = chain(
            &["A", "B", "C"],
            &[("08:00:00", "08:10:00"), ("07:00:00", "07:10:00")],
        );

        let itinerary = TopologicalPlanner::default()
            .plan(&graph, &request("A", "C", "08:00:00"))
            .unwrap()
            .unwrap();

        assert_eq!(itinerary.leg_count(), 2);
        assert!(itinerary.legs()[1].is_transfer());
        // Labelled with the next occurrence after arriving at B
        let next_day = date().succ_opt().unwrap();
        assert_eq!(itinerary.arrival_time(), ServiceTime::parse("07:10:00").unwrap().on(next_day));
    }

    #[test]
    fn respects_transfer_cap() {
        let stops = ["A", "B", "C", "D", "E", "F", "G"];
        let times = [("08:00:00", "08:10:00"); 6];
        let graph = chain(&stops, &times);
        let planner = TopologicalPlanner::default();

        // A-F needs four transfers, A-G five
        assert!(planner.plan(&graph, &request("A", "F", "08:00:00")).unwrap().is_some());
        assert_eq!(planner.plan(&graph, &request("A", "G", "08:00:00")).unwrap(), None);
    }

    #[test]
    fn respects_depth_cap() {
        let graph = chain(
            &["A", "B", "C"],
            &[("08:00:00", "08:10:00"), ("08:20:00", "08:30:00")],
        );
        let planner = TopologicalPlanner::new(TopologicalConfig::new(4, 1));

        assert!(planner.plan(&graph, &request("A", "B", "08:00:00")).unwrap().is_some());
        assert_eq!(planner.plan(&graph, &request("A", "C", "08:00:00")).unwrap(), None);
    }

    #[test]
    fn finds_fewest_hops() {
        let feed = FeedBuilder::new()
            .stop("A", "A")
            .stop("B", "B")
            .stop("C", "C")
            .stop("D", "D")
            .route("R1", None, None, 2)
            .daily_service("WD", date(), date())
            .trip("LONG", "R1", "WD", None)
            .stop_time("LONG", "A", "08:00:00", "08:00:00", "1")
            .stop_time("LONG", "B", "08:05:00", "08:05:00", "2")
            .stop_time("LONG", "C", "08:10:00", "08:10:00", "3")
            .stop_time("LONG", "D", "08:15:00", "08:15:00", "4")
            .trip("SHORT", "R1", "WD", None)
            .stop_time("SHORT", "A", "09:00:00", "09:00:00", "1")
            .stop_time("SHORT", "D", "09:30:00", "09:30:00", "2")
            .build();
        let graph = GraphBuilder::new(date(), ModeFilter::RailOnly).build(&feed);

        let itinerary = TopologicalPlanner::default()
            .plan(&graph, &request("A", "D", "08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(itinerary.leg_count(), 1);
        assert_eq!(itinerary.legs()[0].trip_id(), &TripId::from("SHORT"));
    }

    #[test]
    fn labels_start_no_earlier_than_request() {
        let graph = chain(&["A", "B"], &[("06:00:00", "06:10:00")]);

        let itinerary = TopologicalPlanner::default()
            .plan(&graph, &request("A", "B", "08:00:00"))
            .unwrap()
            .unwrap();
        assert!(itinerary.departure_time() >= time("08:00:00"));
    }

    #[test]
    fn unreachable_is_none() {
        let graph = chain(&["A", "B"], &[("08:00:00", "08:10:00")]);

        assert_eq!(
            TopologicalPlanner::default()
                .plan(&graph, &request("B", "A", "08:00:00"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn validates_request() {
        let graph = chain(&["A", "B"], &[("08:00:00", "08:10:00")]);

        assert_eq!(
            TopologicalPlanner::default().plan(&graph, &request("A", "X", "08:00:00")),
            Err(SearchError::UnknownStop("X".into()))
        );
    }
}
