//! The frozen transit graph.
//!
//! A [`TransitGraph`] is a directed multigraph: every feed stop is a node,
//! and every scheduled hop is a [`Connection`] stored in the adjacency list of
//! its departure stop. It is produced once by [`GraphBuilder`] and exposes no
//! mutating API afterwards, so planners can share it freely.

mod builder;
mod calendar;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Connection, Stop, StopId};
use crate::feed::FeedTable;
use crate::feed::records::route_type;

pub use builder::{BuildStats, GraphBuilder};
pub use calendar::{CalendarPolicy, valid_service_ids};

/// Errors that prevent a graph from being built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A required feed table is missing or has no rows
    #[error("feed incomplete: {table} is missing or empty")]
    FeedIncomplete { table: FeedTable },
}

/// Which vehicle modes contribute connections to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeFilter {
    /// Tram, metro and rail
    #[default]
    RailOnly,
    /// Rail modes plus bus
    RailAndBus,
}

impl ModeFilter {
    /// Returns true if routes of `route_type` pass this filter.
    pub fn admits(&self, code: u16) -> bool {
        match self {
            ModeFilter::RailOnly => matches!(
                code,
                route_type::TRAM | route_type::METRO | route_type::RAIL
            ),
            ModeFilter::RailAndBus => matches!(
                code,
                route_type::TRAM | route_type::METRO | route_type::RAIL | route_type::BUS
            ),
        }
    }

    /// Short label used in logs and snapshot keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeFilter::RailOnly => "rail",
            ModeFilter::RailAndBus => "rail-and-bus",
        }
    }
}

/// Stops and their outgoing scheduled hops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitGraph {
    stops: HashMap<StopId, Stop>,
    adjacency: HashMap<StopId, Vec<Connection>>,
}

impl TransitGraph {
    /// A graph with no nodes or edges.
    ///
    /// This is what building an incomplete feed yields.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        stops: HashMap<StopId, Stop>,
        adjacency: HashMap<StopId, Vec<Connection>>,
    ) -> Self {
        Self { stops, adjacency }
    }

    /// Number of stops.
    pub fn node_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of connections.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// True if the graph has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// True if `id` is a node.
    pub fn contains(&self, id: &StopId) -> bool {
        self.stops.contains_key(id)
    }

    /// Look up a stop.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// All stops, in no particular order.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    /// Connections departing `id`, ordered by trip then stop sequence.
    pub fn outgoing(&self, id: &StopId) -> &[Connection] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every connection in the graph.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.adjacency.values().flatten()
    }

    /// Display name for a stop, or a placeholder naming the id.
    pub fn stop_name(&self, id: &StopId) -> String {
        match self.stops.get(id) {
            Some(stop) => stop.name.clone(),
            None => format!("Unknown stop ({id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceTime, TripId};

    fn graph() -> TransitGraph {
        let mut stops = HashMap::new();
        for (id, name) in [("A", "Alpha"), ("B", "Beta"), ("C", "Gamma")] {
            stops.insert(StopId::from(id), Stop::new(id, name));
        }
        let conn = Connection {
            from: StopId::from("A"),
            to: StopId::from("B"),
            departure: ServiceTime::parse("08:00:00").unwrap(),
            arrival: ServiceTime::parse("08:10:00").unwrap(),
            trip_id: TripId::from("T1"),
            route_name: None,
            direction: None,
        };
        let mut adjacency = HashMap::new();
        adjacency.insert(StopId::from("A"), vec![conn]);
        TransitGraph::from_parts(stops, adjacency)
    }

    #[test]
    fn counts() {
        let g = graph();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert!(!g.is_empty());
        assert!(TransitGraph::empty().is_empty());
    }

    #[test]
    fn outgoing_of_stop_without_edges_is_empty() {
        let g = graph();
        assert_eq!(g.outgoing(&StopId::from("A")).len(), 1);
        assert!(g.outgoing(&StopId::from("C")).is_empty());
        assert!(g.outgoing(&StopId::from("nope")).is_empty());
    }

    #[test]
    fn stop_name_falls_back_to_placeholder() {
        let g = graph();
        assert_eq!(g.stop_name(&StopId::from("B")), "Beta");
        assert_eq!(g.stop_name(&StopId::from("Q")), "Unknown stop (Q)");
    }

    #[test]
    fn mode_filter_admission() {
        assert!(ModeFilter::RailOnly.admits(route_type::TRAM));
        assert!(ModeFilter::RailOnly.admits(route_type::RAIL));
        assert!(!ModeFilter::RailOnly.admits(route_type::BUS));
        assert!(ModeFilter::RailAndBus.admits(route_type::BUS));
        assert!(!ModeFilter::RailAndBus.admits(4));
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransitGraph>();
    }
}
