//! The shared planner contract.
//!
//! Every search strategy answers the same question: "leaving `origin` at
//! `start`, how do I reach `destination`?" They differ only in which
//! itineraries they consider acceptable.

use std::fmt;

use crate::domain::{Itinerary, StopId, TransitTime};
use crate::graph::TransitGraph;

/// Error from a planner.
///
/// "No route" is not an error: planners return `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The graph has no stops, usually because the feed was incomplete
    #[error("transit graph is empty")]
    EmptyGraph,

    /// A requested stop is not a node of the graph
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Which strategy produced an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Earliest arrival within tight transfer, duration and boarding limits
    Primary,
    /// First arrival found within a wide horizon
    Extended,
    /// Connectivity only, ignoring the clock
    Topological,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Primary => "primary",
            Strategy::Extended => "extended",
            Strategy::Topological => "topological",
        })
    }
}

/// Request for a single origin/destination search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// Boarding stop.
    pub origin: StopId,

    /// Alighting stop.
    pub destination: StopId,

    /// Earliest time the rider is at the origin.
    pub start: TransitTime,
}

impl PlanRequest {
    /// Create a new plan request.
    pub fn new(origin: StopId, destination: StopId, start: TransitTime) -> Self {
        Self {
            origin,
            destination,
            start,
        }
    }

    /// The same request with a different start time.
    pub fn starting_at(&self, start: TransitTime) -> Self {
        Self {
            start,
            ..self.clone()
        }
    }

    /// Validate the request against a graph.
    pub fn validate(&self, graph: &TransitGraph) -> Result<(), SearchError> {
        if graph.is_empty() {
            return Err(SearchError::EmptyGraph);
        }

        for stop in [&self.origin, &self.destination] {
            if !graph.contains(stop) {
                return Err(SearchError::UnknownStop(stop.clone()));
            }
        }

        if self.origin == self.destination {
            return Err(SearchError::InvalidRequest(
                "origin and destination are the same stop".to_string(),
            ));
        }

        Ok(())
    }
}

/// A search strategy over a frozen graph.
///
/// Implementations must not mutate shared state: all bookkeeping lives in
/// the call, so one graph can serve any number of concurrent searches.
pub trait Planner {
    /// The strategy this planner implements.
    fn strategy(&self) -> Strategy;

    /// Plan an itinerary, returning `Ok(None)` if no acceptable route exists.
    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError>;
}

impl<P: Planner + ?Sized> Planner for Box<P> {
    fn strategy(&self) -> Strategy {
        (**self).strategy()
    }

    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        (**self).plan(graph, request)
    }
}
