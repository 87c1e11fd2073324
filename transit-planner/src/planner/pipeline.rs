//! Ordered strategy selection.

use std::fmt;

use tracing::debug;

use crate::domain::Itinerary;
use crate::graph::TransitGraph;

use super::search::{PlanRequest, Planner, SearchError, Strategy};
use super::{ExtendedPlanner, TimedPlanner, TopologicalPlanner};

/// The itinerary found and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub strategy: Strategy,
    pub itinerary: Itinerary,
}

/// Runs planners in order until one finds a route.
pub struct StrategyPipeline {
    planners: Vec<Box<dyn Planner + Send + Sync>>,
}

impl StrategyPipeline {
    /// A pipeline over the given planners, tried in order.
    pub fn new(planners: Vec<Box<dyn Planner + Send + Sync>>) -> Self {
        Self { planners }
    }

    /// Primary planner, then the extended fallback.
    pub fn timed() -> Self {
        Self::new(vec![
            Box::new(TimedPlanner::default()),
            Box::new(ExtendedPlanner::default()),
        ])
    }

    /// Connectivity only.
    pub fn topological() -> Self {
        Self::new(vec![Box::new(TopologicalPlanner::default())])
    }

    /// Append a planner to try after the existing ones.
    pub fn then(mut self, planner: impl Planner + Send + Sync + 'static) -> Self {
        self.planners.push(Box::new(planner));
        self
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> Vec<Strategy> {
        self.planners.iter().map(|p| p.strategy()).collect()
    }

    /// Run each planner until one returns an itinerary.
    ///
    /// An error from any planner aborts the run.
    pub fn run(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<PlanOutcome>, SearchError> {
        for planner in &self.planners {
            let strategy = planner.strategy();
            if let Some(itinerary) = planner.plan(graph, request)? {
                debug!(%strategy, origin = %request.origin, destination = %request.destination, "route found");
                return Ok(Some(PlanOutcome {
                    strategy,
                    itinerary,
                }));
            }
            debug!(%strategy, "no route, trying next strategy");
        }
        Ok(None)
    }
}

impl Default for StrategyPipeline {
    fn default() -> Self {
        Self::timed()
    }
}

impl fmt::Debug for StrategyPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyPipeline")
            .field("strategies", &self.strategies())
            .finish()
    }
}
