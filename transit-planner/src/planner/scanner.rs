//! Retry a planner at later start times.

use chrono::Duration;
use tracing::debug;

use crate::domain::Itinerary;
use crate::graph::TransitGraph;

use super::config::ScanConfig;
use super::search::{PlanRequest, Planner, SearchError, Strategy};

/// A scan result: the itinerary and how far the start had to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub offset: Duration,
    pub itinerary: Itinerary,
}

/// Invokes a planner at `start`, `start + step`, ... until one finds a route.
///
/// Offsets strictly increase and stay below the horizon. The wrapped
/// planner's output is returned as is.
#[derive(Debug, Clone)]
pub struct NextDepartureScanner<P> {
    planner: P,
    config: ScanConfig,
}

impl<P: Planner> NextDepartureScanner<P> {
    pub fn new(planner: P, config: ScanConfig) -> Self {
        Self { planner, config }
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan forward from the request's start time.
    pub fn scan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<ScanHit>, SearchError> {
        let mut attempts = 0usize;
        for offset in self.config.offsets() {
            attempts += 1;
            let Some(start) = request.start.checked_add(offset) else {
                break;
            };

            if let Some(itinerary) = self.planner.plan(graph, &request.starting_at(start))? {
                debug!(
                    strategy = %self.planner.strategy(),
                    offset_mins = offset.num_minutes(),
                    attempts,
                    "later departure found"
                );
                return Ok(Some(ScanHit { offset, itinerary }));
            }
        }

        debug!(attempts, "no departure within scan horizon");
        Ok(None)
    }
}

impl<P: Planner> Planner for NextDepartureScanner<P> {
    fn strategy(&self) -> Strategy {
        self.planner.strategy()
    }

    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        Ok(self.scan(graph, request)?.map(|hit| hit.itinerary))
    }
}
