//! Itinerary search over a frozen transit graph.
//!
//! Four strategies share one contract, the [`Planner`] trait:
//!
//! - [`TimedPlanner`]: earliest arrival within tight transfer, duration and
//!   boarding limits.
//! - [`ExtendedPlanner`]: first arrival within a wide horizon.
//! - [`TopologicalPlanner`]: connectivity, ignoring the clock.
//! - [`NextDepartureScanner`]: any planner, retried at later start times.
//!
//! [`StrategyPipeline`] tries planners in order and reports which one
//! succeeded.

mod config;
mod pipeline;
mod scanner;
mod search;
mod timed;
mod topological;

pub use config::{ExtendedConfig, ScanConfig, TimedConfig, TopologicalConfig};
pub use pipeline::{PlanOutcome, StrategyPipeline};
pub use scanner::{NextDepartureScanner, ScanHit};
pub use search::{PlanRequest, Planner, SearchError, Strategy};
pub use timed::{ExtendedPlanner, TimedPlanner};
pub use topological::TopologicalPlanner;
