//! Public-transit journey planner.
//!
//! Turns a timetable feed into a frozen, date-specific connection graph and
//! answers "how do I get from A to B, leaving around time T?" with an
//! ordered list of legs.

pub mod cache;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod planner;
pub mod report;
pub mod resolver;
pub mod snapshot;
