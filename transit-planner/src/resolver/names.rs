//! Stop lookup by display name and station grouping.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Stop, StopId};
use crate::feed::FeedSnapshot;
use crate::graph::TransitGraph;

/// Marker for temporary replacement stops.
const REPLACEMENT_MARKER: &str = "Ersatz";

/// Stops indexed for name matching and parent-station expansion.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    /// Sorted by id so lookups are deterministic.
    stops: Vec<Stop>,
    children: HashMap<StopId, Vec<StopId>>,
}

impl StopIndex {
    /// Index the given stops.
    pub fn new(stops: impl IntoIterator<Item = Stop>) -> Self {
        let mut stops: Vec<Stop> = stops.into_iter().collect();
        stops.sort_by(|a, b| a.id.cmp(&b.id));
        stops.dedup_by(|a, b| a.id == b.id);

        let mut children: HashMap<StopId, Vec<StopId>> = HashMap::new();
        for stop in &stops {
            if let Some(parent) = &stop.parent_station {
                children.entry(parent.clone()).or_default().push(stop.id.clone());
            }
        }

        Self { stops, children }
    }

    /// Index the stops of a feed.
    pub fn from_feed(feed: &FeedSnapshot) -> Self {
        Self::new(feed.domain_stops())
    }

    /// Index the nodes of a graph.
    pub fn from_graph(graph: &TransitGraph) -> Self {
        Self::new(graph.stops().cloned())
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops whose name contains `name`, ignoring case.
    ///
    /// Replacement ("Ersatz") stops are returned only when nothing else
    /// matches.
    pub fn matching(&self, name: &str) -> Vec<&Stop> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let matches: Vec<&Stop> = self
            .stops
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect();

        let regular: Vec<&Stop> = matches
            .iter()
            .copied()
            .filter(|s| !s.name.contains(REPLACEMENT_MARKER))
            .collect();

        if regular.is_empty() { matches } else { regular }
    }

    /// All stop ids of the station `id` belongs to.
    ///
    /// A parent station expands to its platforms, a platform to itself and
    /// its siblings, and a stop without grouping to itself.
    pub fn station_ids(&self, id: &StopId) -> Vec<StopId> {
        if let Some(platforms) = self.children.get(id) {
            return platforms.clone();
        }

        let parent = self
            .stops
            .binary_search_by(|s| s.id.cmp(id))
            .ok()
            .and_then(|i| self.stops[i].parent_station.as_ref());

        match parent.and_then(|p| self.children.get(p)) {
            Some(siblings) => siblings.clone(),
            None => vec![id.clone()],
        }
    }

    /// Match `name` and expand every match to its whole station.
    ///
    /// The result is sorted and free of duplicates.
    pub fn expand(&self, name: &str) -> Vec<StopId> {
        let ids: BTreeSet<StopId> = self
            .matching(name)
            .into_iter()
            .flat_map(|stop| self.station_ids(&stop.id))
            .collect();
        ids.into_iter().collect()
    }
}
