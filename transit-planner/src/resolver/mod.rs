//! Direction-aware stop resolution.
//!
//! A station name usually maps to several stop ids: the station itself and
//! one platform per direction. The resolver expands both names to every
//! platform, then tries `(start, end)` id pairs in order of how likely they
//! are to be the intended direction, running the strategy pipeline on each
//! until one yields an itinerary.

mod direction;
mod names;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::{Itinerary, StopId, TransitTime};
use crate::graph::TransitGraph;
use crate::planner::{PlanRequest, SearchError, Strategy, StrategyPipeline};

pub use direction::{
    DirectionBucket, DirectionClassifier, DirectionGroups, Pairing, SuffixClassifier,
    candidate_pairs,
};
pub use names::StopIndex;

/// Error from stop resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A place name matched no stop
    #[error("no stop matches {name:?}")]
    NoStopMatch { name: String },

    /// A search failed for a reason other than "no route"
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A resolved itinerary and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Stop id the itinerary starts from.
    pub start: StopId,

    /// Stop id the itinerary ends at.
    pub end: StopId,

    /// The bucket pairing that produced it.
    pub pairing: Pairing,

    /// The strategy that produced it.
    pub strategy: Strategy,

    pub itinerary: Itinerary,
}

/// Resolves place names to stop ids and plans between them.
pub struct DirectionAwareResolver {
    index: StopIndex,
    classifier: Box<dyn DirectionClassifier + Send + Sync>,
    pipeline: StrategyPipeline,
}

impl DirectionAwareResolver {
    /// A resolver using suffix classification and the timed pipeline.
    pub fn new(index: StopIndex) -> Self {
        Self {
            index,
            classifier: Box::new(SuffixClassifier::default()),
            pipeline: StrategyPipeline::timed(),
        }
    }

    /// Use a different direction convention.
    pub fn with_classifier(
        mut self,
        classifier: impl DirectionClassifier + Send + Sync + 'static,
    ) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Use a different set of strategies for each pair.
    pub fn with_pipeline(mut self, pipeline: StrategyPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn index(&self) -> &StopIndex {
        &self.index
    }

    /// Stop ids a place name resolves to, split by direction.
    pub fn candidates(&self, name: &str) -> Result<DirectionGroups, ResolveError> {
        let ids = self.index.expand(name);
        if ids.is_empty() {
            return Err(ResolveError::NoStopMatch {
                name: name.to_string(),
            });
        }
        Ok(DirectionGroups::partition(&ids, self.classifier.as_ref()))
    }

    /// Plan from `start_name` to `end_name`, leaving at `start`.
    ///
    /// Returns `Ok(None)` when every pairing is exhausted without a route.
    pub fn resolve(
        &self,
        graph: &TransitGraph,
        start_name: &str,
        end_name: &str,
        start: TransitTime,
    ) -> Result<Option<Resolution>, ResolveError> {
        let from = self.candidates(start_name)?;
        let to = self.candidates(end_name)?;
        if graph.is_empty() {
            return Err(SearchError::EmptyGraph.into());
        }

        debug!(
            start_name,
            end_name,
            start_ids = from.all().len(),
            end_ids = to.all().len(),
            "resolving"
        );

        let mut tried: HashSet<(&StopId, &StopId)> = HashSet::new();

        for pairing in Pairing::ORDER {
            for (s, e) in candidate_pairs(pairing, &from, &to) {
                if s == e || !tried.insert((s, e)) {
                    continue;
                }

                let request = PlanRequest::new(s.clone(), e.clone(), start);
                match self.pipeline.run(graph, &request) {
                    Ok(Some(outcome)) => {
                        debug!(
                            %pairing,
                            start = %s,
                            end = %e,
                            strategy = %outcome.strategy,
                            "resolved"
                        );
                        return Ok(Some(Resolution {
                            start: s.clone(),
                            end: e.clone(),
                            pairing,
                            strategy: outcome.strategy,
                            itinerary: outcome.itinerary,
                        }));
                    }
                    Ok(None) => {}
                    Err(SearchError::UnknownStop(id)) => {
                        trace!(stop = %id, "stop not in graph, skipping pair");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        debug!(start_name, end_name, pairs = tried.len(), "no route for any pairing");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceTime;
    use crate::feed::{FeedBuilder, FeedSnapshot};
    use crate::graph::{GraphBuilder, ModeFilter};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 16).unwrap()
    }

    fn time(s: &str) -> TransitTime {
        ServiceTime::parse(s).unwrap().on(date())
    }

    /// Two stations with a platform per direction; only `trip_stops` are linked.
    fn feed(trip_stops: (&str, &str), dep: &str, arr: &str) -> FeedSnapshot {
        FeedBuilder::new()
            .stop("A", "Alpha")
            .platform("A:1:1", "Alpha", "A")
            .platform("A:2:2", "Alpha", "A")
            .stop("B", "Beta")
            .platform("B:1:1", "Beta", "B")
            .platform("B:2:2", "Beta", "B")
            .route("R1", Some("S1"), None, 2)
            .trip("T1", "R1", "WD", None)
            .stop_time("T1", trip_stops.0, dep, dep, "1")
            .stop_time("T1", trip_stops.1, arr, arr, "2")
            .daily_service("WD", date(), date())
            .build()
    }

    fn setup(feed: &FeedSnapshot) -> (TransitGraph, DirectionAwareResolver) {
        let graph = GraphBuilder::new(date(), ModeFilter::RailOnly).build(feed);
        let resolver = DirectionAwareResolver::new(StopIndex::from_feed(feed));
        (graph, resolver)
    }

    #[test]
    fn same_direction_first() {
        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let (graph, resolver) = setup(&feed);

        let res = resolver
            .resolve(&graph, "alpha", "beta", time("08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(res.pairing, Pairing::SameDirection1);
        assert_eq!(res.start, StopId::from("A:1:1"));
        assert_eq!(res.end, StopId::from("B:1:1"));
        assert_eq!(res.strategy, Strategy::Primary);
    }

    #[test]
    fn cross_direction_when_needed() {
        let feed = feed(("A:2:2", "B:1:1"), "08:00:00", "08:10:00");
        let (graph, resolver) = setup(&feed);

        let res = resolver
            .resolve(&graph, "Alpha", "Beta", time("08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(res.pairing, Pairing::Cross21);
    }

    #[test]
    fn fallback_strategy_is_reported() {
        let feed = feed(("A:1:1", "B:1:1"), "12:00:00", "12:10:00");
        let (graph, resolver) = setup(&feed);

        let res = resolver
            .resolve(&graph, "Alpha", "Beta", time("08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(res.strategy, Strategy::Extended);
    }

    #[test]
    fn no_match_is_an_error() {
        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let (graph, resolver) = setup(&feed);

        assert_eq!(
            resolver.resolve(&graph, "Gamma", "Beta", time("08:00:00")),
            Err(ResolveError::NoStopMatch {
                name: "Gamma".into()
            })
        );
    }

    #[test]
    fn exhausted_pairings_are_none() {
        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let (graph, resolver) = setup(&feed);

        assert_eq!(
            resolver
                .resolve(&graph, "Beta", "Alpha", time("08:00:00"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn empty_graph_is_an_error() {
        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let resolver = DirectionAwareResolver::new(StopIndex::from_feed(&feed));

        assert_eq!(
            resolver.resolve(&TransitGraph::empty(), "Alpha", "Beta", time("08:00:00")),
            Err(ResolveError::Search(SearchError::EmptyGraph))
        );
    }

    #[test]
    fn custom_classifier_changes_precedence() {
        // Classify everything as "other": the first successful pairing is then
        // other -> other
        struct Flat;
        impl DirectionClassifier for Flat {
            fn classify(&self, _id: &StopId) -> DirectionBucket {
                DirectionBucket::Other
            }
        }

        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let (graph, resolver) = setup(&feed);
        let resolver = resolver.with_classifier(Flat);

        let res = resolver
            .resolve(&graph, "Alpha", "Beta", time("08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(res.pairing, Pairing::Other);
    }

    #[test]
    fn custom_pipeline() {
        let feed = feed(("A:1:1", "B:1:1"), "06:00:00", "06:10:00");
        let (graph, resolver) = setup(&feed);
        let resolver = resolver.with_pipeline(StrategyPipeline::topological());

        let res = resolver
            .resolve(&graph, "Alpha", "Beta", time("08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(res.strategy, Strategy::Topological);
    }

    #[test]
    fn candidates_are_grouped() {
        let feed = feed(("A:1:1", "B:1:1"), "08:00:00", "08:10:00");
        let (_, resolver) = setup(&feed);

        let groups = resolver.candidates("Alpha").unwrap();
        assert_eq!(
            groups.bucket(DirectionBucket::Direction1),
            &[StopId::from("A:1:1")][..]
        );
        assert_eq!(groups.all().len(), 2);
    }
}
