//! In-memory cache of built transit graphs.
//!
//! Building a graph from a feed is the most expensive step in answering a
//! query. Graphs are immutable once built, so they are shared as `Arc`s and
//! keyed by the same [`SnapshotKey`] used for persisted snapshots. A miss
//! falls through to the snapshot file, then to a fresh build.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;
use tracing::{debug, info, warn};

use crate::feed::FeedSnapshot;
use crate::graph::{BuildError, GraphBuilder, TransitGraph};
use crate::snapshot::{self, SnapshotError, SnapshotKey};

/// Error obtaining a graph.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached graphs.
    pub ttl: Duration,

    /// Maximum number of cached graphs.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 8,
        }
    }
}

/// Cache of built graphs, one per (feed, date, mode).
pub struct GraphCache {
    graphs: MokaCache<SnapshotKey, Arc<TransitGraph>>,
}

impl GraphCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let graphs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { graphs }
    }

    /// The graph `builder` would produce from `feed`, building it at most
    /// once per key.
    pub fn get_or_build(&self, feed: &FeedSnapshot, builder: &GraphBuilder) -> Arc<TransitGraph> {
        let key = SnapshotKey::new(feed, builder.date(), builder.mode());
        self.graphs.get_with(key, || {
            debug!(date = %builder.date(), mode = builder.mode().as_str(), "graph cache miss");
            Arc::new(builder.build(feed))
        })
    }

    /// The graph for `feed` and `builder`, from memory, then from the
    /// snapshot at `snapshot_path`, then built (and saved to the snapshot).
    ///
    /// Unlike [`GraphCache::get_or_build`] an incomplete feed is an error.
    /// An unreadable snapshot is logged and rebuilt.
    pub fn load_or_build(
        &self,
        feed: &FeedSnapshot,
        builder: &GraphBuilder,
        snapshot_path: Option<&Path>,
    ) -> Result<Arc<TransitGraph>, LoadError> {
        let key = SnapshotKey::new(feed, builder.date(), builder.mode());
        if let Some(graph) = self.graphs.get(&key) {
            debug!(date = %builder.date(), "graph cache hit");
            return Ok(graph);
        }

        let restored = match snapshot_path {
            Some(path) => match snapshot::load(path, &key) {
                Ok(graph) => graph,
                Err(e) => {
                    warn!(error = %e, "unreadable snapshot, rebuilding");
                    None
                }
            },
            None => None,
        };

        let graph = match restored {
            Some(graph) => graph,
            None => {
                let (graph, stats) = builder.build_with_stats(feed)?;
                info!(?stats, "graph built");
                if let Some(path) = snapshot_path {
                    snapshot::save(path, &key, &graph)?;
                }
                graph
            }
        };

        let graph = Arc::new(graph);
        self.graphs.insert(key, Arc::clone(&graph));
        Ok(graph)
    }

    /// Get a cached graph.
    pub fn get(&self, key: &SnapshotKey) -> Option<Arc<TransitGraph>> {
        self.graphs.get(key)
    }

    /// Insert a graph, e.g. one restored from a snapshot.
    pub fn insert(&self, key: SnapshotKey, graph: Arc<TransitGraph>) {
        self.graphs.insert(key, graph);
    }

    /// Number of cached graphs.
    pub fn entry_count(&self) -> u64 {
        self.graphs.run_pending_tasks();
        self.graphs.entry_count()
    }

    /// Invalidate all cached graphs.
    pub fn invalidate_all(&self) {
        self.graphs.invalidate_all();
    }
}
