//! Search configuration for the planners.

use chrono::Duration;

/// Limits for the primary, time-respecting planner.
#[derive(Debug, Clone)]
pub struct TimedConfig {
    /// Maximum number of trip changes.
    pub max_transfers: usize,

    /// Maximum time from the requested start to arrival (minutes).
    /// Labels beyond this are pruned during search.
    pub max_duration_mins: i64,

    /// Minimum dwell when changing trips (minutes).
    pub min_transfer_mins: i64,

    /// Latest first boarding after the requested start (minutes).
    /// Completions boarding later are rejected.
    pub boarding_window_mins: i64,
}

impl TimedConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfers: usize,
        max_duration_mins: i64,
        min_transfer_mins: i64,
        boarding_window_mins: i64,
    ) -> Self {
        Self {
            max_transfers,
            max_duration_mins,
            min_transfer_mins,
            boarding_window_mins,
        }
    }

    /// Returns the duration cap as a Duration.
    pub fn max_duration(&self) -> Duration {
        Duration::minutes(self.max_duration_mins)
    }

    /// Returns the minimum transfer dwell as a Duration.
    pub fn min_transfer(&self) -> Duration {
        Duration::minutes(self.min_transfer_mins)
    }

    /// Returns the boarding window as a Duration.
    pub fn boarding_window(&self) -> Duration {
        Duration::minutes(self.boarding_window_mins)
    }
}

impl Default for TimedConfig {
    fn default() -> Self {
        Self {
            max_transfers: 2,
            max_duration_mins: 120,
            min_transfer_mins: 10,
            boarding_window_mins: 30,
        }
    }
}

/// Limits for the extended fallback planner.
#[derive(Debug, Clone)]
pub struct ExtendedConfig {
    /// Maximum number of trip changes.
    pub max_transfers: usize,

    /// Absolute search horizon after the requested start (minutes).
    pub horizon_mins: i64,

    /// Minimum dwell when changing trips (minutes).
    pub min_transfer_mins: i64,
}

impl ExtendedConfig {
    pub fn new(max_transfers: usize, horizon_mins: i64, min_transfer_mins: i64) -> Self {
        Self {
            max_transfers,
            horizon_mins,
            min_transfer_mins,
        }
    }

    pub fn horizon(&self) -> Duration {
        Duration::minutes(self.horizon_mins)
    }

    pub fn min_transfer(&self) -> Duration {
        Duration::minutes(self.min_transfer_mins)
    }
}

impl Default for ExtendedConfig {
    fn default() -> Self {
        Self {
            max_transfers: 4,
            horizon_mins: 480, // 8 hours
            min_transfer_mins: 10,
        }
    }
}

/// Limits for the time-ignoring topological planner.
#[derive(Debug, Clone)]
pub struct TopologicalConfig {
    /// Maximum number of trip changes.
    pub max_transfers: usize,

    /// Maximum number of hops in a path.
    pub max_depth: usize,
}

impl TopologicalConfig {
    pub fn new(max_transfers: usize, max_depth: usize) -> Self {
        Self {
            max_transfers,
            max_depth,
        }
    }
}

impl Default for TopologicalConfig {
    fn default() -> Self {
        Self {
            max_transfers: 4,
            max_depth: 200,
        }
    }
}

/// How the next-departure scanner shifts the start time.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Offsets stay strictly below this (minutes).
    pub horizon_mins: i64,

    /// Distance between consecutive offsets (minutes).
    pub step_mins: i64,
}

impl ScanConfig {
    pub fn new(horizon_mins: i64, step_mins: i64) -> Self {
        Self {
            horizon_mins,
            step_mins,
        }
    }

    /// Six hours in half-hour steps, for quick "is there anything later" checks.
    pub fn coarse() -> Self {
        Self {
            step_mins: 30,
            ..Self::default()
        }
    }

    pub fn horizon(&self) -> Duration {
        Duration::minutes(self.horizon_mins)
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(self.step_mins)
    }

    /// Offsets from the requested start, in the order they are tried.
    ///
    /// Empty when the step is not positive.
    pub fn offsets(&self) -> impl Iterator<Item = Duration> + use<> {
        let step = self.step_mins;
        let horizon = self.horizon_mins;
        (0..)
            .map(move |i: i64| i * step)
            .take_while(move |offset| step > 0 && *offset < horizon)
            .map(Duration::minutes)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            horizon_mins: 360, // 6 hours
            step_mins: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs() {
        let timed = TimedConfig::default();
        assert_eq!(timed.max_transfers, 2);
        assert_eq!(timed.max_duration_mins, 120);
        assert_eq!(timed.min_transfer_mins, 10);
        assert_eq!(timed.boarding_window_mins, 30);

        let extended = ExtendedConfig::default();
        assert_eq!(extended.max_transfers, 4);
        assert_eq!(extended.horizon_mins, 480);

        let topo = TopologicalConfig::default();
        assert_eq!(topo.max_transfers, 4);
        assert_eq!(topo.max_depth, 200);

        let scan = ScanConfig::default();
        assert_eq!(scan.horizon_mins, 360);
        assert_eq!(scan.step_mins, 5);
        assert_eq!(ScanConfig::coarse().step_mins, 30);
    }

    #[test]
    fn duration_methods() {
        let config = TimedConfig::default();

        assert_eq!(config.max_duration(), Duration::hours(2));
        assert_eq!(config.min_transfer(), Duration::minutes(10));
        assert_eq!(config.boarding_window(), Duration::minutes(30));
        assert_eq!(ExtendedConfig::default().horizon(), Duration::hours(8));
    }

    #[test]
    fn custom_config() {
        let config = TimedConfig::new(1, 60, 5, 15);

        assert_eq!(config.max_transfers, 1);
        assert_eq!(config.max_duration_mins, 60);
        assert_eq!(config.min_transfer_mins, 5);
        assert_eq!(config.boarding_window_mins, 15);
    }

    #[test]
    fn scan_offsets_increase_and_stop_before_horizon() {
        let offsets: Vec<Duration> = ScanConfig::coarse().offsets().collect();
        assert_eq!(offsets.len(), 12);
        assert_eq!(offsets[0], Duration::zero());
        assert_eq!(offsets[11], Duration::minutes(330));
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(ScanConfig::default().offsets().count(), 72);
    }

    #[test]
    fn non_positive_step_yields_no_offsets() {
        assert_eq!(ScanConfig::new(60, 0).offsets().count(), 0);
    }
}
