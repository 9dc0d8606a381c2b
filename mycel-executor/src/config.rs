//! Scheduler configuration.

/// Tunables shared by the scheduling policies.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Worker count for the multi-threaded policy. `1` selects the
    /// single-threaded iterative policy in [`crate::execute`].
    pub nthreads: usize,
    /// How many in-flight values an outgoing edge may hold before its
    /// producer stops being ready (multi-threaded policy only). The default
    /// of 1 gives the single-slot semantics where a producer blocks until
    /// its consumer has drained.
    pub edge_window: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            nthreads: 1,
            edge_window: 1,
        }
    }
}

impl SchedulerConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `MYCEL_NTHREADS`: worker count
    /// - `MYCEL_EDGE_WINDOW`: per-edge readiness window
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let nthreads = std::env::var("MYCEL_NTHREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.nthreads);
        let edge_window = std::env::var("MYCEL_EDGE_WINDOW")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.edge_window);
        Self {
            nthreads: nthreads.max(1),
            edge_window: edge_window.max(1),
        }
    }

    /// Set the worker count.
    #[must_use]
    pub fn with_nthreads(mut self, nthreads: usize) -> Self {
        self.nthreads = nthreads.max(1);
        self
    }

    /// Set the per-edge readiness window.
    #[must_use]
    pub fn with_edge_window(mut self, window: usize) -> Self {
        self.edge_window = window.max(1);
        self
    }
}
