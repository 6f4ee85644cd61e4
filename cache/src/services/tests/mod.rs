//! Service-specific tests
//!
//! Engine tests run on a manual clock so ages and TTL boundaries are exact.

#[cfg(test)]
mod cache_engine;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use shared::CacheConfig;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use crate::core::CacheEngine;
    use crate::traits::Clock;

    pub const START_MS: i64 = 1_700_000_000_000;

    /// Clock that only moves when told to
    #[derive(Debug)]
    pub struct ManualClock {
        now: AtomicI64,
    }

    impl ManualClock {
        pub fn new(start_ms: i64) -> Arc<Self> {
            Arc::new(Self {
                now: AtomicI64::new(start_ms),
            })
        }

        pub fn advance(&self, ms: i64) {
            self.now.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    /// Engine with default limits on a manual clock
    pub fn manual_engine() -> (CacheEngine, Arc<ManualClock>) {
        manual_engine_with(CacheConfig::default())
    }

    pub fn manual_engine_with(config: CacheConfig) -> (CacheEngine, Arc<ManualClock>) {
        let clock = ManualClock::new(START_MS);
        (CacheEngine::with_clock(config, clock.clone()), clock)
    }
}
