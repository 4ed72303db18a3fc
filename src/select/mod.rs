//! Selection Module
//!
//! Read-only queries over a [`crate::cache::CacheState`] deciding whether
//! cached data can be served, is still loading, or needs a fetch.

mod action;
mod collection;
mod record;

use crate::cache::{current_timestamp_ms, FetchTime};
use crate::config::Config;
use crate::models::Timestamp;

pub use action::{select_action_status, ActionStatusView};
pub use collection::{select_collection, CollectionSelection};
pub use record::{select_record, select_record_or_empty, RecordSelection, LOADING_MESSAGE};

// == Freshness ==
/// The clock reading and window a selection judges freshness against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Current epoch milliseconds
    pub now: Timestamp,
    /// Entries fetched less than this many ms ago are fresh
    pub interval: u64,
}

impl Freshness {
    pub fn new(now: Timestamp, interval: u64) -> Self {
        Self { now, interval }
    }

    /// Judges at `now` using the configured cache period.
    pub fn at(config: &Config, now: Timestamp) -> Self {
        Self::new(now, config.cache_period_ms)
    }

    /// Judges at the current wall-clock time using the configured cache period.
    pub fn current(config: &Config) -> Self {
        Self::at(config, current_timestamp_ms())
    }

    /// Overrides the freshness window for one query.
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_fresh(&self, fetch_time: FetchTime) -> bool {
        fetch_time.is_fresh(self.now, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_from_config() {
        let config = Config::default();
        let freshness = Freshness::at(&config, 5000);
        assert_eq!(freshness.interval, 600_000);
        assert_eq!(freshness.with_interval(10).interval, 10);
    }

    #[test]
    fn test_is_fresh_respects_override() {
        let freshness = Freshness::new(10_000, 5000);
        assert!(freshness.is_fresh(FetchTime::At(6000)));
        assert!(!freshness.with_interval(1000).is_fresh(FetchTime::At(6000)));
    }
}
