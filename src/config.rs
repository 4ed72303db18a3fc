//! Configuration Module
//!
//! Cache freshness and eviction timing, built explicitly and handed to the
//! store at construction time.

use std::env;

use tracing::warn;

use crate::error::{CacheError, Result};

// == Defaults ==
/// Default freshness window: ten minutes
pub const DEFAULT_CACHE_PERIOD_MS: u64 = 10 * 60 * 1000;

/// Smallest accepted cache period
pub const MIN_CACHE_PERIOD_MS: u64 = 1000;

/// Smallest accepted eviction interval
pub const MIN_GC_INTERVAL_MS: u64 = 500;

/// Cache timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Time after which a completed fetch is stale, in milliseconds
    pub cache_period_ms: u64,
    /// Interval between eviction passes, in milliseconds
    pub gc_interval_ms: u64,
}

impl Config {
    /// Creates a validated config.
    ///
    /// Unlike [`Config::from_env`], out-of-range values are rejected rather
    /// than replaced.
    pub fn new(cache_period_ms: u64, gc_interval_ms: u64) -> Result<Self> {
        if cache_period_ms < MIN_CACHE_PERIOD_MS {
            return Err(CacheError::InvalidConfig(format!(
                "cache period must be at least {} ms, got {}",
                MIN_CACHE_PERIOD_MS, cache_period_ms
            )));
        }
        if gc_interval_ms < MIN_GC_INTERVAL_MS {
            return Err(CacheError::InvalidConfig(format!(
                "gc interval must be at least {} ms, got {}",
                MIN_GC_INTERVAL_MS, gc_interval_ms
            )));
        }
        Ok(Self {
            cache_period_ms,
            gc_interval_ms,
        })
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PERIOD` - Freshness window in ms (default: 600000, minimum 1000)
    /// - `HALF_CACHE_PERIOD` - Eviction interval in ms (default: half the cache
    ///   period, minimum 500)
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("CACHE_PERIOD").ok().as_deref(),
            env::var("HALF_CACHE_PERIOD").ok().as_deref(),
        )
    }

    /// Builds a config from raw textual values, falling back on bad input.
    fn from_values(cache_period: Option<&str>, gc_interval: Option<&str>) -> Self {
        let cache_period_ms = match cache_period.map(parse_millis) {
            None => DEFAULT_CACHE_PERIOD_MS,
            Some(Some(ms)) if ms >= MIN_CACHE_PERIOD_MS => ms,
            Some(Some(ms)) => {
                warn!(
                    "CACHE_PERIOD of {} ms is under one second, falling back to {} ms",
                    ms, DEFAULT_CACHE_PERIOD_MS
                );
                DEFAULT_CACHE_PERIOD_MS
            }
            Some(None) => {
                warn!(
                    "CACHE_PERIOD is not a number, falling back to {} ms",
                    DEFAULT_CACHE_PERIOD_MS
                );
                DEFAULT_CACHE_PERIOD_MS
            }
        };

        let half = cache_period_ms / 2;
        let gc_interval_ms = match gc_interval.map(parse_millis) {
            None => half,
            Some(Some(ms)) if ms >= MIN_GC_INTERVAL_MS => ms,
            Some(Some(ms)) => {
                warn!(
                    "HALF_CACHE_PERIOD of {} ms is under 500 ms, falling back to {} ms",
                    ms, half
                );
                half
            }
            Some(None) => {
                warn!(
                    "HALF_CACHE_PERIOD is not a number, falling back to {} ms",
                    half
                );
                half
            }
        };

        Self {
            cache_period_ms,
            gc_interval_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_period_ms: DEFAULT_CACHE_PERIOD_MS,
            gc_interval_ms: DEFAULT_CACHE_PERIOD_MS / 2,
        }
    }
}

/// Parses a millisecond count, rounding fractional input.
fn parse_millis(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return Some(0);
    }
    Some(value.round() as u64)
}
