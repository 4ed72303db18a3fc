//! Fetch Time Module
//!
//! Freshness marker carried by every cached record and collection.

use chrono::Utc;
use serde::{Serialize, Serializer};

use crate::models::Timestamp;

// == Fetch Time ==
/// When an entry's data was last fetched.
///
/// Serializes as `null` / `0` / epoch millis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchTime {
    /// Never fetched, or invalidated and awaiting a refetch
    #[default]
    Unset,
    /// A request is in flight; the completion time is not known yet
    InFlight,
    /// Completed at this epoch-millisecond time
    At(Timestamp),
}

impl FetchTime {
    // == In Flight ==
    /// Returns true while a request for the entry is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, FetchTime::InFlight)
    }

    // == Is Fresh ==
    /// Checks if a completed fetch happened less than `interval` ms before `now`.
    ///
    /// Unset and in-flight entries are never fresh.
    pub fn is_fresh(&self, now: Timestamp, interval: u64) -> bool {
        match *self {
            FetchTime::At(t) if t > 0 => t > now.saturating_sub(interval),
            _ => false,
        }
    }

    // == Is Expired ==
    /// Checks if a completed fetch is older than `now - cache_period`.
    ///
    /// Unset and in-flight entries never expire.
    pub fn is_expired(&self, now: Timestamp, cache_period: u64) -> bool {
        match (*self, now.checked_sub(cache_period)) {
            (FetchTime::At(t), Some(cutoff)) => t > 0 && t < cutoff,
            _ => false,
        }
    }
}

impl Serialize for FetchTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FetchTime::Unset => serializer.serialize_none(),
            FetchTime::InFlight => serializer.serialize_u64(0),
            FetchTime::At(t) => serializer.serialize_u64(*t),
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> Timestamp {
    Utc::now().timestamp_millis().max(0) as Timestamp
}
