//! Read-only view over the activity ledger.
//!
//! # Responsibilities
//! - Decode `lastAPICall` into a timestamp
//! - Count `globalErrors` entries inside a trailing window
//!
//! # Design Decisions
//! - Fail open: malformed or unreadable data logs one warning and reads as
//!   "no signal", so evaluation never blocks on bad input
//! - Never writes; the API client owns both keys

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::ledger::store::KeyValueStore;
use crate::time::Timestamp;

/// Key holding the millisecond timestamp of the last successful API call.
pub const LAST_API_CALL_KEY: &str = "lastAPICall";

/// Key holding the JSON array of recent API failures.
pub const GLOBAL_ERRORS_KEY: &str = "globalErrors";

/// Read access to API-call activity recorded by the API client.
pub trait ActivityLedger: Send + Sync {
    /// Time of the most recent successful call, if any is recorded.
    fn read_last_activity(&self) -> Option<Timestamp>;

    /// Failures recorded within `window_secs` before `now`.
    fn read_recent_error_count(&self, window_secs: u32, now: Timestamp) -> u32;
}

#[derive(Debug, Error)]
enum MalformedData {
    #[error("timestamp {0:?} is not an integer")]
    Timestamp(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of error events")]
    NotArray,

    #[error("entry {0} has no occurredAt/timestamp field")]
    MissingTimestamp(usize),
}

fn parse_millis(raw: &str) -> Result<Timestamp, MalformedData> {
    raw.trim()
        .parse::<i64>()
        .map(Timestamp)
        .map_err(|_| MalformedData::Timestamp(raw.to_string()))
}

fn event_time(index: usize, entry: &Value) -> Result<Timestamp, MalformedData> {
    let field = entry
        .get("occurredAt")
        .or_else(|| entry.get("timestamp"))
        .ok_or(MalformedData::MissingTimestamp(index))?;

    match field {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Timestamp)
            .ok_or_else(|| MalformedData::Timestamp(n.to_string())),
        Value::String(s) => parse_millis(s),
        _ => Err(MalformedData::MissingTimestamp(index)),
    }
}

fn parse_error_times(raw: &str) -> Result<Vec<Timestamp>, MalformedData> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(entries) = value else {
        return Err(MalformedData::NotArray);
    };
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| event_time(i, entry))
        .collect()
}

/// `ActivityLedger` decoded from a `KeyValueStore`.
#[derive(Debug, Clone)]
pub struct StoreLedger<S> {
    store: S,
}

impl<S: KeyValueStore> StoreLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Activity ledger unreadable, treating as absent");
                None
            }
        }
    }
}

impl<S: KeyValueStore> ActivityLedger for StoreLedger<S> {
    fn read_last_activity(&self) -> Option<Timestamp> {
        let raw = self.read_key(LAST_API_CALL_KEY)?;
        match parse_millis(&raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!(key = LAST_API_CALL_KEY, error = %e, "Ignoring malformed ledger data");
                None
            }
        }
    }

    fn read_recent_error_count(&self, window_secs: u32, now: Timestamp) -> u32 {
        let Some(raw) = self.read_key(GLOBAL_ERRORS_KEY) else {
            return 0;
        };
        let times = match parse_error_times(&raw) {
            Ok(times) => times,
            Err(e) => {
                tracing::warn!(key = GLOBAL_ERRORS_KEY, error = %e, "Ignoring malformed ledger data");
                return 0;
            }
        };

        let window = Duration::from_secs(u64::from(window_secs));
        let count = times
            .into_iter()
            .filter(|at| now.saturating_elapsed_since(*at) <= window)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}
