//! Activity ledger access.
//!
//! # Data Flow
//! ```text
//! API client (external)
//!     → writes lastAPICall / globalErrors into a KeyValueStore
//!
//! store.rs:  MemoryStore | FileStore  → raw strings
//! reader.rs: StoreLedger               → Option<Timestamp>, windowed error count
//!     → HealthEvaluator
//! ```

pub mod reader;
pub mod store;

pub use reader::{ActivityLedger, StoreLedger, GLOBAL_ERRORS_KEY, LAST_API_CALL_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
