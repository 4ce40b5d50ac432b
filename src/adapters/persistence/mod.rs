//! Persistence Adapters - File-backed Port Implementations
//!
//! Serves fixtures, predictions and odds from a JSON snapshot file.
//! No database dependency.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotSource};
