// =============================================================================
// History Module
// =============================================================================
//
// Persistence layer for sprint health:
// - Keyed store backends (in-memory, atomic file-per-key)
// - The bounded, newest-first snapshot history and the latest-setup record
// - Trend deltas between consecutive snapshots

pub mod snapshot;
pub mod store;
pub mod trend;

pub use snapshot::{SetupStore, Snapshot, SnapshotStore, SETUP_KEY, SNAPSHOT_CAPACITY, SNAPSHOT_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use trend::{trend, TrendPoint};
