// =============================================================================
// Snapshot History — Bounded, newest-first log of computed signals
// =============================================================================
//
// A snapshot is an immutable projection of one SignalResult plus a
// time-ordered id and an ISO-8601 timestamp. Snapshots are prepended to a
// persisted list capped at 30 entries; the oldest fall off silently. The
// only delete operation is a whole-list clear.
//
// Persistence failures never surface to callers: a failed write degrades to
// a no-op (the computed snapshot stays valid in memory), and an unreadable
// or corrupt stored list degrades to an empty history. Whether a given
// SignalResult is worth saving is the caller's decision; the store accepts
// whatever it is given.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::history::store::KeyValueStore;
use crate::setup::SetupInput;
use crate::signals::SignalResult;
use crate::types::{CapacityHealth, RiskBand};

/// Maximum number of snapshots retained in the history.
pub const SNAPSHOT_CAPACITY: usize = 30;

/// Default persisted key for the snapshot list.
pub const SNAPSHOT_KEY: &str = "sprint-snapshots-v1";

/// Default persisted key for the latest setup record.
pub const SETUP_KEY: &str = "sprint-setup-v1";

// =============================================================================
// Snapshot
// =============================================================================

/// One dated capture of the derived signals, kept for trend comparison.
///
/// Wire field names are the persisted-layout keys the dashboard reads. Every
/// value field carries a serde default so older stored records keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub id: String,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub committed: f64,
    #[serde(default)]
    pub avg_velocity: f64,
    #[serde(rename = "capacitySP", default)]
    pub capacity_sp: f64,
    #[serde(default)]
    pub focus_factor: f64,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub risk_band: RiskBand,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub capacity_health: CapacityHealth,
    #[serde(default)]
    pub vol: f64,
}

impl Snapshot {
    /// Capture the given signals with a fresh time-ordered id and timestamp.
    pub fn capture(signals: &SignalResult) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            committed: signals.committed,
            avg_velocity: signals.avg_velocity,
            capacity_sp: signals.capacity_sp,
            focus_factor: signals.focus_factor,
            risk_score: signals.risk_score,
            risk_band: signals.risk_band,
            confidence: signals.confidence,
            capacity_health: signals.capacity_health,
            vol: signals.volatility,
        }
    }
}

// =============================================================================
// SnapshotStore
// =============================================================================

/// Durable, ordered history of signal computations.
pub struct SnapshotStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    /// Serializes the read-modify-write in `append` (and `clear`) so the
    /// at-most-30 invariant holds with concurrent callers.
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Store snapshots under the default key on the given backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, SNAPSHOT_KEY)
    }

    /// Store snapshots under a custom key.
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Capture `signals`, prepend the snapshot to the history, and truncate
    /// to the most recent 30 entries.
    ///
    /// The snapshot is returned even when persisting it fails.
    pub fn append(&self, signals: &SignalResult) -> Snapshot {
        let snapshot = Snapshot::capture(signals);

        let _guard = self.write_lock.lock();
        let mut list = self.load();
        list.insert(0, snapshot.clone());
        list.truncate(SNAPSHOT_CAPACITY);
        self.persist(&list);

        debug!(
            id = %snapshot.id,
            entries = list.len(),
            "snapshot appended"
        );
        snapshot
    }

    /// The stored history, most recent first. Empty is a valid, common state.
    pub fn list(&self) -> Vec<Snapshot> {
        self.load()
    }

    /// Irreversibly replace the stored history with an empty list.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.persist(&[]);
        debug!("snapshot history cleared");
    }

    fn load(&self) -> Vec<Snapshot> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "snapshot history unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Snapshot>>(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!(key = %self.key, error = %e, "snapshot history corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, list: &[Snapshot]) {
        let raw = match serde_json::to_string(list) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to serialize snapshot history");
                return;
            }
        };
        if let Err(e) = self.backend.write(&self.key, &raw) {
            warn!(key = %self.key, error = %e, "failed to persist snapshot history, keeping in-memory result");
        }
    }
}

// =============================================================================
// SetupStore
// =============================================================================

/// Persisted copy of the latest setup record, independent of the snapshot
/// history. Loads degrade to the all-zero default; saves degrade to a no-op.
pub struct SetupStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl SetupStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, SETUP_KEY)
    }

    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The last saved setup, or the default when absent or unreadable.
    pub fn load(&self) -> SetupInput {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SetupInput::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "setup record unreadable, using defaults");
                return SetupInput::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(setup) => setup,
            Err(e) => {
                warn!(key = %self.key, error = %e, "setup record corrupt, using defaults");
                SetupInput::default()
            }
        }
    }

    /// Persist `setup` as the latest record.
    pub fn save(&self, setup: &SetupInput) {
        let raw = match serde_json::to_string(setup) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to serialize setup record");
                return;
            }
        };
        if let Err(e) = self.backend.write(&self.key, &raw) {
            warn!(key = %self.key, error = %e, "failed to persist setup record");
        }
    }
}
