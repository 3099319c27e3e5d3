// =============================================================================
// Sprint Pulse — Sprint-health signal engine and snapshot history
// =============================================================================
//
// Two components, consumed in sequence by a UI layer:
//
//   1. The signal engine — a pure function turning raw sprint setup values
//      (commitment, recent velocities, team size, planned leave) into
//      normalized ratios, a bounded risk score, a confidence percentage,
//      and categorical health/risk bands.
//   2. The snapshot history — a bounded, newest-first log of computed
//      signals on top of a pluggable keyed store, for trend comparison.
//
// The guidance module interprets computed signals into the caller-facing
// verdicts (pressure levels, ranked drivers, ceremony recommendation).
//
// Collaborators receive their stores and the engine explicitly; nothing is
// discovered through ambient global state.
// =============================================================================

pub mod guidance;
pub mod history;
pub mod setup;
pub mod signals;
pub mod types;

pub use guidance::{
    capacity_pressure, flow_pressure, outlook, recommend_ceremony, risk_drivers, scope_pressure,
    Ceremony, PressureLevel, RiskDriver, RiskFactor, SprintOutlook,
};
pub use history::{
    trend, JsonFileStore, KeyValueStore, MemoryStore, SetupStore, Snapshot, SnapshotStore,
    TrendPoint, SETUP_KEY, SNAPSHOT_CAPACITY, SNAPSHOT_KEY,
};
pub use setup::SetupInput;
pub use signals::{compute_signals, RiskComponents, SignalResult};
pub use types::{CapacityHealth, RiskBand};
