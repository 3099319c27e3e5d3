// =============================================================================
// Signals Module
// =============================================================================
//
// Signal pipeline for sprint health:
// - Velocity statistics (mean, Bessel-corrected sample stdev)
// - The pure signal engine: setup in, normalized risk/confidence signals out

pub mod engine;
pub mod stats;

pub use engine::{compute_signals, RiskComponents, SignalResult};
