// =============================================================================
// Signal Engine — Sprint health from commitment, capacity, and volatility
// =============================================================================
//
// Maps a raw, possibly-incomplete sprint setup into a set of normalized
// signals. Three ratios drive everything:
//
//   overcommit          = committed / avg_velocity          (>1 = overcommit)
//   capacity_shortfall  = committed / capacity_sp           (>1 = shortfall)
//   volatility          = stdev(velocities) / avg_velocity  (coefficient of
//                                                            variation)
//
// where capacity_sp scales average velocity by the availability ratio
// (person-days remaining after leave over ideal person-days). Each ratio
// feeds an independently capped penalty; the caps sum to exactly 100, so the
// final clamp on the composite score is not normally binding.
//
// There is no error path: every missing or garbled field degrades to 0, and
// an unusable setup (no commitment or no velocity history) produces zero
// ratios and sentinel labels rather than a failure. Callers must check
// `is_actionable()` before presenting risk or confidence as meaningful.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::setup::{safe_num, SetupInput};
use crate::signals::stats::{mean, sample_stdev};
use crate::types::{CapacityHealth, RiskBand};

// =============================================================================
// Penalty Constants
// =============================================================================

/// Penalty per unit of overcommit ratio above 1.0.
const OVER_PENALTY_SLOPE: f64 = 60.0;

/// Ceiling of the overcommit penalty.
const OVER_PENALTY_CEILING: f64 = 50.0;

/// Penalty per unit of capacity shortfall ratio above 1.0.
const CAP_PENALTY_SLOPE: f64 = 50.0;

/// Ceiling of the capacity shortfall penalty.
const CAP_PENALTY_CEILING: f64 = 35.0;

/// Penalty per unit of velocity volatility.
const VOLA_PENALTY_SLOPE: f64 = 30.0;

/// Ceiling of the volatility penalty.
const VOLA_PENALTY_CEILING: f64 = 15.0;

/// Upper bound of the composite risk score and of confidence.
const SCORE_CEILING: f64 = 100.0;

/// Confidence lost per point of volatility penalty.
const CONFIDENCE_VOLA_WEIGHT: f64 = 2.0;

/// Capacity-to-commitment ratio at or above which capacity is Healthy.
const HEALTHY_RATIO: f64 = 1.0;

/// Capacity-to-commitment ratio at or above which capacity is merely At Risk.
const AT_RISK_RATIO: f64 = 0.85;

// =============================================================================
// Result types
// =============================================================================

/// The three independently capped penalties feeding the risk score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskComponents {
    /// Scope pressure: commitment above historical throughput. 0..=50.
    pub over_penalty: f64,
    /// Availability pressure: commitment above effective capacity. 0..=35.
    pub cap_penalty: f64,
    /// Predictability pressure: velocity variability. 0..=15.
    pub vola_penalty: f64,
}

/// Fully derived sprint-health signals.
///
/// Every field is always populated; absence of data is represented by 0 or a
/// sentinel variant, never by omission. Recomputed from scratch on every
/// call — there is no incremental mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    // Sanitized echoes of the inputs.
    pub sprint_days: f64,
    pub team_members: f64,
    pub leave_days: f64,
    /// Committed story points, floored at 0 (a negative commitment is
    /// treated as absent, keeping every derived ratio non-negative).
    pub committed: f64,

    /// The strictly-positive entries among the three recent velocities.
    pub velocities: Vec<f64>,
    pub avg_velocity: f64,

    pub ideal_person_days: f64,
    pub available_person_days: f64,
    pub availability_ratio: f64,

    /// Average velocity scaled by availability.
    pub capacity_sp: f64,
    pub overcommit_ratio: f64,
    pub capacity_shortfall_ratio: f64,
    /// Equals `availability_ratio` whenever `avg_velocity > 0`; the fallback
    /// arm exists to keep the division zero-safe, not to change semantics.
    pub focus_factor: f64,
    /// Coefficient of variation of recent velocities.
    pub volatility: f64,

    pub risk_components: RiskComponents,
    pub risk_score: f64,
    pub risk_band: RiskBand,
    pub confidence: f64,
    pub capacity_health: CapacityHealth,
}

impl SignalResult {
    /// Whether the setup was complete enough for the signals to mean
    /// anything. Recommendation selection, coloring, and banners must all
    /// branch on this before trusting risk or confidence.
    pub fn is_actionable(&self) -> bool {
        self.committed > 0.0 && self.avg_velocity > 0.0
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Derive the full signal set from a raw sprint setup.
///
/// Pure and deterministic: no I/O, no state, identical output for identical
/// input. Never panics for any combination of missing or garbled fields.
pub fn compute_signals(setup: &SetupInput) -> SignalResult {
    let sprint_days = safe_num(setup.sprint_days);
    let team_members = safe_num(setup.team_members);
    let leave_days = safe_num(setup.leave_days);
    let committed = safe_num(setup.committed_sp).max(0.0);

    let v1 = safe_num(setup.v1);
    let v2 = safe_num(setup.v2);
    let v3 = safe_num(setup.v3);
    // Zero or negative entries mean "no data for that sprint", not "delivered
    // nothing" — they must not drag the mean down.
    let velocities: Vec<f64> = [v1, v2, v3].into_iter().filter(|v| *v > 0.0).collect();

    let avg_velocity = mean(&velocities);

    let ideal_person_days = sprint_days * team_members;
    let available_person_days = (ideal_person_days - leave_days).max(0.0);
    let availability_ratio = if ideal_person_days > 0.0 {
        available_person_days / ideal_person_days
    } else {
        0.0
    };

    // Assumption: velocity roughly scales with availability.
    let capacity_sp = if avg_velocity > 0.0 {
        avg_velocity * availability_ratio
    } else {
        0.0
    };

    let overcommit_ratio = if avg_velocity > 0.0 {
        committed / avg_velocity
    } else {
        0.0
    };
    let capacity_shortfall_ratio = if capacity_sp > 0.0 {
        committed / capacity_sp
    } else {
        0.0
    };
    let focus_factor = if avg_velocity > 0.0 {
        capacity_sp / avg_velocity
    } else {
        availability_ratio
    };

    let volatility = if avg_velocity > 0.0 {
        sample_stdev(&velocities) / avg_velocity
    } else {
        0.0
    };

    let over_penalty = ((overcommit_ratio - 1.0) * OVER_PENALTY_SLOPE).clamp(0.0, OVER_PENALTY_CEILING);
    let cap_penalty =
        ((capacity_shortfall_ratio - 1.0) * CAP_PENALTY_SLOPE).clamp(0.0, CAP_PENALTY_CEILING);
    let vola_penalty = (volatility * VOLA_PENALTY_SLOPE).clamp(0.0, VOLA_PENALTY_CEILING);

    let risk_score = (over_penalty + cap_penalty + vola_penalty).clamp(0.0, SCORE_CEILING);
    let risk_band = RiskBand::from_score(risk_score);

    // Confidence starts from capacity-to-commitment and pays twice for
    // volatility.
    let base = if committed > 0.0 {
        capacity_sp / committed * 100.0
    } else {
        0.0
    };
    let confidence = (base - vola_penalty * CONFIDENCE_VOLA_WEIGHT).clamp(0.0, SCORE_CEILING);

    let capacity_health = if committed > 0.0 && capacity_sp > 0.0 {
        let ratio = capacity_sp / committed;
        if ratio >= HEALTHY_RATIO {
            CapacityHealth::Healthy
        } else if ratio >= AT_RISK_RATIO {
            CapacityHealth::AtRisk
        } else {
            CapacityHealth::Critical
        }
    } else {
        CapacityHealth::Unknown
    };

    trace!(
        committed,
        avg_velocity = format!("{:.2}", avg_velocity),
        risk_score = format!("{:.2}", risk_score),
        confidence = format!("{:.2}", confidence),
        "signals computed"
    );

    SignalResult {
        sprint_days,
        team_members,
        leave_days,
        committed,
        velocities,
        avg_velocity,
        ideal_person_days,
        available_person_days,
        availability_ratio,
        capacity_sp,
        overcommit_ratio,
        capacity_shortfall_ratio,
        focus_factor,
        volatility,
        risk_components: RiskComponents {
            over_penalty,
            cap_penalty,
            vola_penalty,
        },
        risk_score,
        risk_band,
        confidence,
        capacity_health,
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// The worked "healthy team" scenario: 10-day sprint, 7 people, no leave,
    /// 60 SP committed against velocities 60 / 65 / 58.
    fn healthy_setup() -> SetupInput {
        SetupInput {
            sprint_days: 10.0,
            team_members: 7.0,
            leave_days: 0.0,
            committed_sp: 60.0,
            v1: 60.0,
            v2: 65.0,
            v3: 58.0,
        }
    }

    #[test]
    fn healthy_scenario_derives_expected_signals() {
        let s = compute_signals(&healthy_setup());

        assert!((s.ideal_person_days - 70.0).abs() < 1e-10);
        assert!((s.available_person_days - 70.0).abs() < 1e-10);
        assert!((s.availability_ratio - 1.0).abs() < 1e-10);
        assert!((s.avg_velocity - 61.0).abs() < 1e-10);
        assert!((s.capacity_sp - 61.0).abs() < 1e-10);
        assert!((s.overcommit_ratio - 60.0 / 61.0).abs() < 1e-10);
        assert!((s.capacity_shortfall_ratio - 60.0 / 61.0).abs() < 1e-10);

        // Under-committed: scope and capacity penalties are both floored.
        assert_eq!(s.risk_components.over_penalty, 0.0);
        assert_eq!(s.risk_components.cap_penalty, 0.0);
        assert!(s.risk_components.vola_penalty > 0.0);

        assert!(s.risk_score < 30.0);
        assert_eq!(s.risk_band, RiskBand::Low);
        assert_eq!(s.capacity_health, CapacityHealth::Healthy);
        assert!(s.is_actionable());
    }

    #[test]
    fn overcommitted_scenario_reproduces_clamp_arithmetic() {
        let setup = SetupInput {
            committed_sp: 100.0,
            ..healthy_setup()
        };
        let s = compute_signals(&setup);

        let over_ratio = 100.0 / 61.0;
        assert!((s.overcommit_ratio - over_ratio).abs() < 1e-10);

        let expected_over = ((over_ratio - 1.0) * 60.0).clamp(0.0, 50.0);
        let expected_cap = ((over_ratio - 1.0) * 50.0).clamp(0.0, 35.0);
        assert!((s.risk_components.over_penalty - expected_over).abs() < 1e-10);
        assert!((s.risk_components.cap_penalty - expected_cap).abs() < 1e-10);
        // (100/61 - 1) * 60 = 2340/61, comfortably under the 50-point ceiling.
        assert!((expected_over - 2340.0 / 61.0).abs() < 1e-10);

        let expected_score =
            (expected_over + expected_cap + s.risk_components.vola_penalty).clamp(0.0, 100.0);
        assert!((s.risk_score - expected_score).abs() < 1e-10);
        assert_eq!(s.risk_band, RiskBand::High);
    }

    #[test]
    fn velocity_filtering_excludes_non_positive_entries() {
        let setup = SetupInput {
            v1: 30.0,
            v2: 0.0,
            v3: -5.0,
            committed_sp: 20.0,
            ..Default::default()
        };
        let s = compute_signals(&setup);
        assert_eq!(s.velocities, vec![30.0]);
        assert!((s.avg_velocity - 30.0).abs() < 1e-10);
        // A single sample has no spread.
        assert_eq!(s.volatility, 0.0);
    }

    #[test]
    fn focus_factor_equals_availability_ratio_when_velocity_known() {
        let setup = SetupInput {
            leave_days: 7.0,
            ..healthy_setup()
        };
        let s = compute_signals(&setup);
        assert!(s.avg_velocity > 0.0);
        assert!((s.focus_factor - s.availability_ratio).abs() < 1e-10);
        assert!((s.availability_ratio - 0.9).abs() < 1e-10);
    }

    #[test]
    fn focus_factor_falls_back_to_availability_without_velocity() {
        let setup = SetupInput {
            sprint_days: 10.0,
            team_members: 7.0,
            leave_days: 7.0,
            committed_sp: 40.0,
            ..Default::default()
        };
        let s = compute_signals(&setup);
        assert_eq!(s.avg_velocity, 0.0);
        assert!((s.focus_factor - 0.9).abs() < 1e-10);
    }

    #[test]
    fn engine_is_idempotent_bit_for_bit() {
        let setup = SetupInput {
            leave_days: 3.0,
            ..healthy_setup()
        };
        let a = serde_json::to_string(&compute_signals(&setup)).unwrap();
        let b = serde_json::to_string(&compute_signals(&setup)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn all_zero_setup_is_degenerate_but_defined() {
        let s = compute_signals(&SetupInput::default());
        assert_eq!(s.committed, 0.0);
        assert_eq!(s.avg_velocity, 0.0);
        assert_eq!(s.risk_score, 0.0);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.capacity_health, CapacityHealth::Unknown);
        // Low by threshold even though the case is degenerate.
        assert_eq!(s.risk_band, RiskBand::Low);
        assert!(!s.is_actionable());
    }

    #[test]
    fn negative_commitment_degrades_to_incomplete_setup() {
        let setup = SetupInput {
            committed_sp: -25.0,
            ..healthy_setup()
        };
        let s = compute_signals(&setup);
        assert_eq!(s.committed, 0.0);
        assert_eq!(s.overcommit_ratio, 0.0);
        assert_eq!(s.capacity_shortfall_ratio, 0.0);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.capacity_health, CapacityHealth::Unknown);
        assert!(!s.is_actionable());
    }

    #[test]
    fn leave_beyond_ideal_floors_availability_at_zero() {
        let setup = SetupInput {
            leave_days: 100.0,
            ..healthy_setup()
        };
        let s = compute_signals(&setup);
        assert_eq!(s.available_person_days, 0.0);
        assert_eq!(s.availability_ratio, 0.0);
        assert_eq!(s.capacity_sp, 0.0);
        // No capacity means the shortfall ratio is undefined, hence 0.
        assert_eq!(s.capacity_shortfall_ratio, 0.0);
        assert_eq!(s.capacity_health, CapacityHealth::Unknown);
    }

    #[test]
    fn scores_stay_bounded_under_extreme_inputs() {
        let cases = [
            SetupInput {
                committed_sp: 1e12,
                v1: 0.001,
                v2: 900.0,
                v3: 0.002,
                sprint_days: 10.0,
                team_members: 7.0,
                ..Default::default()
            },
            SetupInput {
                committed_sp: 5.0,
                v1: 1e9,
                v2: 1.0,
                v3: 1e9,
                sprint_days: 1.0,
                team_members: 1.0,
                leave_days: 0.9,
            },
            SetupInput {
                sprint_days: -10.0,
                team_members: 7.0,
                leave_days: -3.0,
                committed_sp: 50.0,
                v1: 40.0,
                v2: 45.0,
                v3: 50.0,
            },
        ];

        for setup in cases {
            let s = compute_signals(&setup);
            assert!((0.0..=100.0).contains(&s.risk_score));
            assert!((0.0..=100.0).contains(&s.confidence));
            assert!(s.overcommit_ratio >= 0.0);
            assert!(s.capacity_shortfall_ratio >= 0.0);
            assert!(s.focus_factor >= 0.0);
            assert!(s.volatility >= 0.0);
            assert!(s.risk_components.over_penalty <= 50.0);
            assert!(s.risk_components.cap_penalty <= 35.0);
            assert!(s.risk_components.vola_penalty <= 15.0);
        }
    }

    #[test]
    fn non_finite_fields_never_panic() {
        let setup = SetupInput {
            sprint_days: f64::NAN,
            team_members: f64::INFINITY,
            leave_days: f64::NEG_INFINITY,
            committed_sp: f64::NAN,
            v1: f64::INFINITY,
            v2: 30.0,
            v3: f64::NAN,
        };
        let s = compute_signals(&setup);
        assert_eq!(s.ideal_person_days, 0.0);
        assert_eq!(s.velocities, vec![30.0]);
        assert!((0.0..=100.0).contains(&s.risk_score));
    }
}
