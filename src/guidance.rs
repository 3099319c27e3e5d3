// =============================================================================
// Guidance — Deterministic interpretation of computed signals
// =============================================================================
//
// Turns a SignalResult into the caller-facing verdicts the dashboard shows:
// per-dimension pressure levels, ranked risk drivers, an overall outlook,
// and which scrum ceremony deserves attention next.
//
// Everything here honors the incomplete-setup guard: without a positive
// commitment and a known average velocity, pressures are Unknown, drivers
// are empty, the outlook demands setup, and the ceremony falls back to
// Planning.

use serde::{Deserialize, Serialize};

use crate::signals::SignalResult;

// =============================================================================
// Thresholds
// =============================================================================

/// Overcommit ratio above which scope pressure is High.
const SCOPE_HIGH: f64 = 1.10;

/// Overcommit ratio above which scope pressure is Moderate.
const SCOPE_MODERATE: f64 = 1.0;

/// Capacity shortfall ratio above which capacity pressure is High.
const CAPACITY_HIGH: f64 = 1.20;

/// Capacity shortfall ratio above which capacity pressure is Moderate.
const CAPACITY_MODERATE: f64 = 1.0;

/// Volatility above which flow pressure is High.
const FLOW_HIGH: f64 = 0.35;

/// Volatility above which flow pressure is Moderate.
const FLOW_MODERATE: f64 = 0.20;

/// Focus factor below which the daily ceremony needs attention.
const FOCUS_ATTENTION: f64 = 0.90;

/// Volatility above which the retrospective needs attention.
const VOLATILITY_ATTENTION: f64 = 0.18;

/// Confidence below which the review needs attention.
const CONFIDENCE_ATTENTION: f64 = 70.0;

// =============================================================================
// Pressure levels
// =============================================================================

/// Qualitative pressure on one risk dimension. `Unknown` ("—") means the
/// setup carries no information for that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "—")]
    Unknown,
}

impl std::fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::Unknown => write!(f, "—"),
        }
    }
}

/// Scope pressure: commitment against historical throughput.
pub fn scope_pressure(signals: &SignalResult) -> PressureLevel {
    if signals.overcommit_ratio > SCOPE_HIGH {
        PressureLevel::High
    } else if signals.overcommit_ratio > SCOPE_MODERATE {
        PressureLevel::Moderate
    } else if signals.overcommit_ratio > 0.0 {
        PressureLevel::Low
    } else {
        PressureLevel::Unknown
    }
}

/// Capacity pressure: commitment against availability-adjusted throughput.
pub fn capacity_pressure(signals: &SignalResult) -> PressureLevel {
    if signals.capacity_shortfall_ratio > CAPACITY_HIGH {
        PressureLevel::High
    } else if signals.capacity_shortfall_ratio > CAPACITY_MODERATE {
        PressureLevel::Moderate
    } else if signals.capacity_sp > 0.0 {
        PressureLevel::Low
    } else {
        PressureLevel::Unknown
    }
}

/// Flow pressure: how unstable recent velocity has been.
pub fn flow_pressure(signals: &SignalResult) -> PressureLevel {
    if signals.volatility > FLOW_HIGH {
        PressureLevel::High
    } else if signals.volatility > FLOW_MODERATE {
        PressureLevel::Moderate
    } else if signals.avg_velocity > 0.0 {
        PressureLevel::Low
    } else {
        PressureLevel::Unknown
    }
}

// =============================================================================
// Outlook
// =============================================================================

/// Overall banner state for the sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SprintOutlook {
    /// The setup is incomplete; signals are not meaningful yet.
    SetupNeeded,
    /// Risk at most 30: keep execution steady.
    OnTrack,
    /// Risk at most 60: protect scope and capacity.
    WatchClosely,
    /// Risk above 60: act now.
    ActionRequired,
}

impl std::fmt::Display for SprintOutlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetupNeeded => write!(f, "Setup needed"),
            Self::OnTrack => write!(f, "On track"),
            Self::WatchClosely => write!(f, "Watch closely"),
            Self::ActionRequired => write!(f, "Action required"),
        }
    }
}

/// Classify the overall sprint outlook from risk, on whole-number rounded
/// scores as the dashboard displays them.
pub fn outlook(signals: &SignalResult) -> SprintOutlook {
    if !signals.is_actionable() {
        return SprintOutlook::SetupNeeded;
    }
    let risk = signals.risk_score.round();
    if risk <= 30.0 {
        SprintOutlook::OnTrack
    } else if risk <= 60.0 {
        SprintOutlook::WatchClosely
    } else {
        SprintOutlook::ActionRequired
    }
}

// =============================================================================
// Risk drivers
// =============================================================================

/// Which dimension a driver entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFactor {
    Scope,
    Capacity,
    Volatility,
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scope => write!(f, "Scope pressure"),
            Self::Capacity => write!(f, "Capacity shortfall"),
            Self::Volatility => write!(f, "Velocity volatility"),
        }
    }
}

/// One penalty component's contribution to the composite risk score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDriver {
    pub factor: RiskFactor,
    /// The penalty actually charged.
    pub score: f64,
    /// The cap for this component (50 / 35 / 15).
    pub ceiling: f64,
    /// `score / ceiling` as a percentage, clamped to 0..=100.
    pub contribution_pct: f64,
}

/// The three penalty components ranked by contribution, largest first.
/// Empty when the setup is incomplete.
pub fn risk_drivers(signals: &SignalResult) -> Vec<RiskDriver> {
    if !signals.is_actionable() {
        return Vec::new();
    }

    let c = &signals.risk_components;
    let mut drivers = vec![
        driver(RiskFactor::Scope, c.over_penalty, 50.0),
        driver(RiskFactor::Capacity, c.cap_penalty, 35.0),
        driver(RiskFactor::Volatility, c.vola_penalty, 15.0),
    ];
    drivers.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    drivers
}

fn driver(factor: RiskFactor, score: f64, ceiling: f64) -> RiskDriver {
    let contribution_pct = if ceiling > 0.0 {
        (score / ceiling * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    RiskDriver {
        factor,
        score,
        ceiling,
        contribution_pct,
    }
}

// =============================================================================
// Ceremony recommendation
// =============================================================================

/// The scrum ceremonies the dashboard can steer attention toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ceremony {
    Planning,
    Daily,
    Refinement,
    Review,
    Retro,
}

impl std::fmt::Display for Ceremony {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::Daily => write!(f, "Daily"),
            Self::Refinement => write!(f, "Refinement"),
            Self::Review => write!(f, "Review"),
            Self::Retro => write!(f, "Retro"),
        }
    }
}

/// Pick the ceremony most worth the team's attention right now.
///
/// Checked in priority order: scope/capacity trouble points at Planning,
/// low focus at the Daily, unstable velocity at the Retro, low confidence
/// at the Review. A quiet sprint (and an incomplete setup) defaults to
/// Planning.
pub fn recommend_ceremony(signals: &SignalResult) -> Ceremony {
    if !signals.is_actionable() {
        return Ceremony::Planning;
    }

    let capacity_vs_velocity = if signals.avg_velocity > 0.0 {
        signals.capacity_sp / signals.avg_velocity
    } else {
        0.0
    };

    if signals.overcommit_ratio > SCOPE_HIGH || capacity_vs_velocity < 1.0 {
        Ceremony::Planning
    } else if signals.focus_factor < FOCUS_ATTENTION {
        Ceremony::Daily
    } else if signals.volatility > VOLATILITY_ATTENTION {
        Ceremony::Retro
    } else if signals.confidence < CONFIDENCE_ATTENTION {
        Ceremony::Review
    } else {
        Ceremony::Planning
    }
}
