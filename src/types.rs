// =============================================================================
// Shared types used across the sprint-pulse signal engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Categorical band derived from the composite risk score.
///
/// Thresholds: score <= 30 is Low, <= 60 is Moderate, above that High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Classify a composite risk score into its band.
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Low
        } else if score <= 60.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl Default for RiskBand {
    fn default() -> Self {
        Self::Low
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Whether effective capacity can absorb the committed scope.
///
/// `Unknown` (rendered "—") means the setup is incomplete: commitment or
/// capacity is zero, so the label carries no information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityHealth {
    Healthy,
    #[serde(rename = "At Risk")]
    AtRisk,
    Critical,
    #[serde(rename = "—")]
    Unknown,
}

impl Default for CapacityHealth {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for CapacityHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::AtRisk => write!(f, "At Risk"),
            Self::Critical => write!(f, "Critical"),
            Self::Unknown => write!(f, "—"),
        }
    }
}
