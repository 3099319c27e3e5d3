// =============================================================================
// Sprint Setup Input — Untrusted form values feeding the signal engine
// =============================================================================
//
// The setup record arrives from a UI form (or a persisted copy of one), so
// every field is optional and possibly garbage: absent, null, an empty
// string, or text that is not a number at all. The contract is permissive
// coercion — anything that cannot be read as a finite number becomes 0.
// The engine never rejects a setup; an unusable one simply degrades to the
// incomplete-setup state downstream.

use serde::{Deserialize, Deserializer, Serialize};

/// Coerce an arbitrary value to a finite f64, mapping everything else to 0.
///
/// Mirrors the permissive contract on the deserialization path below so that
/// directly constructed inputs (e.g. `f64::NAN` from a caller's own math)
/// behave identically to parsed ones.
pub fn safe_num(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Lenient field deserializer: accepts a number, a numeric string, null, or
/// anything else, and coerces non-finite / non-numeric values to 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(safe_num(n))
}

/// Raw sprint parameters as entered by the user.
///
/// Wire field names are the dashboard form keys (`sprintDays`,
/// `committedSP`, ...). Every field defaults to 0 when absent; a 0 velocity
/// means "no data for that sprint", not "delivered nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupInput {
    /// Working days in the sprint.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sprint_days: f64,

    /// People on the team for this sprint.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub team_members: f64,

    /// Total planned leave across the team, in person-days.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub leave_days: f64,

    /// Committed story points for this sprint.
    #[serde(rename = "committedSP", default, deserialize_with = "lenient_f64")]
    pub committed_sp: f64,

    /// Story points completed in the most recent finished sprint.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub v1: f64,

    /// Story points completed two sprints ago.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub v2: f64,

    /// Story points completed three sprints ago.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub v3: f64,
}
