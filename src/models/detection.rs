use serde::{Deserialize, Serialize};

/// One classification produced by the backend for a single frame.
///
/// Field names follow the backend's JSON. `is_drowsy` and `alert_level`
/// are only present on session-bound classifications; older backends omit
/// them entirely, so both are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_drowsy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<String>,
}

/// Per-session tallies, zeroed when a detection period begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub detection_count: u64,
    pub alert_count: u64,
}
