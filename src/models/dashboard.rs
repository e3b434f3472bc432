use serde::{Deserialize, Serialize};

/// Aggregate driving statistics for one user, as returned by
/// `GET /users/{id}/dashboard`. Every field defaults so a sparse or older
/// backend payload still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_alerts: u64,
    #[serde(default)]
    pub total_detections: u64,
    #[serde(default)]
    pub safety_score: f64,
    #[serde(default)]
    pub recent_sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: i64,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub alerts: u64,
    #[serde(default)]
    pub total_detections: u64,
}
