use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-tracked monitoring interval. The id comes from the backend's
/// start-session response; the struct lives only for the duration of one
/// detection period and is dropped when the controller returns to idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub id: i64,
    pub started_at: DateTime<Utc>,
}
