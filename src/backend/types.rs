//! Wire types for the backend's JSON surface. Field names are the
//! backend's own (snake_case); everything defaults so a partial payload
//! degrades to "no result" instead of a parse error.

use serde::{Deserialize, Serialize};

use crate::models::{DashboardData, DetectionResult};

#[derive(Debug, Deserialize)]
pub(crate) struct ProbeResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartSessionRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartSessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AckResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<DetectionResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<DashboardData>,
}
