use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use reqwest::{header, multipart, Client, StatusCode};

use super::types::{
    AckResponse, ClassifyResponse, DashboardResponse, ProbeResponse, StartSessionRequest,
    StartSessionResponse,
};
use crate::models::{DashboardData, DetectionResult};

/// Marker string the backend's root endpoint returns; a probe only counts
/// as a hit when the `message` field matches this exactly, so another LAN
/// device answering on the same port is never mistaken for the backend.
pub const DISCOVERY_MARKER: &str = "DrowsyGuard API";

const PROBE_TIMEOUT: Duration = Duration::from_millis(100);
const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(3);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Stateless HTTP transport for every backend operation.
///
/// All parsing and timeout policy lives here. Failures never escape as
/// errors: each operation collapses transport faults, timeouts, non-2xx
/// statuses and malformed payloads into `None`/`false`, logging at debug
/// level so the detection loop can keep running through network noise.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
}

impl BackendClient {
    pub fn new() -> Self {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            // A redirect would replay the multipart POST as a GET
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }

    /// Discovery probe: GET the base URL and check the marker. Uniformly
    /// `false` on any failure mode; the scanner treats every candidate
    /// the same way.
    pub async fn probe(&self, base_url: &str) -> bool {
        let response = match self
            .http
            .get(base_url)
            .header(header::CONNECTION, "close")
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(_) => return false,
        };

        if response.status() != StatusCode::OK {
            return false;
        }

        match response.json::<ProbeResponse>().await {
            Ok(body) => body.message.as_deref() == Some(DISCOVERY_MARKER),
            Err(_) => false,
        }
    }

    /// Start a server-tracked session. `None` means the session could not
    /// be created; callers are expected to fall back to stateless
    /// classification rather than treat this as fatal.
    pub async fn start_session(
        &self,
        base_url: &str,
        user_id: i64,
        location: Option<(f64, f64)>,
    ) -> Option<i64> {
        let body = StartSessionRequest {
            user_id,
            latitude: location.map(|(lat, _)| lat),
            longitude: location.map(|(_, lng)| lng),
        };

        let response = match self
            .http
            .post(format!("{base_url}/sessions/start"))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("start_session transport error: {err}");
                return None;
            }
        };

        match response.json::<StartSessionResponse>().await {
            Ok(parsed) if parsed.success => parsed.session_id,
            Ok(_) => {
                debug!("start_session rejected by backend");
                None
            }
            Err(err) => {
                debug!("start_session payload error: {err}");
                None
            }
        }
    }

    /// End a session. Best effort: the return value says whether the
    /// server acknowledged, and callers only log it.
    pub async fn end_session(&self, base_url: &str, session_id: i64) -> bool {
        let response = match self
            .http
            .post(format!("{base_url}/sessions/{session_id}/end"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("end_session({session_id}) transport error: {err}");
                return false;
            }
        };

        match response.json::<AckResponse>().await {
            Ok(parsed) => parsed.success,
            Err(err) => {
                warn!("end_session({session_id}) payload error: {err}");
                false
            }
        }
    }

    /// Upload one frame for classification. Session-bound when an id is
    /// held, stateless otherwise. Hard 3 s cap covers the whole upload
    /// and response read.
    pub async fn classify_frame(
        &self,
        base_url: &str,
        session_id: Option<i64>,
        frame_path: &Path,
    ) -> Option<DetectionResult> {
        let bytes = match tokio::fs::read(frame_path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("failed to read frame {}: {err}", frame_path.display());
                return None;
            }
        };

        let file_name = frame_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame.jpg".to_string());

        let part = match multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
        {
            Ok(part) => part,
            Err(err) => {
                debug!("failed to build multipart body: {err}");
                return None;
            }
        };
        let form = multipart::Form::new().part("file", part);

        let url = match session_id {
            Some(id) => format!("{base_url}/detect/{id}"),
            None => format!("{base_url}/predict_frame"),
        };

        let response = match self
            .http
            .post(&url)
            .multipart(form)
            .timeout(CLASSIFY_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("classify_frame transport error: {err}");
                return None;
            }
        };

        match response.json::<ClassifyResponse>().await {
            Ok(parsed) if parsed.success => parsed.data,
            Ok(_) => {
                debug!("classify_frame rejected by backend");
                None
            }
            Err(err) => {
                debug!("classify_frame payload error: {err}");
                None
            }
        }
    }

    /// Fetch the aggregate dashboard for one user.
    pub async fn fetch_dashboard(&self, base_url: &str, user_id: i64) -> Option<DashboardData> {
        let response = match self
            .http
            .get(format!("{base_url}/users/{user_id}/dashboard"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("fetch_dashboard transport error: {err}");
                return None;
            }
        };

        match response.json::<DashboardResponse>().await {
            Ok(parsed) if parsed.success => parsed.data,
            Ok(_) | Err(_) => None,
        }
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}
