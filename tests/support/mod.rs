#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use drowsyguard::AlertSink;

/// Shared, mutable knobs for the mock backend. Tests flip these to
/// simulate latency, refusals and different classifications.
pub struct BackendState {
    pub marker: Mutex<String>,
    pub root_delay_ms: AtomicUsize,
    pub prediction: Mutex<(String, f64)>,
    pub classify_delay_ms: AtomicUsize,
    pub classify_fail: AtomicBool,
    pub fail_session_start: AtomicBool,
    pub session_calls: AtomicUsize,
    pub stateless_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub ended_sessions: Mutex<Vec<i64>>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            marker: Mutex::new("DrowsyGuard API".to_string()),
            root_delay_ms: AtomicUsize::new(0),
            prediction: Mutex::new(("alert".to_string(), 0.9)),
            classify_delay_ms: AtomicUsize::new(0),
            classify_fail: AtomicBool::new(false),
            fail_session_start: AtomicBool::new(false),
            session_calls: AtomicUsize::new(0),
            stateless_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            ended_sessions: Mutex::new(Vec::new()),
        }
    }
}

/// In-process stand-in for the DrowsyGuard API, bound to an ephemeral
/// 127.0.0.1 port and serving the same JSON shapes as the real backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());

        let app = Router::new()
            .route("/", get(root))
            .route("/sessions/start", post(start_session))
            .route("/sessions/:id/end", post(end_session))
            .route("/detect/:id", post(detect))
            .route("/predict_frame", post(predict_frame))
            .route("/users/:id/dashboard", get(dashboard))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_prediction(&self, label: &str, confidence: f64) {
        *self.state.prediction.lock().unwrap() = (label.to_string(), confidence);
    }

    pub fn classify_calls(&self) -> usize {
        self.state.session_calls.load(Ordering::SeqCst)
            + self.state.stateless_calls.load(Ordering::SeqCst)
    }
}

async fn root(State(state): State<Arc<BackendState>>) -> Json<Value> {
    let delay = state.root_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }
    let marker = state.marker.lock().unwrap().clone();
    Json(json!({"message": marker, "status": "running"}))
}

async fn start_session(State(state): State<Arc<BackendState>>) -> Json<Value> {
    if state.fail_session_start.load(Ordering::SeqCst) {
        return Json(json!({"success": false, "message": "Failed to start session"}));
    }
    Json(json!({"success": true, "session_id": 1}))
}

async fn end_session(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    state.ended_sessions.lock().unwrap().push(id);
    Json(json!({"success": true, "message": "Session ended successfully"}))
}

async fn detect(State(state): State<Arc<BackendState>>, Path(_id): Path<i64>) -> Json<Value> {
    state.session_calls.fetch_add(1, Ordering::SeqCst);
    classify(&state, true).await
}

async fn predict_frame(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state.stateless_calls.fetch_add(1, Ordering::SeqCst);
    classify(&state, false).await
}

async fn classify(state: &BackendState, session_bound: bool) -> Json<Value> {
    let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(current, Ordering::SeqCst);

    let delay = state.classify_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }

    let response = if state.classify_fail.load(Ordering::SeqCst) {
        json!({"success": false, "message": "Invalid image"})
    } else {
        let (prediction, confidence) = state.prediction.lock().unwrap().clone();
        if session_bound {
            // The real backend enriches session-bound classifications.
            let is_drowsy = prediction.to_lowercase().contains("drowsy") && confidence > 0.7;
            json!({
                "success": true,
                "data": {
                    "prediction": prediction,
                    "confidence": confidence,
                    "is_drowsy": is_drowsy,
                    "alert_level": if is_drowsy && confidence > 0.8 { "high" } else { "low" },
                }
            })
        } else {
            json!({"success": true, "data": {"prediction": prediction, "confidence": confidence}})
        }
    };

    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    Json(response)
}

async fn dashboard(State(_state): State<Arc<BackendState>>, Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "total_sessions": 2,
            "total_alerts": 3,
            "total_detections": 58,
            "safety_score": 89.7,
            "recent_sessions": [
                {"id": 1, "start_time": "2025-06-01 08:00:00", "end_time": "2025-06-01 09:00:00", "alerts": 3, "total_detections": 58}
            ]
        }
    }))
}

/// Alert sink that records every transition instead of making noise.
#[derive(Default)]
pub struct RecordingAlert {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub active: AtomicBool,
}

impl AlertSink for RecordingAlert {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.active.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }
}
