use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::controller::DetectionConfig;
use super::state::{DetectionSnapshot, DetectionState};
use crate::alert::AlertSink;
use crate::backend::BackendClient;
use crate::camera::FrameSource;
use crate::models::{ActiveSession, DetectionResult};

const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Drowsiness predicate: the label mentions "drowsy" in any casing and
/// the confidence is strictly above the threshold. A confidence of
/// exactly 0.6 does not alert.
pub fn indicates_drowsiness(result: &DetectionResult) -> bool {
    result.prediction.to_lowercase().contains("drowsy")
        && result.confidence > CONFIDENCE_THRESHOLD
}

pub(crate) struct LoopContext {
    pub state: Arc<Mutex<DetectionState>>,
    pub backend: Arc<BackendClient>,
    pub camera: Arc<dyn FrameSource>,
    pub alert: Arc<dyn AlertSink>,
    pub updates: watch::Sender<DetectionSnapshot>,
    pub config: DetectionConfig,
    pub base_url: String,
    pub generation: u64,
}

enum TickOutcome {
    Classified(DetectionResult),
    Failed(String),
}

pub(crate) async fn detection_loop(ctx: LoopContext, cancel: CancellationToken) {
    let LoopContext {
        state,
        backend,
        camera,
        alert,
        updates,
        config,
        base_url,
        generation,
    } = ctx;

    // The controller already flipped to Detecting; the session is opened
    // from inside the loop so a failed start degrades to stateless
    // classification instead of blocking the transition.
    let session_id = tokio::select! {
        id = backend.start_session(&base_url, config.user_id, config.location) => id,
        _ = cancel.cancelled() => return,
    };

    match session_id {
        Some(id) => {
            let mut guard = state.lock().await;
            if guard.generation != generation {
                return; // stopped while the start call was in flight
            }
            guard.session = Some(ActiveSession {
                id,
                started_at: Utc::now(),
            });
            updates.send_replace(guard.snapshot());
            info!("session {id} started");
        }
        None => warn!("session start failed; detecting in stateless mode"),
    }

    let mut ticker = interval(config.tick_interval);
    // The loop awaits each classification inline, so a tick firing while
    // the previous upload is outstanding is skipped, never queued. At
    // most one classification is in flight at any time.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let session_id = {
                    let guard = state.lock().await;
                    if guard.generation != generation {
                        break;
                    }
                    guard.session.as_ref().map(|session| session.id)
                };

                let outcome = tokio::select! {
                    outcome = run_tick(camera.clone(), &backend, &base_url, session_id) => outcome,
                    // In-flight capture/classify is discarded on stop.
                    _ = cancel.cancelled() => break,
                };

                if !apply_outcome(&state, alert.as_ref(), &updates, generation, outcome).await {
                    break;
                }
            }
            _ = cancel.cancelled() => {
                debug!("detection loop shutting down");
                break;
            }
        }
    }
}

async fn run_tick(
    camera: Arc<dyn FrameSource>,
    backend: &BackendClient,
    base_url: &str,
    session_id: Option<i64>,
) -> TickOutcome {
    let frame_path = match tokio::task::spawn_blocking(move || camera.capture_frame()).await {
        Ok(Ok(path)) => path,
        Ok(Err(err)) => return TickOutcome::Failed(format!("frame capture failed: {err}")),
        Err(err) => return TickOutcome::Failed(format!("capture worker join failed: {err}")),
    };

    match backend
        .classify_frame(base_url, session_id, &frame_path)
        .await
    {
        Some(result) => TickOutcome::Classified(result),
        None => TickOutcome::Failed("classification unavailable".to_string()),
    }
}

/// Fold one tick's outcome into shared state. Returns false when the
/// generation moved on, i.e. the controller stopped while the tick ran.
async fn apply_outcome(
    state: &Mutex<DetectionState>,
    alert: &dyn AlertSink,
    updates: &watch::Sender<DetectionSnapshot>,
    generation: u64,
    outcome: TickOutcome,
) -> bool {
    let drowsy = {
        let mut guard = state.lock().await;
        if guard.generation != generation {
            return false;
        }

        let drowsy = match outcome {
            TickOutcome::Classified(result) => {
                guard.counters.detection_count += 1;
                let drowsy = indicates_drowsiness(&result);
                if drowsy {
                    guard.counters.alert_count += 1;
                    guard.drowsy_alert = true;
                } else {
                    guard.drowsy_alert = false;
                }
                guard.last_result = Some(result);
                guard.last_error = None;
                Some(drowsy)
            }
            TickOutcome::Failed(message) => {
                debug!("detection tick failed: {message}");
                guard.last_error = Some(message);
                None
            }
        };

        updates.send_replace(guard.snapshot());
        drowsy
    };

    // The sink is driven outside the state lock; both calls are
    // idempotent. A failed tick leaves the sink untouched.
    match drowsy {
        Some(true) => alert.start(),
        Some(false) => alert.stop(),
        None => {}
    }

    true
}
