use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use log::{error, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{detection_loop, LoopContext};
use super::state::{DetectionSnapshot, DetectionState};
use crate::alert::AlertSink;
use crate::backend::BackendClient;
use crate::camera::FrameSource;

const DETECTION_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub user_id: i64,
    /// Optional device position forwarded with the start-session call.
    pub location: Option<(f64, f64)>,
    pub tick_interval: Duration,
}

impl DetectionConfig {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            location: None,
            tick_interval: Duration::from_millis(DETECTION_INTERVAL_MS),
        }
    }
}

/// Orchestrates one capture→classify→alert loop per detection period.
///
/// Two states, Idle and Detecting. `start` flips to Detecting and spawns
/// the loop task before any network I/O completes; `stop` cancels the
/// loop, fires the end-session call detached, and returns to Idle
/// immediately. Status changes are published on a watch channel.
#[derive(Clone)]
pub struct DetectionController {
    state: Arc<Mutex<DetectionState>>,
    backend: Arc<BackendClient>,
    camera: Arc<dyn FrameSource>,
    alert: Arc<dyn AlertSink>,
    config: DetectionConfig,
    loop_task: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
    updates: watch::Sender<DetectionSnapshot>,
}

impl DetectionController {
    pub fn new(
        backend: BackendClient,
        camera: Arc<dyn FrameSource>,
        alert: Arc<dyn AlertSink>,
        config: DetectionConfig,
    ) -> Self {
        let (updates, _) = watch::channel(DetectionState::default().snapshot());

        Self {
            state: Arc::new(Mutex::new(DetectionState::default())),
            backend: Arc::new(backend),
            camera,
            alert,
            config,
            loop_task: Arc::new(Mutex::new(None)),
            updates,
        }
    }

    /// Receiver for status snapshots; a new value arrives after every
    /// state change the loop or the controller makes.
    pub fn subscribe(&self) -> watch::Receiver<DetectionSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> DetectionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Enter Detecting against the given backend base URL. The
    /// transition is optimistic: it happens before the session-start
    /// call resolves, and a failed start only downgrades the loop to
    /// stateless classification.
    pub async fn start(&self, base_url: impl Into<String>) -> Result<DetectionSnapshot> {
        let base_url = base_url.into();

        let mut task_guard = self.loop_task.lock().await;
        if task_guard.is_some() {
            bail!("detection already active");
        }

        let generation = {
            let mut guard = self.state.lock().await;
            let generation = guard.begin(base_url.clone());
            self.updates.send_replace(guard.snapshot());
            generation
        };

        let cancel = CancellationToken::new();
        let ctx = LoopContext {
            state: self.state.clone(),
            backend: self.backend.clone(),
            camera: self.camera.clone(),
            alert: self.alert.clone(),
            updates: self.updates.clone(),
            config: self.config.clone(),
            base_url,
            generation,
        };
        let handle = tokio::spawn(detection_loop(ctx, cancel.clone()));
        *task_guard = Some((cancel, handle));
        drop(task_guard);

        info!("detection started");
        Ok(self.snapshot().await)
    }

    /// Return to Idle. Unconditional and immediate: the loop token is
    /// cancelled, the alert indication is cleared, and the end-session
    /// call (if a session was held) runs detached with its result only
    /// logged. A tick in flight at this point is discarded.
    pub async fn stop(&self) -> Result<DetectionSnapshot> {
        let Some((cancel, handle)) = self.loop_task.lock().await.take() else {
            return Ok(self.snapshot().await);
        };
        cancel.cancel();

        let (session, base_url) = {
            let mut guard = self.state.lock().await;
            let ended = guard.end();
            self.updates.send_replace(guard.snapshot());
            ended
        };
        self.alert.stop();

        if let (Some(session), Some(base_url)) = (session, base_url) {
            let backend = self.backend.clone();
            tokio::spawn(async move {
                if backend.end_session(&base_url, session.id).await {
                    info!("session {} ended", session.id);
                } else {
                    warn!("backend did not acknowledge end of session {}", session.id);
                }
            });
        }

        // The loop exits as soon as it observes the cancelled token, so
        // this join does not delay the transition the caller already saw.
        if let Err(err) = handle.await {
            error!("detection loop task failed to join: {err}");
        }

        info!("detection stopped");
        Ok(self.snapshot().await)
    }

    /// Clear the drowsy indication and silence the sink without leaving
    /// Detecting. Only `stop` ends the loop.
    pub async fn acknowledge_alert(&self) {
        {
            let mut guard = self.state.lock().await;
            guard.drowsy_alert = false;
            self.updates.send_replace(guard.snapshot());
        }
        self.alert.stop();
    }
}
