use serde::{Deserialize, Serialize};

use crate::models::{ActiveSession, DetectionResult, SessionCounters};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DetectionStatus {
    Idle,
    Detecting,
}

impl Default for DetectionStatus {
    fn default() -> Self {
        DetectionStatus::Idle
    }
}

/// Point-in-time status report published on the controller's watch
/// channel after every state change. This is what the embedding UI
/// renders; it carries no control surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSnapshot {
    pub status: DetectionStatus,
    pub session: Option<ActiveSession>,
    pub counters: SessionCounters,
    pub drowsy_alert: bool,
    pub last_result: Option<DetectionResult>,
    pub last_error: Option<String>,
}

/// Mutable controller state, shared between the controller handle and
/// the loop task behind a mutex.
///
/// `generation` is bumped on every begin/end transition; the loop task
/// captures the value it was spawned with and refuses to mutate state
/// once the numbers disagree, so a tick that was in flight when `stop`
/// ran can never resurrect counters or the alert.
#[derive(Debug, Default)]
pub struct DetectionState {
    pub status: DetectionStatus,
    pub base_url: Option<String>,
    pub session: Option<ActiveSession>,
    pub counters: SessionCounters,
    pub drowsy_alert: bool,
    pub last_result: Option<DetectionResult>,
    pub last_error: Option<String>,
    pub generation: u64,
}

impl DetectionState {
    /// Enter Detecting with fresh counters. Returns the generation the
    /// new loop task must carry.
    pub fn begin(&mut self, base_url: String) -> u64 {
        self.status = DetectionStatus::Detecting;
        self.base_url = Some(base_url);
        self.session = None;
        self.counters = SessionCounters::default();
        self.drowsy_alert = false;
        self.last_result = None;
        self.last_error = None;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Return to Idle unconditionally, handing back whatever is needed
    /// for the best-effort end-session call.
    pub fn end(&mut self) -> (Option<ActiveSession>, Option<String>) {
        let session = self.session.take();
        let base_url = self.base_url.take();
        self.status = DetectionStatus::Idle;
        self.counters = SessionCounters::default();
        self.drowsy_alert = false;
        self.generation = self.generation.wrapping_add(1);
        (session, base_url)
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        DetectionSnapshot {
            status: self.status,
            session: self.session.clone(),
            counters: self.counters,
            drowsy_alert: self.drowsy_alert,
            last_result: self.last_result.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
