//! Headless core of the DrowsyGuard driver-monitoring client.
//!
//! Two subsystems do the heavy lifting: zero-configuration discovery of
//! the inference backend on the local /24 subnet ([`discovery`]), and the
//! detection session engine that drives the capture→classify→alert loop
//! against it ([`detection`]). Everything else is the seams those two
//! need: the HTTP transport ([`backend`]) and the camera/alert
//! collaborator traits ([`camera`], [`alert`]).

pub mod alert;
pub mod backend;
pub mod camera;
pub mod detection;
pub mod discovery;
pub mod models;

pub use alert::{AlertSink, NullAlert, ToneAlert};
pub use backend::{BackendClient, DISCOVERY_MARKER};
pub use camera::{FrameSource, StillFrameSource};
pub use detection::{DetectionConfig, DetectionController, DetectionSnapshot, DetectionStatus};
pub use discovery::{DiscoveryCache, NetworkScanner, Probe};
pub use models::{ActiveSession, DashboardData, DetectionResult, SessionCounters};
