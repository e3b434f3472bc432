pub mod dashboard;
pub mod detection;
pub mod session;

pub use dashboard::{DashboardData, SessionSummary};
pub use detection::{DetectionResult, SessionCounters};
pub use session::ActiveSession;
