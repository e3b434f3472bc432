pub mod controller;
pub mod loop_worker;
pub mod state;

pub use controller::{DetectionConfig, DetectionController};
pub use loop_worker::indicates_drowsiness;
pub use state::{DetectionSnapshot, DetectionStatus};
