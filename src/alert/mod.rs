pub mod tone;

pub use tone::ToneAlert;

/// Alert seam: a repeating indication the detection loop can switch on
/// and off. Both calls are idempotent; the loop invokes them on every
/// classified tick without tracking whether the sink is already in the
/// requested state.
pub trait AlertSink: Send + Sync {
    fn start(&self);
    fn stop(&self);
}

/// Sink that does nothing. For tests and headless deployments.
pub struct NullAlert;

impl AlertSink for NullAlert {
    fn start(&self) {}
    fn stop(&self) {}
}
