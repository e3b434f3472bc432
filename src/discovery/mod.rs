pub mod cache;
pub mod network;
pub mod scanner;

pub use cache::DiscoveryCache;
pub use scanner::{NetworkScanner, Probe};
