pub mod client;
mod types;

pub use client::{BackendClient, DISCOVERY_MARKER};
