use std::future::Future;

use log::{info, warn};
use tokio::sync::Mutex;

use super::cache::DiscoveryCache;
use super::network;
use crate::backend::BackendClient;

/// Probing seam for the scanner. `BackendClient` is the production
/// implementation; tests substitute synthetic responders.
pub trait Probe: Send + Sync {
    fn probe(&self, base_url: &str) -> impl Future<Output = bool> + Send;
}

impl Probe for BackendClient {
    fn probe(&self, base_url: &str) -> impl Future<Output = bool> + Send {
        BackendClient::probe(self, base_url)
    }
}

/// Zero-configuration backend discovery over the local /24 subnet.
///
/// The first successful probe wins and is stored in the shared
/// [`DiscoveryCache`]; until the cache is cleared, `discover` returns the
/// stored URL without touching the network. Concurrent `discover` calls
/// are serialized onto one scan by the gate mutex so two callers never
/// race into a double sweep.
pub struct NetworkScanner<P: Probe> {
    prober: P,
    cache: DiscoveryCache,
    scan_gate: Mutex<()>,
    subnet_override: Option<String>,
}

impl<P: Probe> NetworkScanner<P> {
    pub fn new(prober: P, cache: DiscoveryCache) -> Self {
        Self {
            prober,
            cache,
            scan_gate: Mutex::new(()),
            subnet_override: None,
        }
    }

    /// Pin the subnet prefix (e.g. `"192.168.1"`) instead of deriving it
    /// from the default interface. Useful on multi-homed hosts.
    pub fn with_subnet(mut self, prefix: impl Into<String>) -> Self {
        self.subnet_override = Some(prefix.into());
        self
    }

    /// Resolve the backend base URL, scanning the subnet if the cache is
    /// empty. `None` means the device has no usable IPv4 address or no
    /// candidate answered the marker probe.
    pub async fn discover(&self) -> Option<String> {
        if let Some(url) = self.cache.get() {
            return Some(url);
        }

        let _scan = self.scan_gate.lock().await;

        // A concurrent caller may have finished the scan while we waited
        // on the gate.
        if let Some(url) = self.cache.get() {
            return Some(url);
        }

        let prefix = match &self.subnet_override {
            Some(prefix) => prefix.clone(),
            None => network::subnet_prefix(network::local_ipv4()?),
        };

        info!("scanning {prefix}.0/24 for the backend");

        for url in network::candidate_urls(&prefix) {
            if self.prober.probe(&url).await {
                info!("backend found at {url}");
                self.cache.set(url.clone());
                return Some(url);
            }
        }

        warn!("no backend answered on {prefix}.0/24");
        None
    }

    /// Forget the cached URL so the next `discover` re-scans.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
