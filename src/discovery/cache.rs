use std::sync::{Arc, RwLock};

/// Process-wide memory of the last discovered backend base URL.
///
/// Cloneable handle around shared state; hand the same cache to every
/// scanner so discovery runs at most once per process lifetime. Writes
/// happen only on the discovery path, reads everywhere else, and
/// `clear` is the single way to force a re-scan.
#[derive(Clone, Default)]
pub struct DiscoveryCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl DiscoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().unwrap().clone()
    }

    pub fn set(&self, base_url: String) {
        *self.inner.write().unwrap() = Some(base_url);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_round_trip() {
        let cache = DiscoveryCache::new();
        assert_eq!(cache.get(), None);

        cache.set("http://192.168.1.42:5000".to_string());
        assert_eq!(cache.get().as_deref(), Some("http://192.168.1.42:5000"));

        cache.clear();
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn clones_share_state() {
        let cache = DiscoveryCache::new();
        let alias = cache.clone();
        alias.set("http://10.0.0.3:8000".to_string());
        assert_eq!(cache.get().as_deref(), Some("http://10.0.0.3:8000"));
    }
}
