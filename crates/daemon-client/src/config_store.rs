//! Shared, concurrently updated client configuration.
//!
//! The store publishes immutable [`ClientConfig`] snapshots. Writers build a
//! complete replacement and swap it in; readers clone the `Arc` and release
//! the lock straight away, so header injection never observes a partially
//! written configuration.
//!
//! The last dispatched [`Operation`] lives under the same lock as the
//! configuration so that the pair is always read consistently.

use std::sync::Arc;

use api::{ClientConfig, Operation};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Snapshot {
    config: Arc<ClientConfig>,
    last_operation: Option<Operation>,
}

/// Holds the identity/auth options of one client handle.
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<Snapshot>,
}

impl ConfigStore {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: RwLock::new(Snapshot {
                config: Arc::new(config),
                last_operation: None,
            }),
        }
    }

    /// Replaces every field at once.
    pub fn set_options(&self, config: ClientConfig) {
        let config = Arc::new(config);
        self.inner.write().config = config;
    }

    /// Returns the current configuration snapshot.
    pub fn snapshot(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.inner.read().config)
    }

    /// Returns one `(name, value)` header per non-empty field.
    pub fn get_headers(&self) -> Vec<(&'static str, String)> {
        self.snapshot()
            .headers()
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect()
    }

    /// Records `operation` as the one being dispatched and returns the
    /// configuration it must be sent with, in a single critical section.
    pub fn begin(&self, operation: &Operation) -> Arc<ClientConfig> {
        let mut inner = self.inner.write();
        inner.last_operation = Some(operation.clone());
        Arc::clone(&inner.config)
    }

    /// The most recently dispatched operation, if any.
    pub fn last_operation(&self) -> Option<Operation> {
        self.inner.read().last_operation.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use api::{PROFILE_HEADER, REGION_HEADER};

    use super::*;

    #[test]
    fn set_options_replaces_instead_of_merging() {
        let store = ConfigStore::new(ClientConfig::default().with_profile("p1").with_api_key("k"));
        store.set_options(ClientConfig::default().with_region("r2"));

        assert_eq!(store.get_headers(), vec![(REGION_HEADER, "r2".to_string())]);
    }

    #[test]
    fn begin_records_the_operation() {
        let store = ConfigStore::default();
        assert!(store.last_operation().is_none());

        let config = store.begin(&Operation::new("GET", "/api/v1/ping"));
        assert!(config.headers().is_empty());
        assert_eq!(
            store.last_operation().map(|op| op.to_string()),
            Some("GET /api/v1/ping".to_string())
        );
    }

    #[test]
    fn readers_never_observe_a_mixed_configuration() {
        let store = Arc::new(ConfigStore::new(
            ClientConfig::default().with_profile("a").with_region("a"),
        ));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..2_000 {
                    let tag = if i % 2 == 0 { "a" } else { "b" };
                    store.set_options(ClientConfig::default().with_profile(tag).with_region(tag));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let headers = store.get_headers();
                        assert_eq!(headers.len(), 2);
                        assert_eq!(headers[0].0, PROFILE_HEADER);
                        assert_eq!(headers[1].0, REGION_HEADER);
                        assert_eq!(headers[0].1, headers[1].1);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
