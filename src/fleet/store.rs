//! Aggregation store
//!
//! Keeps the latest loaded fleet per host and refreshes the whole mapping
//! whenever the host registry changes. Host loads are independent: one
//! host failing never blocks another host's merge, and for a single key
//! the last-completing load wins.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tracing::{info, warn};

use crate::hosts::HostRegistry;
use crate::node::Fleet;

use super::loader::FleetLoader;

/// Latest fleet per host identifier
pub struct FleetStore {
    fleets: DashMap<String, Fleet>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self {
            fleets: DashMap::new(),
        }
    }

    /// Merge a host's fleet, overwriting any prior entry for the key
    pub fn insert(&self, identifier: String, fleet: Fleet) {
        self.fleets.insert(identifier, fleet);
    }

    pub fn get(&self, identifier: &str) -> Option<Fleet> {
        self.fleets.get(identifier).map(|entry| entry.value().clone())
    }

    pub fn clear(&self) {
        self.fleets.clear();
    }

    pub fn len(&self) -> usize {
        self.fleets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fleets.is_empty()
    }

    /// Host identifiers currently holding a fleet
    pub fn identifiers(&self) -> Vec<String> {
        self.fleets.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Reacts to registry changes by reloading every registered host's fleet
/// into the store.
pub struct Aggregator {
    registry: Arc<HostRegistry>,
    store: Arc<FleetStore>,
    loader: Arc<dyn FleetLoader>,
}

impl Aggregator {
    pub fn new(
        registry: Arc<HostRegistry>,
        store: Arc<FleetStore>,
        loader: Arc<dyn FleetLoader>,
    ) -> Self {
        Self {
            registry,
            store,
            loader,
        }
    }

    /// Trigger a fresh load for every currently registered host and wait
    /// for all of them to settle.
    ///
    /// Loads run concurrently and merge independently as they complete. A
    /// failed load is logged and leaves its key absent or stale; other
    /// hosts are unaffected. An empty registry clears the store.
    pub async fn refresh(&self) {
        let hosts = self.registry.list().await;

        if hosts.is_empty() {
            self.store.clear();
            return;
        }

        let loads = hosts.into_iter().map(|host| {
            let loader = Arc::clone(&self.loader);
            let store = Arc::clone(&self.store);
            // Each host gets its own task so a slow or failing host cannot
            // hold up another host's merge.
            tokio::spawn(async move {
                match loader.load(&host).await {
                    Ok(fleet) => {
                        info!(
                            host = %host.identifier,
                            instances = fleet.len(),
                            "Fleet loaded"
                        );
                        store.insert(host.identifier, fleet);
                    }
                    Err(e) => {
                        warn!(host = %host.identifier, error = %e, "Fleet load failed");
                    }
                }
            })
        });

        join_all(loads).await;
    }

    /// Spawn the reaction loop: every registry mutation triggers a refresh
    /// of all hosts. Returns the task handle; dropping or aborting it stops
    /// the loop.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        let mut changes = self.registry.subscribe();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                self.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_prior_fleet() {
        let store = FleetStore::new();
        store.insert("host".to_string(), Vec::new());
        assert_eq!(store.get("host").unwrap().len(), 0);
        assert_eq!(store.len(), 1);

        store.insert("host".to_string(), Vec::new());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_and_identifiers() {
        let store = FleetStore::new();
        store.insert("a".to_string(), Vec::new());
        store.insert("b".to_string(), Vec::new());

        let mut ids = store.identifiers();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

        store.clear();
        assert!(store.is_empty());
        assert!(store.get("a").is_none());
    }
}
