//! Host registry
//!
//! Process-wide mapping from raw host input to its parsed URL, environment
//! classification, and access token. Mutated only by explicit register and
//! clear actions; every mutation bumps a watch channel so the aggregation
//! layer can react.

use reqwest::Url;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// A registered host, immutable once created
#[derive(Debug, Clone)]
pub struct Host {
    /// Raw user input, unique key in the registry
    pub identifier: String,
    pub url: Url,
    /// Last two dot-separated labels of the hostname, e.g. `gitpod.io`
    pub environment: String,
    pub access_token: String,
}

impl Host {
    /// Parse raw input into a host. Returns `None` for anything that is not
    /// a valid URL - partial keystroke input is expected and not an error.
    pub fn parse(raw: &str, access_token: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        let hostname = url.host_str()?;

        let labels: Vec<&str> = hostname.split('.').collect();
        let environment = labels[labels.len().saturating_sub(2)..].join(".");

        Some(Self {
            identifier: raw.to_string(),
            url,
            environment,
            access_token: access_token.to_string(),
        })
    }
}

/// Registry of user-registered hosts, most-recent-first
pub struct HostRegistry {
    hosts: RwLock<Vec<Host>>,
    version: watch::Sender<u64>,
}

impl HostRegistry {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            hosts: RwLock::new(Vec::new()),
            version,
        }
    }

    /// Register a host from raw input.
    ///
    /// Invalid URLs are silently ignored (no state change). A valid input
    /// that is already registered is replaced and moved to the front.
    pub async fn register(&self, raw: &str, access_token: &str) -> Option<Host> {
        let host = match Host::parse(raw, access_token) {
            Some(host) => host,
            None => {
                debug!(input = %raw, "Ignoring unparseable host input");
                return None;
            }
        };

        {
            let mut hosts = self.hosts.write().await;
            hosts.retain(|h| h.identifier != host.identifier);
            hosts.insert(0, host.clone());
        }

        info!(host = %host.identifier, environment = %host.environment, "Registered host");
        self.bump();
        Some(host)
    }

    /// Remove every registered host
    pub async fn clear(&self) {
        let removed = {
            let mut hosts = self.hosts.write().await;
            let count = hosts.len();
            hosts.clear();
            count
        };

        info!(removed, "Cleared host registry");
        self.bump();
    }

    /// Snapshot of all registered hosts, most-recent-first
    pub async fn list(&self) -> Vec<Host> {
        self.hosts.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.hosts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hosts.read().await.is_empty()
    }

    /// Subscribe to registry changes. The carried value is a version
    /// counter bumped on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}
