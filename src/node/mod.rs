//! Node snapshot types
//!
//! A snapshot is the complete, immutable set of data polled from one
//! instance during one load cycle. A fresh load produces a fresh snapshot;
//! fields are never mutated in place.

pub mod client;

pub use client::NodeApiClient;

use serde::{Deserialize, Serialize};

/// On-chain and network addresses of a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub hopr_address: String,
    pub native_address: String,
}

/// Token balances as base-unit integer strings (18-decimal fixed point)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeBalance {
    pub hopr: String,
    pub native: String,
}

/// Everything polled from one instance in one load cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// 0-based position within the host's fleet
    pub instance_index: usize,
    pub http_endpoint: String,
    pub ws_endpoint: String,
    pub identity: NodeIdentity,
    pub balance: NodeBalance,
    pub version: String,
    /// Opaque node info payload
    pub info: serde_json::Value,
    /// Opaque channel list, shape `{incoming: [...], outgoing: [...]}`
    pub channels: serde_json::Value,
    /// Opaque ticket summary
    pub tickets: serde_json::Value,
}

/// Ordered snapshots for one host, index-stable: `instance_index` equals
/// position in the sequence.
pub type Fleet = Vec<NodeSnapshot>;

/// Scale a base-unit balance string to its 4-decimal display value.
///
/// Balances arrive as 18-decimal fixed-point integers; display divides by
/// 10^14 and then by 10^4. `"1234000000000000000"` becomes `1.234`.
pub fn display_balance(base_units: &str) -> Option<f64> {
    let units: u128 = base_units.parse().ok()?;
    Some((units / 10u128.pow(14)) as f64 / 10_000.0)
}

/// Shorten a long address for table display: first and last `chars`
/// characters joined by an ellipsis. Counts characters, not bytes, since
/// identity strings arrive from the network and are not guaranteed ASCII.
pub fn truncate_middle(s: &str, chars: usize) -> String {
    let count = s.chars().count();
    if count <= chars * 2 {
        return s.to_string();
    }
    let head: String = s.chars().take(chars).collect();
    let tail: String = s.chars().skip(count - chars).collect();
    format!("{}...{}", head, tail)
}
