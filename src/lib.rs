//! Lookout - fleet monitoring backend for node hosts
//!
//! Lookout turns user-supplied host URLs into fleets of addressable
//! service instances, polls every instance over HTTP for identity,
//! balances, version, channel and ticket data, and keeps a rolling
//! liveness sample per instance.
//!
//! ## Layers
//!
//! - **Profile**: per-environment addressing scheme for a host's instances
//! - **Node**: instance snapshot types and the polling HTTP client
//! - **Fleet**: concurrent per-host fan-out and the aggregation store
//! - **Hosts**: registry of user-registered hosts with change notification
//! - **Liveness**: bounded rolling health samples with lifecycle-bound timers

pub mod config;
pub mod fleet;
pub mod hosts;
pub mod liveness;
pub mod node;
pub mod profile;
pub mod types;

pub use config::Args;
pub use types::{LookoutError, Result};
