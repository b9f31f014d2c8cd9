//! Fleet loading and aggregation
//!
//! A fleet is the ordered set of instance snapshots belonging to one host.
//! This module owns the concurrent fan-out that builds a fleet and the
//! process-wide store that holds the latest fleet per host.

pub mod loader;
pub mod store;

pub use loader::{FleetLoader, HttpFleetLoader};
pub use store::{Aggregator, FleetStore};
