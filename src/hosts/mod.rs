//! Host registration and classification
//!
//! Turns raw user input into registered hosts and notifies the aggregation
//! layer of every change.

pub mod registry;

pub use registry::{Host, HostRegistry};
