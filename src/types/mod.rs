//! Shared types for lookout

pub mod error;

pub use error::{LookoutError, Result};
