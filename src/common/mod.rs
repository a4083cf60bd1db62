//! Shared utilities that glue the different domains together.
pub mod cache;
pub mod config;
pub mod error;
pub mod ids;
pub mod log;

pub use error::{YieldCode, YieldError, YieldResult};
