// lib.rs - crop production estimator core
pub mod about;
pub mod api;
pub mod common;
pub mod data;
pub mod engine;
pub mod inference;
pub mod model;
pub mod validation;

pub use common::{YieldCode, YieldError, YieldResult};
pub use engine::{Engine, Outcome};
