pub mod analyzer;
pub mod config;
pub mod cost;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod normalizer;
pub mod performance;
pub mod repo;
pub mod telemetry;

pub use error::{EngineError, NormalizationWarning};
