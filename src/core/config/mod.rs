//! Session configuration and validation.

pub mod errors;
pub mod onnx;

pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{GraphOptimization, SessionConfig, SessionLogLevel};
