//! The core module of the session management layer.
//!
//! This module contains:
//! - Runtime bootstrap and named environments
//! - Execution provider discovery and options
//! - Session configuration
//! - Error handling
//! - Session construction and shape inspection
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod environment;
pub mod errors;
pub mod inference;
pub mod providers;

pub use config::{ConfigError, ConfigValidator, GraphOptimization, SessionConfig, SessionLogLevel};
pub use environment::{
    Environment, create_environment, create_environment_with_config, init_ort_api,
    is_ort_api_initialized,
};
pub use errors::{ErrorCategory, SessionError, SessionResult};
pub use inference::{
    DYNAMIC_DIM, ModelSource, ProviderAttempt, ProviderOutcome, Session, SessionBuilder,
    ShapeDescriptor, TensorInfo, get_input_info, get_input_shapes, get_output_info,
    get_output_shapes, make_session_from_file, make_session_from_memory,
};
pub use providers::{
    ExecutionProvider, ProviderOptions, default_execution_providers, get_execution_providers,
    is_provider_enabled,
};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging. Calling it
/// again, or after another global subscriber was installed, is a no-op.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
