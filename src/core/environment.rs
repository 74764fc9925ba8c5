//! Process-wide ONNX Runtime bootstrap and named environments.
//!
//! [`init_ort_api`] commits the global ONNX Runtime environment exactly once and must
//! run before any other operation in this crate. [`Environment`] is the handle every
//! session is built against: sessions borrow it, so none can outlive it.

use crate::core::config::{ConfigValidator, SessionConfig};
use crate::core::errors::{SessionError, SessionResult};
use once_cell::sync::OnceCell;

/// Name given to the global ONNX Runtime environment.
pub const GLOBAL_ENVIRONMENT_NAME: &str = "oar-session";

static ORT_API: OnceCell<()> = OnceCell::new();

/// Initializes the ONNX Runtime API.
///
/// Safe to call any number of times; every call after the first success is a no-op.
/// A failed attempt leaves the API uninitialized so a later call can retry.
///
/// # Errors
///
/// Returns [`SessionError::Initialization`] when the engine cannot be loaded or
/// rejects the environment.
pub fn init_ort_api() -> SessionResult<()> {
    ORT_API.get_or_try_init(commit_global_environment)?;
    Ok(())
}

fn commit_global_environment() -> SessionResult<()> {
    ort::init()
        .with_name(GLOBAL_ENVIRONMENT_NAME)
        .commit()
        .map_err(|e| SessionError::initialization("failed to initialize ONNX Runtime", Some(e)))?;
    tracing::debug!(name = GLOBAL_ENVIRONMENT_NAME, "ONNX Runtime API initialized");
    Ok(())
}

/// Returns whether [`init_ort_api`] has succeeded in this process.
pub fn is_ort_api_initialized() -> bool {
    ORT_API.get().is_some()
}

pub(crate) fn ensure_initialized(operation: &'static str) -> SessionResult<()> {
    if is_ort_api_initialized() {
        Ok(())
    } else {
        Err(SessionError::not_initialized(operation))
    }
}

/// A named inference environment.
///
/// Holds the diagnostic name used to namespace log output and the default session
/// configuration for every session built against it. Not `Clone`: share it by
/// reference.
#[derive(Debug)]
pub struct Environment {
    name: String,
    config: SessionConfig,
}

impl Environment {
    /// The environment's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default configuration applied to sessions built from this environment.
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }
}

/// Creates a new environment with the default session configuration.
///
/// # Errors
///
/// - [`SessionError::NotInitialized`] if [`init_ort_api`] has not been called.
/// - [`SessionError::Initialization`] if `name` is blank or contains a NUL byte.
pub fn create_environment(name: &str) -> SessionResult<Environment> {
    create_environment_with_config(name, SessionConfig::default())
}

/// Creates a new environment whose sessions default to `config`.
///
/// # Errors
///
/// Same as [`create_environment`], plus [`SessionError::ConfigError`] when `config`
/// fails validation.
pub fn create_environment_with_config(
    name: &str,
    config: SessionConfig,
) -> SessionResult<Environment> {
    ensure_initialized("create_environment")?;

    if name.trim().is_empty() {
        return Err(SessionError::initialization(
            "environment name must not be empty",
            None::<std::io::Error>,
        ));
    }
    if name.contains('\0') {
        return Err(SessionError::initialization(
            format!("environment name {:?} contains a NUL byte", name),
            None::<std::io::Error>,
        ));
    }
    config.validate()?;

    tracing::debug!(environment = name, "created inference environment");
    Ok(Environment {
        name: name.to_string(),
        config,
    })
}
