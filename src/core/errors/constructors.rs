//! Error constructor utilities.
//!
//! Helper functions for creating [`SessionError`] values with consistent messages
//! and error chaining, so call sites stay short.
//!
//! ```rust
//! use oar_session::core::errors::{ErrorCategory, SessionError};
//!
//! let error = SessionError::resolution("mnist", "", "resolver returned an empty path");
//! assert_eq!(error.category(), ErrorCategory::Resolution);
//!
//! let error = SessionError::model_load_error(
//!     "models/mnist.onnx",
//!     "no execution provider accepted the model",
//!     Some("verify the file is a valid ONNX model"),
//!     None::<std::io::Error>,
//! );
//! assert!(error.to_string().contains("suggested fix"));
//! ```

use super::types::{OpaqueError, SessionError};
use crate::core::providers::ExecutionProvider;
use std::path::Path;

impl SessionError {
    /// Creates an initialization error.
    ///
    /// # Arguments
    ///
    /// * `context` - What was being initialized.
    /// * `source` - The underlying error, if any.
    pub fn initialization(
        context: impl Into<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::Initialization {
            context: context.into(),
            source: source.map(|e| Box::new(e) as OpaqueError),
        }
    }

    /// Creates a precondition error for an operation attempted before initialization.
    pub fn not_initialized(operation: &'static str) -> Self {
        Self::NotInitialized { operation }
    }

    /// Creates a resolution error.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The logical model identifier given to the resolver.
    /// * `path` - The path the resolver returned.
    /// * `reason` - Why the path cannot be used.
    pub fn resolution(
        identifier: impl Into<String>,
        path: impl AsRef<Path>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            identifier: identifier.into(),
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a model load error.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path (or description) of the model source.
    /// * `reason` - Why loading failed.
    /// * `suggestion` - An optional hint for the caller.
    /// * `source` - The underlying engine error, if any.
    pub fn model_load_error(
        model_path: impl AsRef<Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {}", s))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as OpaqueError),
        }
    }

    /// Creates an error for a provider that cannot be used.
    pub fn provider_unavailable(provider: ExecutionProvider, reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            reason: reason.into(),
        }
    }

    /// Creates an error for a declared value that is not a tensor.
    pub fn unsupported_value_type(
        direction: &'static str,
        name: impl Into<String>,
        index: usize,
        kind: impl std::fmt::Debug,
    ) -> Self {
        Self::UnsupportedValueType {
            direction,
            name: name.into(),
            index,
            kind: format!("{:?}", kind),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}
