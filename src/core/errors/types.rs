//! Error types for session management.
//!
//! This module defines the errors that can occur while bootstrapping ONNX Runtime,
//! resolving and loading models, configuring execution providers and reading
//! tensor metadata back off a built session.

use crate::core::providers::ExecutionProvider;
use thiserror::Error;

/// Boxed error used as the source of wrapped engine failures.
pub type OpaqueError = Box<dyn std::error::Error + Send + Sync>;

/// Broad classification of a [`SessionError`].
///
/// Callers that only need to decide how to react (abort, retry with another model,
/// report a misconfiguration) can match on the category instead of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The runtime API or an environment could not be created.
    Initialization,
    /// An operation was called before its prerequisites were met.
    Precondition,
    /// The model resolver produced an unusable path.
    Resolution,
    /// The engine rejected the model.
    ModelLoad,
    /// A requested execution provider could not be used.
    Provider,
    /// Session metadata could not be interpreted.
    Metadata,
    /// Invalid configuration.
    Configuration,
    /// A raw error from ONNX Runtime.
    Engine,
    /// File system error.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Initialization => write!(f, "initialization"),
            ErrorCategory::Precondition => write!(f, "precondition"),
            ErrorCategory::Resolution => write!(f, "resolution"),
            ErrorCategory::ModelLoad => write!(f, "model load"),
            ErrorCategory::Provider => write!(f, "execution provider"),
            ErrorCategory::Metadata => write!(f, "metadata"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Engine => write!(f, "engine"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Errors produced by the session management layer.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The ONNX Runtime API or an environment could not be initialized.
    #[error("initialization failed: {context}")]
    Initialization {
        /// What was being initialized.
        context: String,
        /// The underlying engine error, if any.
        #[source]
        source: Option<OpaqueError>,
    },

    /// An operation was attempted before `init_ort_api` succeeded.
    #[error("ONNX Runtime API is not initialized; call init_ort_api() before {operation}")]
    NotInitialized {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The model resolver returned an empty or non-existent path.
    #[error("failed to resolve model '{identifier}' (path: '{path}'): {reason}")]
    Resolution {
        /// The logical model identifier passed to the resolver.
        identifier: String,
        /// The path the resolver produced.
        path: String,
        /// Why the path is unusable.
        reason: String,
    },

    /// The engine rejected the model under every attempted execution provider.
    #[error("failed to load model '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path or description of the model source.
        model_path: String,
        /// Why loading failed.
        reason: String,
        /// Optional suggestion, pre-formatted with a leading separator.
        suggestion: String,
        /// The last engine diagnostic.
        #[source]
        source: Option<OpaqueError>,
    },

    /// A requested execution provider is not usable in this build or on this host.
    #[error("execution provider '{provider}' is unavailable: {reason}")]
    ProviderUnavailable {
        /// The provider that was requested.
        provider: ExecutionProvider,
        /// Why it cannot be used.
        reason: String,
    },

    /// A declared input or output is not a tensor.
    #[error("{direction} '{name}' (index {index}) is not a tensor: {kind}")]
    UnsupportedValueType {
        /// Either "input" or "output".
        direction: &'static str,
        /// The declared name of the value.
        name: String,
        /// Position in declaration order.
        index: usize,
        /// Debug description of the declared value type.
        kind: String,
    },

    /// Invalid configuration.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Returns the broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Initialization { .. } => ErrorCategory::Initialization,
            SessionError::NotInitialized { .. } => ErrorCategory::Precondition,
            SessionError::Resolution { .. } => ErrorCategory::Resolution,
            SessionError::ModelLoad { .. } => ErrorCategory::ModelLoad,
            SessionError::ProviderUnavailable { .. } => ErrorCategory::Provider,
            SessionError::UnsupportedValueType { .. } => ErrorCategory::Metadata,
            SessionError::ConfigError { .. } => ErrorCategory::Configuration,
            SessionError::Session(_) => ErrorCategory::Engine,
            SessionError::Io(_) => ErrorCategory::Io,
        }
    }
}

impl From<crate::core::config::ConfigError> for SessionError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
