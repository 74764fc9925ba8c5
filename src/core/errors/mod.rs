//! Error types for session management.
//!
//! This module provides the error enum shared by every operation in the crate,
//! helper constructors, and a coarse [`ErrorCategory`] for callers that only need
//! to decide how to react.
//!
//! # Usage
//!
//! ```rust
//! use oar_session::core::errors::{ErrorCategory, SessionError};
//!
//! let error = SessionError::config_error("intra_threads must be greater than 0");
//! assert_eq!(error.category(), ErrorCategory::Configuration);
//! ```

pub mod constructors;
pub mod types;

pub use types::{ErrorCategory, OpaqueError, SessionError};

/// Convenient result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
