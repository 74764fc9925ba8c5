//! # OAR Session
//!
//! Inference session management over ONNX Runtime.
//!
//! Given a serialized model and an ordered list of preferred execution providers, this
//! crate builds a ready-to-run [`ort`] session, reports which providers are compiled in
//! and registered on the host, and exposes the declared input and output tensor shapes.
//!
//! ## Features
//!
//! - Idempotent process-wide runtime bootstrap
//! - Named environments with default session configuration
//! - Ordered execution provider selection with explicit CPU fallback
//! - Model loading from resolved files or memory
//! - Shape inspection with dynamic axes reported as `-1`
//!
//! ## Modules
//!
//! * [`core::environment`] - Runtime bootstrap and environments
//! * [`core::providers`] - Execution provider discovery and options
//! * [`core::config`] - Session configuration
//! * [`core::inference`] - Session building and shape inspection
//! * [`core::errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oar_session::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! init_ort_api()?;
//! let env = create_environment("quickstart")?;
//!
//! println!("providers: {:?}", get_execution_providers()?);
//!
//! let session = make_session_from_file("models", &env, |id: &str| format!("{id}.onnx"))?;
//! for (i, shape) in get_input_shapes(&session)?.iter().enumerate() {
//!     println!("input {i}: {shape}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Cargo features
//!
//! Each GPU or accelerator backend is opt-in: `cuda`, `tensorrt`, `directml`, `coreml`,
//! `openvino`, `webgpu`. [`core::providers::is_provider_enabled`] reports the result at
//! compile time.

pub mod core;

/// Prelude module for convenient imports.
///
/// ```rust
/// use oar_session::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        Environment, ExecutionProvider, SessionBuilder, SessionConfig, SessionError, SessionResult,
        ShapeDescriptor, create_environment, get_execution_providers, get_input_shapes,
        get_output_shapes, init_ort_api, is_provider_enabled, make_session_from_file,
        make_session_from_memory,
    };
}
