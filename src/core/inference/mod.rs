//! Inference session construction and metadata.
//!
//! [`SessionBuilder`] selects an execution provider and loads the model,
//! [`Session`] holds the result, and [`shapes`] reads the declared tensor shapes back.

pub mod builder;
pub mod session;
pub mod shapes;

pub use builder::{SessionBuilder, make_session_from_file, make_session_from_memory};
pub use session::{ModelSource, ProviderAttempt, ProviderOutcome, Session};
pub use shapes::{
    DYNAMIC_DIM, ShapeDescriptor, TensorInfo, get_input_info, get_input_shapes, get_output_info,
    get_output_shapes,
};
