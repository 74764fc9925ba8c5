//! Built inference sessions.

use super::shapes::{self, ShapeDescriptor, TensorInfo};
use crate::core::environment::Environment;
use crate::core::errors::SessionResult;
use crate::core::providers::ExecutionProvider;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a session's model bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A model file, after resolution.
    File(PathBuf),
    /// An in-memory buffer of the given length.
    Memory { len: usize },
}

impl ModelSource {
    /// The model path for file-backed sessions.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ModelSource::File(path) => Some(path),
            ModelSource::Memory { .. } => None,
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => write!(f, "{}", path.display()),
            ModelSource::Memory { len } => write!(f, "<memory: {} bytes>", len),
        }
    }
}

/// What happened to one candidate provider while a session was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The session runs on this provider.
    Selected,
    /// Requested, but its integration is not compiled into this build.
    NotCompiled,
    /// The engine refused the model or provider; holds the engine's message.
    Rejected(String),
}

/// One entry of a session's provider search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    /// The provider that was considered.
    pub provider: ExecutionProvider,
    /// What happened to it.
    pub outcome: ProviderOutcome,
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ProviderOutcome::Selected => write!(f, "{}: selected", self.provider),
            ProviderOutcome::NotCompiled => write!(f, "{}: not compiled in", self.provider),
            ProviderOutcome::Rejected(reason) => write!(f, "{}: {}", self.provider, reason),
        }
    }
}

/// A ready-to-run inference session bound to the environment it was built in.
///
/// The session borrows its [`Environment`], so it cannot outlive it. Configuration is
/// fixed once built; [`inner_mut`](Self::inner_mut) exists for running inference, not
/// for reconfiguring.
pub struct Session<'env> {
    inner: ort::session::Session,
    env: &'env Environment,
    provider: ExecutionProvider,
    attempts: Vec<ProviderAttempt>,
    model_source: ModelSource,
}

impl<'env> Session<'env> {
    pub(crate) fn new(
        inner: ort::session::Session,
        env: &'env Environment,
        provider: ExecutionProvider,
        attempts: Vec<ProviderAttempt>,
        model_source: ModelSource,
    ) -> Self {
        Self {
            inner,
            env,
            provider,
            attempts,
            model_source,
        }
    }

    /// The provider that accepted the model.
    pub fn execution_provider(&self) -> ExecutionProvider {
        self.provider
    }

    /// Every candidate considered, in order, ending with the selected one.
    pub fn provider_attempts(&self) -> &[ProviderAttempt] {
        &self.attempts
    }

    /// True if a more preferred provider was skipped or rejected before this one.
    pub fn used_fallback(&self) -> bool {
        self.attempts
            .iter()
            .any(|attempt| attempt.outcome != ProviderOutcome::Selected)
    }

    /// The environment this session was built in.
    pub fn environment(&self) -> &'env Environment {
        self.env
    }

    /// Where the model was loaded from.
    pub fn model_source(&self) -> &ModelSource {
        &self.model_source
    }

    /// Number of declared model inputs.
    pub fn input_count(&self) -> usize {
        self.inner.inputs.len()
    }

    /// Number of declared model outputs.
    pub fn output_count(&self) -> usize {
        self.inner.outputs.len()
    }

    /// The underlying ONNX Runtime session.
    pub fn inner(&self) -> &ort::session::Session {
        &self.inner
    }

    /// Mutable access to the underlying session, needed by `ort` to run inference.
    pub fn inner_mut(&mut self) -> &mut ort::session::Session {
        &mut self.inner
    }

    /// See [`shapes::get_input_shapes`].
    pub fn input_shapes(&self) -> SessionResult<Vec<ShapeDescriptor>> {
        shapes::get_input_shapes(self)
    }

    /// See [`shapes::get_output_shapes`].
    pub fn output_shapes(&self) -> SessionResult<Vec<ShapeDescriptor>> {
        shapes::get_output_shapes(self)
    }

    /// See [`shapes::get_input_info`].
    pub fn input_info(&self) -> SessionResult<Vec<TensorInfo>> {
        shapes::get_input_info(self)
    }

    /// See [`shapes::get_output_info`].
    pub fn output_info(&self) -> SessionResult<Vec<TensorInfo>> {
        shapes::get_output_info(self)
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("environment", &self.env.name())
            .field("model_source", &self.model_source)
            .field("provider", &self.provider)
            .field("attempts", &self.attempts)
            .field("inputs", &self.input_count())
            .field("outputs", &self.output_count())
            .finish()
    }
}
