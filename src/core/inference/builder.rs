//! Session construction with ordered execution provider selection.
//!
//! A [`SessionBuilder`] turns a resolved model file or an in-memory model into a
//! [`Session`]. Requested providers are tried one at a time, in order, each on a fresh
//! engine builder and registered with `error_on_failure`, so the engine never swaps in
//! another backend behind the caller's back. Every candidate's fate is recorded on the
//! session ([`Session::provider_attempts`]).

use super::session::{ModelSource, ProviderAttempt, ProviderOutcome, Session};
use crate::core::config::{ConfigValidator, GraphOptimization, SessionConfig, SessionLogLevel};
use crate::core::environment::Environment;
use crate::core::errors::{SessionError, SessionResult};
use crate::core::providers::{ExecutionProvider, ProviderOptions, is_provider_enabled};
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder as OrtSessionBuilder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Identifier handed to the resolver when neither a model name nor a usable root
/// directory name is available.
pub const DEFAULT_MODEL_IDENTIFIER: &str = "model";

/// Builds [`Session`]s against one [`Environment`].
///
/// Starts from the environment's session configuration; setters override it for this
/// builder only.
///
/// ```rust,no_run
/// use oar_session::prelude::*;
///
/// # fn main() -> Result<(), SessionError> {
/// init_ort_api()?;
/// let env = create_environment("docs")?;
/// let session = SessionBuilder::new(&env)
///     .with_model_name("mnist")
///     .with_execution_providers(vec![ExecutionProvider::Cuda, ExecutionProvider::Cpu])
///     .build_from_file("models", |id: &str| format!("{id}.onnx"))?;
/// println!("running on {}", session.execution_provider());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder<'env> {
    env: &'env Environment,
    config: SessionConfig,
    provider_options: Vec<ProviderOptions>,
    model_name: Option<String>,
}

impl<'env> SessionBuilder<'env> {
    /// Creates a builder seeded with the environment's session configuration.
    pub fn new(env: &'env Environment) -> Self {
        Self {
            env,
            config: env.session_config().clone(),
            provider_options: Vec::new(),
            model_name: None,
        }
    }

    /// Replaces the session configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the providers to try, most preferred first.
    pub fn with_execution_providers(mut self, providers: Vec<ExecutionProvider>) -> Self {
        self.config.execution_providers = Some(providers);
        self
    }

    /// Overrides the default options for one provider.
    ///
    /// A later call for the same provider replaces the earlier one.
    pub fn with_provider_options(mut self, options: impl Into<ProviderOptions>) -> Self {
        let options = options.into();
        self.provider_options
            .retain(|existing| existing.provider() != options.provider());
        self.provider_options.push(options);
        self
    }

    /// Sets the logical model identifier passed to the resolver.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Whether CPU is tried after every requested provider has failed.
    pub fn with_cpu_fallback(mut self, enabled: bool) -> Self {
        self.config.fallback_to_cpu = Some(enabled);
        self
    }

    /// Resolves a model file and builds a session from it.
    ///
    /// `resolver` is called exactly once with the model identifier: the configured
    /// model name, else the last component of `root`, else `"model"`. A relative
    /// result is taken relative to `root`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Resolution`] if the resolver returns an empty path or one that
    ///   is not an existing file. The engine is not touched in that case.
    /// - [`SessionError::Io`] if the resolved path exists but cannot be inspected.
    /// - [`SessionError::ProviderUnavailable`] if CPU fallback is off and none of the
    ///   requested providers is compiled in.
    /// - [`SessionError::ModelLoad`] if every candidate provider rejects the model.
    pub fn build_from_file<F, P>(
        self,
        root: impl AsRef<Path>,
        resolver: F,
    ) -> SessionResult<Session<'env>>
    where
        F: FnOnce(&str) -> P,
        P: Into<PathBuf>,
    {
        let root = root.as_ref();
        let identifier = self.model_identifier(root);
        let resolved: PathBuf = resolver(&identifier).into();

        if resolved.as_os_str().is_empty() {
            return Err(SessionError::resolution(
                identifier,
                &resolved,
                "resolver returned an empty path",
            ));
        }
        let path = if resolved.is_relative() {
            root.join(&resolved)
        } else {
            resolved
        };
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                return Err(SessionError::resolution(
                    identifier,
                    &path,
                    "resolved path is not a file",
                ));
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Err(SessionError::resolution(
                    identifier,
                    &path,
                    "no model file at the resolved path",
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            environment = self.env.name(),
            model = %identifier,
            path = %path.display(),
            "resolved model file"
        );
        self.build(ModelSource::File(path.clone()), |builder| {
            builder.commit_from_file(&path)
        })
    }

    /// Builds a session from a serialized model held in memory.
    ///
    /// # Errors
    ///
    /// [`SessionError::ModelLoad`] for an empty buffer (before any engine call) or when
    /// every candidate provider rejects the model; otherwise as
    /// [`build_from_file`](Self::build_from_file).
    pub fn build_from_memory(self, model_bytes: &[u8]) -> SessionResult<Session<'env>> {
        let source = ModelSource::Memory {
            len: model_bytes.len(),
        };
        if model_bytes.is_empty() {
            return Err(SessionError::model_load_error(
                source.to_string(),
                "model buffer is empty",
                None,
                None::<std::io::Error>,
            ));
        }
        self.build(source, |builder| builder.commit_from_memory(model_bytes))
    }

    fn model_identifier(&self, root: &Path) -> String {
        self.model_name
            .clone()
            .or_else(|| {
                root.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_MODEL_IDENTIFIER.to_string())
    }

    /// Orders candidates: requested providers deduplicated, then CPU if fallback is on.
    fn plan(&self) -> (Vec<ProviderOptions>, Vec<ProviderAttempt>) {
        let mut seen = Vec::new();
        let mut candidates = Vec::new();
        let mut skipped = Vec::new();

        let requested = self.config.get_execution_providers();
        let fallback = self.config.fallback_to_cpu();
        let cpu_tail = fallback.then_some(ExecutionProvider::Cpu);

        for provider in requested.into_iter().chain(cpu_tail) {
            if seen.contains(&provider) {
                continue;
            }
            seen.push(provider);

            if !is_provider_enabled(provider) {
                tracing::debug!(
                    %provider,
                    "skipping execution provider not compiled into this build"
                );
                skipped.push(ProviderAttempt {
                    provider,
                    outcome: ProviderOutcome::NotCompiled,
                });
                continue;
            }
            let options = self
                .provider_options
                .iter()
                .find(|options| options.provider() == provider)
                .cloned()
                .or_else(|| ProviderOptions::default_for(provider));
            match options {
                Some(options) => candidates.push(options),
                None => skipped.push(ProviderAttempt {
                    provider,
                    outcome: ProviderOutcome::NotCompiled,
                }),
            }
        }
        (candidates, skipped)
    }

    fn build<F>(self, source: ModelSource, commit: F) -> SessionResult<Session<'env>>
    where
        F: Fn(OrtSessionBuilder) -> Result<ort::session::Session, ort::Error>,
    {
        self.config.validate()?;

        let (candidates, mut attempts) = self.plan();
        if candidates.is_empty() {
            let provider = attempts
                .first()
                .map(|attempt| attempt.provider)
                .unwrap_or(ExecutionProvider::Cpu);
            return Err(SessionError::provider_unavailable(
                provider,
                "not compiled into this build and CPU fallback is disabled",
            ));
        }

        let mut last_error = None;
        for options in candidates {
            let provider = options.provider();
            let result = self.engine_builder(&options).and_then(&commit);
            match result {
                Ok(inner) => {
                    attempts.push(ProviderAttempt {
                        provider,
                        outcome: ProviderOutcome::Selected,
                    });
                    tracing::info!(
                        environment = self.env.name(),
                        model = %source,
                        %provider,
                        inputs = inner.inputs.len(),
                        outputs = inner.outputs.len(),
                        "created inference session"
                    );
                    return Ok(Session::new(inner, self.env, provider, attempts, source));
                }
                Err(e) => {
                    tracing::warn!(
                        environment = self.env.name(),
                        model = %source,
                        %provider,
                        error = %e,
                        "execution provider rejected the model"
                    );
                    attempts.push(ProviderAttempt {
                        provider,
                        outcome: ProviderOutcome::Rejected(e.to_string()),
                    });
                    last_error = Some(e);
                }
            }
        }

        let summary = attempts
            .iter()
            .map(|attempt| attempt.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(SessionError::model_load_error(
            source.to_string(),
            format!("no execution provider could load the model ({})", summary),
            Some("verify the model file and the execution provider configuration"),
            last_error,
        ))
    }

    /// A fresh engine builder carrying the session config, the environment name as its
    /// log id and exactly one provider.
    fn engine_builder(&self, options: &ProviderOptions) -> Result<OrtSessionBuilder, ort::Error> {
        let builder = apply_session_config(ort::session::Session::builder()?, &self.config)?
            .with_log_id(self.env.name())?;
        let builder = options.configure_session(builder)?;
        builder.with_execution_providers([options.dispatch().error_on_failure()])
    }
}

fn apply_session_config(
    mut builder: OrtSessionBuilder,
    cfg: &SessionConfig,
) -> Result<OrtSessionBuilder, ort::Error> {
    if let Some(intra) = cfg.intra_threads {
        builder = builder.with_intra_threads(intra)?;
    }
    if let Some(inter) = cfg.inter_threads {
        builder = builder.with_inter_threads(inter)?;
    }
    if let Some(par) = cfg.parallel_execution {
        builder = builder.with_parallel_execution(par)?;
    }
    if let Some(level) = cfg.optimization_level {
        let mapped = match level {
            GraphOptimization::DisableAll => GraphOptimizationLevel::Disable,
            GraphOptimization::Level1 => GraphOptimizationLevel::Level1,
            GraphOptimization::Level2 => GraphOptimizationLevel::Level2,
            GraphOptimization::Level3 | GraphOptimization::All => GraphOptimizationLevel::Level3,
        };
        builder = builder.with_optimization_level(mapped)?;
    }
    if let Some(enabled) = cfg.enable_mem_pattern {
        builder = builder.with_memory_pattern(enabled)?;
    }
    let level = match cfg.get_log_level() {
        SessionLogLevel::Verbose => LogLevel::Verbose,
        SessionLogLevel::Info => LogLevel::Info,
        SessionLogLevel::Warning => LogLevel::Warning,
        SessionLogLevel::Error => LogLevel::Error,
        SessionLogLevel::Fatal => LogLevel::Fatal,
    };
    builder.with_log_level(level)
}

/// Builds a session from a resolved model file using the environment's defaults.
///
/// Shorthand for `SessionBuilder::new(env).build_from_file(root, resolver)`.
pub fn make_session_from_file<'env, F, P>(
    root: impl AsRef<Path>,
    env: &'env Environment,
    resolver: F,
) -> SessionResult<Session<'env>>
where
    F: FnOnce(&str) -> P,
    P: Into<PathBuf>,
{
    SessionBuilder::new(env).build_from_file(root, resolver)
}

/// Builds a session from in-memory model bytes using the environment's defaults.
pub fn make_session_from_memory<'env>(
    env: &'env Environment,
    model_bytes: &[u8],
) -> SessionResult<Session<'env>> {
    SessionBuilder::new(env).build_from_memory(model_bytes)
}
