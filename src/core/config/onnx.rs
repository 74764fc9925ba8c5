//! ONNX Runtime session configuration.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::providers::{ExecutionProvider, default_execution_providers};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How aggressively the engine rewrites the graph before the first run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphOptimization {
    /// No graph rewrites.
    DisableAll,
    /// Constant folding and redundant node elimination.
    #[default]
    Level1,
    /// Adds node fusions.
    Level2,
    /// Adds layout optimizations.
    Level3,
    /// Same as `Level3`.
    All,
}

/// Severity threshold for messages emitted by the engine itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionLogLevel {
    /// Everything, including per-node traces.
    Verbose,
    /// Informational messages and above.
    Info,
    /// Warnings and above.
    Warning,
    /// Errors and above.
    #[default]
    Error,
    /// Only fatal errors.
    Fatal,
}

/// Per-session engine settings.
///
/// Every field is optional; `None` leaves the engine default in place. An
/// [`Environment`](crate::core::environment::Environment) carries one of these as the
/// starting point for every session built against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Threads inside a single operator
    pub intra_threads: Option<usize>,
    /// Threads running independent operators concurrently
    pub inter_threads: Option<usize>,
    /// Run independent branches of the graph in parallel
    pub parallel_execution: Option<bool>,
    /// Graph optimization level
    pub optimization_level: Option<GraphOptimization>,
    /// Pre-plan allocations from the first run's memory pattern
    pub enable_mem_pattern: Option<bool>,
    /// Engine log severity
    pub log_level: Option<SessionLogLevel>,
    /// Providers to try, most preferred first
    pub execution_providers: Option<Vec<ExecutionProvider>>,
    /// Whether CPU is tried after every requested provider fails
    pub fallback_to_cpu: Option<bool>,
}

impl SessionConfig {
    /// Creates a new SessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Sets the per-operator thread count.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the thread count for running operators side by side.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Toggles parallel execution of independent graph branches.
    pub fn with_parallel_execution(mut self, enabled: bool) -> Self {
        self.parallel_execution = Some(enabled);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: GraphOptimization) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Toggles memory pattern planning.
    pub fn with_memory_pattern(mut self, enabled: bool) -> Self {
        self.enable_mem_pattern = Some(enabled);
        self
    }

    /// Sets the engine log severity.
    pub fn with_log_level(mut self, level: SessionLogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Replaces the provider list, most preferred first.
    pub fn with_execution_providers(mut self, providers: Vec<ExecutionProvider>) -> Self {
        self.execution_providers = Some(providers);
        self
    }

    /// Adds a single execution provider after any already configured.
    pub fn add_execution_provider(mut self, provider: ExecutionProvider) -> Self {
        self.execution_providers
            .get_or_insert_with(Vec::new)
            .push(provider);
        self
    }

    /// Enables or disables the trailing CPU attempt.
    pub fn with_fallback_to_cpu(mut self, enabled: bool) -> Self {
        self.fallback_to_cpu = Some(enabled);
        self
    }

    /// Gets the execution providers, falling back to every compiled-in provider.
    pub fn get_execution_providers(&self) -> Vec<ExecutionProvider> {
        self.execution_providers
            .clone()
            .unwrap_or_else(default_execution_providers)
    }

    /// Gets the engine log severity, `Error` when unset.
    pub fn get_log_level(&self) -> SessionLogLevel {
        self.log_level.unwrap_or_default()
    }

    /// Whether CPU is appended as a last resort, `true` when unset.
    pub fn fallback_to_cpu(&self) -> bool {
        self.fallback_to_cpu.unwrap_or(true)
    }
}

impl ConfigValidator for SessionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_thread_count("intra_threads", self.intra_threads)?;
        self.validate_thread_count("inter_threads", self.inter_threads)?;

        if matches!(&self.execution_providers, Some(providers) if providers.is_empty()) {
            return Err(ConfigError::InvalidConfig {
                message: "execution_providers must not be empty when set".to_string(),
            });
        }
        Ok(())
    }
}
