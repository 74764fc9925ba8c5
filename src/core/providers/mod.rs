//! Execution provider discovery.
//!
//! Provider availability has two independent gates:
//!
//! - whether the integration for a backend was compiled into this binary, answered by
//!   [`is_provider_enabled`] at compile time;
//! - whether ONNX Runtime managed to register that backend on the running host, answered
//!   by [`get_execution_providers`] and [`ExecutionProvider::is_available`].
//!
//! A provider can be compiled in and still be missing at runtime (no driver, missing DLL).
//!
//! | Provider | Feature Flag |
//! |----------|--------------|
//! | CPU | (always) |
//! | CUDA | `cuda` |
//! | TensorRT | `tensorrt` |
//! | DirectML | `directml` |
//! | CoreML | `coreml` |
//! | OpenVINO | `openvino` |
//! | WebGPU | `webgpu` |

pub mod options;

pub use options::*;

use crate::core::environment::ensure_initialized;
use crate::core::errors::SessionResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a hardware or software backend that can run model kernels.
///
/// Every provider is nameable regardless of the build, so lists of providers can be
/// read from configuration files. Whether a provider can actually be configured is
/// decided by [`is_provider_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    /// CPU execution, always available.
    Cpu,
    /// NVIDIA CUDA.
    Cuda,
    /// NVIDIA TensorRT.
    TensorRt,
    /// DirectML (Windows).
    DirectMl,
    /// CoreML (macOS/iOS).
    CoreMl,
    /// Intel OpenVINO.
    OpenVino,
    /// WebGPU.
    WebGpu,
}

impl ExecutionProvider {
    /// All providers in default priority order (most preferred first, CPU last).
    pub const PREFERENCE_ORDER: [ExecutionProvider; 7] = [
        ExecutionProvider::TensorRt,
        ExecutionProvider::Cuda,
        ExecutionProvider::DirectMl,
        ExecutionProvider::CoreMl,
        ExecutionProvider::OpenVino,
        ExecutionProvider::WebGpu,
        ExecutionProvider::Cpu,
    ];

    /// Returns the short name of this provider.
    pub const fn name(self) -> &'static str {
        match self {
            ExecutionProvider::Cpu => "cpu",
            ExecutionProvider::Cuda => "cuda",
            ExecutionProvider::TensorRt => "tensorrt",
            ExecutionProvider::DirectMl => "directml",
            ExecutionProvider::CoreMl => "coreml",
            ExecutionProvider::OpenVino => "openvino",
            ExecutionProvider::WebGpu => "webgpu",
        }
    }

    /// Returns whether the integration for this provider was compiled in.
    pub const fn is_enabled(self) -> bool {
        is_provider_enabled(self)
    }

    /// Asks ONNX Runtime whether this provider is registered on the current host.
    ///
    /// Providers that are not compiled in report `false` without touching the engine.
    pub fn is_available(self) -> SessionResult<bool> {
        if self == ExecutionProvider::Cpu {
            return Ok(true);
        }
        if !is_provider_enabled(self) {
            return Ok(false);
        }
        Ok(engine_reports_available(self)?)
    }
}

impl fmt::Display for ExecutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionProvider {
    type Err = crate::core::errors::SessionError;

    /// Parses a provider name.
    ///
    /// Accepts: "cpu", "cuda", "tensorrt"/"trt", "directml"/"dml", "coreml",
    /// "openvino", "webgpu" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(ExecutionProvider::Cpu),
            "cuda" => Ok(ExecutionProvider::Cuda),
            "tensorrt" | "trt" => Ok(ExecutionProvider::TensorRt),
            "directml" | "dml" => Ok(ExecutionProvider::DirectMl),
            "coreml" => Ok(ExecutionProvider::CoreMl),
            "openvino" => Ok(ExecutionProvider::OpenVino),
            "webgpu" => Ok(ExecutionProvider::WebGpu),
            other => Err(crate::core::errors::SessionError::config_error(format!(
                "unknown execution provider '{}'",
                other
            ))),
        }
    }
}

/// Returns whether the integration code for `provider` was compiled into this binary.
///
/// This is fixed at build time and usable in constant contexts:
///
/// ```rust
/// use oar_session::core::providers::{ExecutionProvider, is_provider_enabled};
///
/// const _: () = assert!(is_provider_enabled(ExecutionProvider::Cpu));
/// ```
pub const fn is_provider_enabled(provider: ExecutionProvider) -> bool {
    match provider {
        ExecutionProvider::Cpu => true,
        ExecutionProvider::Cuda => cfg!(feature = "cuda"),
        ExecutionProvider::TensorRt => cfg!(feature = "tensorrt"),
        ExecutionProvider::DirectMl => cfg!(feature = "directml"),
        ExecutionProvider::CoreMl => cfg!(feature = "coreml"),
        ExecutionProvider::OpenVino => cfg!(feature = "openvino"),
        ExecutionProvider::WebGpu => cfg!(feature = "webgpu"),
    }
}

/// Returns every compiled-in provider in default priority order, CPU last.
pub fn default_execution_providers() -> Vec<ExecutionProvider> {
    ExecutionProvider::PREFERENCE_ORDER
        .into_iter()
        .filter(|provider| is_provider_enabled(*provider))
        .collect()
}

/// Returns the providers ONNX Runtime has registered on this host.
///
/// Only compiled-in providers are checked. CPU is always part of the result, which
/// follows [`ExecutionProvider::PREFERENCE_ORDER`].
///
/// # Errors
///
/// Fails with [`SessionError::NotInitialized`](crate::core::errors::SessionError::NotInitialized)
/// when [`init_ort_api`](crate::core::environment::init_ort_api) has not been called.
pub fn get_execution_providers() -> SessionResult<Vec<ExecutionProvider>> {
    ensure_initialized("get_execution_providers")?;

    let mut available = Vec::new();
    for provider in default_execution_providers() {
        match provider.is_available() {
            Ok(true) => available.push(provider),
            Ok(false) => {
                tracing::debug!(%provider, "execution provider compiled in but not registered");
            }
            Err(e) => {
                tracing::warn!(%provider, error = %e, "failed to query execution provider");
            }
        }
    }

    if !available.contains(&ExecutionProvider::Cpu) {
        available.push(ExecutionProvider::Cpu);
    }
    Ok(available)
}

/// Queries the engine for a compiled-in, non-CPU provider.
fn engine_reports_available(provider: ExecutionProvider) -> Result<bool, ort::Error> {
    #[allow(unused_imports)]
    use ort::execution_providers::ExecutionProvider as _;

    match provider {
        ExecutionProvider::Cpu => Ok(true),
        #[cfg(feature = "cuda")]
        ExecutionProvider::Cuda => {
            ort::execution_providers::CUDAExecutionProvider::default().is_available()
        }
        #[cfg(feature = "tensorrt")]
        ExecutionProvider::TensorRt => {
            ort::execution_providers::TensorRTExecutionProvider::default().is_available()
        }
        #[cfg(feature = "directml")]
        ExecutionProvider::DirectMl => {
            ort::execution_providers::DirectMLExecutionProvider::default().is_available()
        }
        #[cfg(feature = "coreml")]
        ExecutionProvider::CoreMl => {
            ort::execution_providers::CoreMLExecutionProvider::default().is_available()
        }
        #[cfg(feature = "openvino")]
        ExecutionProvider::OpenVino => {
            ort::execution_providers::OpenVINOExecutionProvider::default().is_available()
        }
        #[cfg(feature = "webgpu")]
        ExecutionProvider::WebGpu => {
            ort::execution_providers::WebGPUExecutionProvider::default().is_available()
        }
        #[allow(unreachable_patterns)]
        _ => Ok(false),
    }
}
