//! Provider-specific configuration.
//!
//! Each execution provider contributes one option struct implementing
//! [`ProviderConfigurator`]. [`ProviderOptions`] ties them together as a tagged enum
//! whose variants only exist for providers compiled into this build, so options for an
//! absent provider cannot be constructed at all.
//!
//! # Example
//!
//! ```rust
//! use oar_session::core::providers::{ExecutionProvider, ProviderOptions};
//!
//! let cpu = ProviderOptions::default_for(ExecutionProvider::Cpu).unwrap();
//! assert_eq!(cpu.provider(), ExecutionProvider::Cpu);
//! ```

use super::{ExecutionProvider, is_provider_enabled};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::session::builder::SessionBuilder;
use serde::{Deserialize, Serialize};

/// Configuration builder for a single execution provider.
pub trait ProviderConfigurator {
    /// The provider these options configure.
    const PROVIDER: ExecutionProvider;

    /// Builds the engine-side registration object for this provider.
    fn dispatch(&self) -> ExecutionProviderDispatch;

    /// Applies session-wide settings the provider depends on.
    fn configure_session(&self, builder: SessionBuilder) -> Result<SessionBuilder, ort::Error> {
        Ok(builder)
    }
}

/// CPU execution provider options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuOptions {
    /// Whether to use the arena allocator (default: true).
    pub arena_allocator: bool,
}

impl Default for CpuOptions {
    fn default() -> Self {
        Self {
            arena_allocator: true,
        }
    }
}

impl ProviderConfigurator for CpuOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::Cpu;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        ort::execution_providers::CPUExecutionProvider::default()
            .with_arena_allocator(self.arena_allocator)
            .build()
    }
}

/// CUDA execution provider options.
#[cfg(feature = "cuda")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CudaOptions {
    /// CUDA device ID (default: 0).
    pub device_id: Option<i32>,
}

#[cfg(feature = "cuda")]
impl ProviderConfigurator for CudaOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::Cuda;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        let mut cuda = ort::execution_providers::CUDAExecutionProvider::default();
        if let Some(id) = self.device_id {
            cuda = cuda.with_device_id(id);
        }
        cuda.build()
    }
}

/// TensorRT execution provider options.
#[cfg(feature = "tensorrt")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorRtOptions {
    /// TensorRT device ID (default: 0).
    pub device_id: Option<i32>,
    /// Maximum workspace size in bytes.
    pub max_workspace_size: Option<usize>,
    /// FP16 enable flag.
    pub fp16: Option<bool>,
}

#[cfg(feature = "tensorrt")]
impl ProviderConfigurator for TensorRtOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::TensorRt;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        let mut trt = ort::execution_providers::TensorRTExecutionProvider::default();
        if let Some(id) = self.device_id {
            trt = trt.with_device_id(id);
        }
        if let Some(workspace) = self.max_workspace_size {
            trt = trt.with_max_workspace_size(workspace);
        }
        if let Some(fp16) = self.fp16 {
            trt = trt.with_fp16(fp16);
        }
        trt.build()
    }
}

/// DirectML execution provider options.
///
/// DirectML cannot run with memory patterns or parallel execution enabled, so these
/// options also force both off on the session.
#[cfg(feature = "directml")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMlOptions {
    /// DirectML adapter index (default: 0).
    pub device_id: Option<i32>,
}

#[cfg(feature = "directml")]
impl ProviderConfigurator for DirectMlOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::DirectMl;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        let mut dml = ort::execution_providers::DirectMLExecutionProvider::default();
        if let Some(id) = self.device_id {
            dml = dml.with_device_id(id);
        }
        dml.build()
    }

    fn configure_session(&self, builder: SessionBuilder) -> Result<SessionBuilder, ort::Error> {
        builder
            .with_memory_pattern(false)?
            .with_parallel_execution(false)
    }
}

/// Returns the default DirectML options (adapter 0).
#[cfg(feature = "directml")]
pub fn default_directml_options() -> DirectMlOptions {
    DirectMlOptions::default()
}

/// CoreML execution provider options.
#[cfg(feature = "coreml")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMlOptions {
    /// Enable CoreML on subgraphs (control flow operators).
    pub subgraphs: Option<bool>,
}

#[cfg(feature = "coreml")]
impl ProviderConfigurator for CoreMlOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::CoreMl;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        let mut coreml = ort::execution_providers::CoreMLExecutionProvider::default();
        if let Some(sub) = self.subgraphs {
            coreml = coreml.with_subgraphs(sub);
        }
        coreml.build()
    }
}

/// OpenVINO execution provider options.
#[cfg(feature = "openvino")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenVinoOptions {
    /// Device type (e.g., "CPU", "GPU", "NPU").
    pub device_type: Option<String>,
}

#[cfg(feature = "openvino")]
impl ProviderConfigurator for OpenVinoOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::OpenVino;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        let mut openvino = ort::execution_providers::OpenVINOExecutionProvider::default();
        if let Some(device) = &self.device_type {
            openvino = openvino.with_device_type(device.clone());
        }
        openvino.build()
    }
}

/// WebGPU execution provider options (none).
#[cfg(feature = "webgpu")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebGpuOptions;

#[cfg(feature = "webgpu")]
impl ProviderConfigurator for WebGpuOptions {
    const PROVIDER: ExecutionProvider = ExecutionProvider::WebGpu;

    fn dispatch(&self) -> ExecutionProviderDispatch {
        ort::execution_providers::WebGPUExecutionProvider::default().build()
    }
}

/// Options for one execution provider.
///
/// Only variants for compiled-in providers exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOptions {
    /// Built-in CPU provider.
    Cpu(CpuOptions),
    /// NVIDIA CUDA.
    #[cfg(feature = "cuda")]
    Cuda(CudaOptions),
    /// NVIDIA TensorRT.
    #[cfg(feature = "tensorrt")]
    TensorRt(TensorRtOptions),
    /// DirectML on Windows.
    #[cfg(feature = "directml")]
    DirectMl(DirectMlOptions),
    /// Apple CoreML.
    #[cfg(feature = "coreml")]
    CoreMl(CoreMlOptions),
    /// Intel OpenVINO.
    #[cfg(feature = "openvino")]
    OpenVino(OpenVinoOptions),
    /// WebGPU.
    #[cfg(feature = "webgpu")]
    WebGpu(WebGpuOptions),
}

impl ProviderOptions {
    /// Looks up the default options for `provider`.
    ///
    /// Returns `None` when the provider is not compiled into this build.
    pub fn default_for(provider: ExecutionProvider) -> Option<Self> {
        if !is_provider_enabled(provider) {
            return None;
        }
        match provider {
            ExecutionProvider::Cpu => Some(Self::Cpu(CpuOptions::default())),
            #[cfg(feature = "cuda")]
            ExecutionProvider::Cuda => Some(Self::Cuda(CudaOptions::default())),
            #[cfg(feature = "tensorrt")]
            ExecutionProvider::TensorRt => Some(Self::TensorRt(TensorRtOptions::default())),
            #[cfg(feature = "directml")]
            ExecutionProvider::DirectMl => Some(Self::DirectMl(default_directml_options())),
            #[cfg(feature = "coreml")]
            ExecutionProvider::CoreMl => Some(Self::CoreMl(CoreMlOptions::default())),
            #[cfg(feature = "openvino")]
            ExecutionProvider::OpenVino => Some(Self::OpenVino(OpenVinoOptions::default())),
            #[cfg(feature = "webgpu")]
            ExecutionProvider::WebGpu => Some(Self::WebGpu(WebGpuOptions)),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// The provider these options configure.
    pub fn provider(&self) -> ExecutionProvider {
        match self {
            Self::Cpu(_) => CpuOptions::PROVIDER,
            #[cfg(feature = "cuda")]
            Self::Cuda(_) => CudaOptions::PROVIDER,
            #[cfg(feature = "tensorrt")]
            Self::TensorRt(_) => TensorRtOptions::PROVIDER,
            #[cfg(feature = "directml")]
            Self::DirectMl(_) => DirectMlOptions::PROVIDER,
            #[cfg(feature = "coreml")]
            Self::CoreMl(_) => CoreMlOptions::PROVIDER,
            #[cfg(feature = "openvino")]
            Self::OpenVino(_) => OpenVinoOptions::PROVIDER,
            #[cfg(feature = "webgpu")]
            Self::WebGpu(_) => WebGpuOptions::PROVIDER,
        }
    }

    /// Builds the engine-side registration object.
    pub fn dispatch(&self) -> ExecutionProviderDispatch {
        match self {
            Self::Cpu(o) => o.dispatch(),
            #[cfg(feature = "cuda")]
            Self::Cuda(o) => o.dispatch(),
            #[cfg(feature = "tensorrt")]
            Self::TensorRt(o) => o.dispatch(),
            #[cfg(feature = "directml")]
            Self::DirectMl(o) => o.dispatch(),
            #[cfg(feature = "coreml")]
            Self::CoreMl(o) => o.dispatch(),
            #[cfg(feature = "openvino")]
            Self::OpenVino(o) => o.dispatch(),
            #[cfg(feature = "webgpu")]
            Self::WebGpu(o) => o.dispatch(),
        }
    }

    /// Applies the provider's session-wide settings.
    pub fn configure_session(&self, builder: SessionBuilder) -> Result<SessionBuilder, ort::Error> {
        match self {
            Self::Cpu(o) => o.configure_session(builder),
            #[cfg(feature = "cuda")]
            Self::Cuda(o) => o.configure_session(builder),
            #[cfg(feature = "tensorrt")]
            Self::TensorRt(o) => o.configure_session(builder),
            #[cfg(feature = "directml")]
            Self::DirectMl(o) => o.configure_session(builder),
            #[cfg(feature = "coreml")]
            Self::CoreMl(o) => o.configure_session(builder),
            #[cfg(feature = "openvino")]
            Self::OpenVino(o) => o.configure_session(builder),
            #[cfg(feature = "webgpu")]
            Self::WebGpu(o) => o.configure_session(builder),
        }
    }
}

impl From<CpuOptions> for ProviderOptions {
    fn from(options: CpuOptions) -> Self {
        Self::Cpu(options)
    }
}

#[cfg(feature = "directml")]
impl From<DirectMlOptions> for ProviderOptions {
    fn from(options: DirectMlOptions) -> Self {
        Self::DirectMl(options)
    }
}

#[cfg(feature = "cuda")]
impl From<CudaOptions> for ProviderOptions {
    fn from(options: CudaOptions) -> Self {
        Self::Cuda(options)
    }
}

#[cfg(feature = "tensorrt")]
impl From<TensorRtOptions> for ProviderOptions {
    fn from(options: TensorRtOptions) -> Self {
        Self::TensorRt(options)
    }
}

#[cfg(feature = "coreml")]
impl From<CoreMlOptions> for ProviderOptions {
    fn from(options: CoreMlOptions) -> Self {
        Self::CoreMl(options)
    }
}

#[cfg(feature = "openvino")]
impl From<OpenVinoOptions> for ProviderOptions {
    fn from(options: OpenVinoOptions) -> Self {
        Self::OpenVino(options)
    }
}

#[cfg(feature = "webgpu")]
impl From<WebGpuOptions> for ProviderOptions {
    fn from(options: WebGpuOptions) -> Self {
        Self::WebGpu(options)
    }
}
