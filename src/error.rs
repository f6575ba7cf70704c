//! Error taxonomy for the simulation core.
//!
//! Matches the six classes from the error-handling design: configuration,
//! resource, accelerator, stability, capacity are fatal (or recoverable, in
//! the accelerator's case); unknown keys/components are warnings logged at
//! the call site rather than represented here.

use thiserror::Error;

/// Fatal errors that can occur before or during simulation load.
///
/// The hot per-step loops never construct or propagate this type — it is
/// strictly a load-time / initialization-time error.
#[derive(Debug, Error)]
pub enum MaxwellError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("resource allocation failed: {0}")]
    Resource(String),

    #[error("stability violation: {0}")]
    Stability(String),

    #[error("capacity exceeded: {0}")]
    Capacity(String),
}

impl MaxwellError {
    pub fn config(msg: impl Into<String>) -> Self {
        MaxwellError::Config(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        MaxwellError::Resource(msg.into())
    }

    pub fn stability(msg: impl Into<String>) -> Self {
        MaxwellError::Stability(msg.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        MaxwellError::Capacity(msg.into())
    }
}

/// Non-fatal accelerator failure, raised either during initialization or
/// mid-step. Callers log this and fall back to the CPU backend; it never
/// reaches `main`.
#[derive(Debug, Error)]
pub enum AcceleratorError {
    #[error("platform discovery failed: {0}")]
    PlatformDiscovery(String),

    #[error("device discovery failed: {0}")]
    DeviceDiscovery(String),

    #[error("context creation failed: {0}")]
    ContextCreation(String),

    #[error("queue creation failed: {0}")]
    QueueCreation(String),

    #[error("kernel source load failed: {0}")]
    KernelSourceLoad(String),

    #[error("program build failed: {0}")]
    ProgramBuild(String),

    #[error("kernel object creation failed: {0}")]
    KernelCreation(String),

    #[error("buffer allocation failed: {0}")]
    BufferAllocation(String),

    #[error("stability check failed: {0}")]
    Stability(String),
}

impl AcceleratorError {
    /// Name of the initialization step that failed, for logging.
    pub fn step(&self) -> &'static str {
        match self {
            AcceleratorError::PlatformDiscovery(_) => "platform_discovery",
            AcceleratorError::DeviceDiscovery(_) => "device_discovery",
            AcceleratorError::ContextCreation(_) => "context_creation",
            AcceleratorError::QueueCreation(_) => "queue_creation",
            AcceleratorError::KernelSourceLoad(_) => "kernel_source_load",
            AcceleratorError::ProgramBuild(_) => "program_build",
            AcceleratorError::KernelCreation(_) => "kernel_creation",
            AcceleratorError::BufferAllocation(_) => "buffer_allocation",
            AcceleratorError::Stability(_) => "stability",
        }
    }
}
