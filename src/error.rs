//! Error types for particle-nav.
//!
//! Configuration problems are caught before an engine is built. GPU and
//! window errors only come from the reference host in [`crate::host`].

use std::fmt;

/// Errors reported by [`EngineConfig::validate`](crate::EngineConfig::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The particle count must be at least one.
    NoParticles,
    /// The text fraction must lie in `0.0..=1.0`.
    TextFraction(f64),
    /// A spring parameter is negative or not finite.
    Spring(&'static str),
    /// The reference tick rate must be positive.
    TickRate(f32),
    /// The background volume has an empty or inverted range.
    BackgroundRange(&'static str),
    /// The picking tolerance must be positive.
    PickThreshold(f32),
    /// The camera parameters cannot form a projection.
    Camera(&'static str),
    /// A scalar setting is negative or not finite.
    Parameter(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoParticles => write!(f, "Particle count must be greater than zero"),
            ConfigError::TextFraction(v) => {
                write!(f, "Text fraction must be between 0 and 1, got {}", v)
            }
            ConfigError::Spring(name) => {
                write!(f, "Spring parameter `{}` must be finite and non-negative", name)
            }
            ConfigError::TickRate(v) => write!(f, "Tick rate must be positive, got {}", v),
            ConfigError::BackgroundRange(axis) => {
                write!(f, "Background {} range is empty or inverted", axis)
            }
            ConfigError::PickThreshold(v) => {
                write!(f, "Pick threshold must be positive, got {}", v)
            }
            ConfigError::Camera(msg) => write!(f, "Invalid camera: {}", msg),
            ConfigError::Parameter(name) => {
                write!(f, "`{}` must be finite and non-negative", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "Surface has no supported texture format"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the windowed host.
#[derive(Debug)]
pub enum HostError {
    /// The engine configuration was rejected.
    Config(ConfigError),
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Config(e) => write!(f, "Configuration error: {}", e),
            HostError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            HostError::Window(e) => write!(f, "Failed to create window: {}", e),
            HostError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Config(e) => Some(e),
            HostError::EventLoop(e) => Some(e),
            HostError::Window(e) => Some(e),
            HostError::Gpu(e) => Some(e),
        }
    }
}

impl From<ConfigError> for HostError {
    fn from(e: ConfigError) -> Self {
        HostError::Config(e)
    }
}

impl From<winit::error::EventLoopError> for HostError {
    fn from(e: winit::error::EventLoopError) -> Self {
        HostError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for HostError {
    fn from(e: winit::error::OsError) -> Self {
        HostError::Window(e)
    }
}

impl From<GpuError> for HostError {
    fn from(e: GpuError) -> Self {
        HostError::Gpu(e)
    }
}
