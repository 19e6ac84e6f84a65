use std::path::PathBuf;

use thiserror::Error;
use winit::error::{EventLoopError, OsError};

/// Failures surfaced by [`crate::Host::start`].
///
/// Nothing here is recovered by the host; every variant is meant to reach
/// the process boundary.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("run loop must start on thread {expected}, but start was called on {actual}")]
    WrongThread { expected: String, actual: String },

    #[error("host must be created on the main thread, not {actual}")]
    NotMainThread { actual: String },

    #[error("host has already started its run loop")]
    AlreadyStarted,

    #[error("failed to construct the run loop")]
    Construction(#[source] anyhow::Error),

    #[error("run loop terminated abnormally")]
    Run(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop error")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window")]
    Window(#[from] OsError),

    #[error("failed to initialise graphics")]
    Graphics(#[from] GraphicsError),

    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("engine context has already been run")]
    AlreadyRan,
}

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}
