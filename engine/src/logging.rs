//! `env_logger` setup shared by every binary built on the engine.

/// Installs the global logger with `filter` as the default level.
///
/// `RUST_LOG` takes precedence, which also exposes wgpu's own logs.
/// Calling this more than once is harmless.
pub fn init(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}
