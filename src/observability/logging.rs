//! tracing-subscriber setup

use tracing_subscriber::EnvFilter;

use super::{ObservabilityError, ObservabilityResult};

/// `RUST_LOG` when set, `default_filter` otherwise
pub fn build_filter(default_filter: &str) -> ObservabilityResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| ObservabilityError::invalid_filter(default_filter, e)),
    }
}

/// Installs the global fmt subscriber writing to stderr
pub fn init_logging(default_filter: &str) -> ObservabilityResult<()> {
    let filter = build_filter(default_filter)?;

    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(ObservabilityError::already_initialized)
}
