//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so they never interleave with the interactive prompts on
//! stdout. `RUST_LOG` wins over the configured level when set.

use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Installs the global subscriber.
///
/// Calling it twice is harmless; the second call leaves the first subscriber
/// in place.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=warn,reqwest=warn", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.is_json_logging() {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
