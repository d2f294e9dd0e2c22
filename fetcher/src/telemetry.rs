//! Log setup for processes embedding the fetcher: the GitLab and Spotify
//! front ends and the test binaries.

use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

use crate::Config;

const FALLBACK_FILTER: &str = "info";

/// Log an error with its whole source chain (anyhow's alternate format).
pub fn log_error(e: impl Into<anyhow::Error>) {
    let e: anyhow::Error = e.into();
    tracing::error!("{e:#}");
}

/// Parse a log filter such as [`Config::log_filter`]. An unparsable filter
/// falls back to `info` rather than silencing everything.
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("ignoring log filter {directives:?}: {e}");
        EnvFilter::new(FALLBACK_FILTER)
    })
}

/// Stderr subscriber filtered by `RUST_LOG` if set, else by
/// [`Config::log_filter`].
pub fn get_subscriber(config: &Config) -> impl Subscriber + Sync + Send {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter(&config.log_filter));
    let stderr = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();
    Registry::default().with(filter).with(stderr)
}

/// Install the subscriber for `config` as the global default, bridging
/// `log` records into it.
///
/// Fails if a global subscriber or logger is already installed.
pub fn init_subscriber(config: &Config) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(get_subscriber(config))?;
    tracing::debug!(filter = %config.log_filter, "logging initialized");
    Ok(())
}
