use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "framecut=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`, or `framecut=info` when unset.
///
/// Calling this again after a subscriber is installed does nothing.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
