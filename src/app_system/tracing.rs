use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "storefront=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Later calls are no-ops.
pub fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
