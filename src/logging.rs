use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `"info"` or `"ridatsu=debug"`). Falls back to `info`
/// when the directive does not parse. Calling it twice is harmless.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
