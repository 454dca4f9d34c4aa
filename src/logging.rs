use tracing_subscriber::EnvFilter;

/// Pick the filter directive: `-v` beats the config file.
pub fn directive(config_level: &str, verbose: u8) -> String {
    match verbose {
        0 if config_level.trim().is_empty() => "warn".to_string(),
        0 => config_level.trim().to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Log to stderr so stdout stays clean for --json and --check output.
/// RUST_LOG, when set, wins over everything else.
pub fn init(config_level: &str, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(config_level, verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
