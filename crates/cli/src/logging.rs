use log::LevelFilter;

/// Log level for a `-v` count.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the global logger. `RUST_LOG` overrides the level from `-v`.
pub fn init(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(level_filter(verbosity))
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}
