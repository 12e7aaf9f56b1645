use log::LevelFilter;

/// Initialize the logger with the specified level. `RUST_LOG` still applies
/// to individual modules.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
