use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// `RUST_LOG` can still raise or lower individual modules.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();
}
