//! Logger setup for binaries and UI shells embedding the tracker.

use log::LevelFilter;

/// Install the global `env_logger` logger.
///
/// Defaults to `info`, with the HTTP stack held at `warn`. `RUST_LOG`
/// overrides both. Returns `false` when a logger was already installed.
pub fn init_logging() -> bool {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_env(env_logger::Env::default())
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
