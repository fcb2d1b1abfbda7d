//! Logger bootstrap for the binary and for tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialises the global logger.
///
/// `verbose` lowers the default threshold to debug, which is what the
/// telemetry overlay logs at; `RUST_LOG` still overrides the default either
/// way. Safe to call more than once: a second initialisation is ignored so
/// tests can share the process-global logger.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let _ = Builder::from_env(env).try_init();
}
