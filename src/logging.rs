//! Logger setup for the binary and tests

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter: everything at info, this crate at debug when `verbose`.
///
/// Debug output is opponent re-rolls and per-frame notifications, so it is
/// scoped to this crate rather than turned on for every dependency.
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        format!("{},{}={}", LevelFilter::Info, env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    }
}

/// Install the global logger. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(verbose)));
    builder.format_timestamp_millis();
    // Already installed (tests, embedding hosts)
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_scopes_debug_to_crate() {
        assert_eq!(default_filter(false), "INFO");
        assert_eq!(default_filter(true), "INFO,sumo_arena=DEBUG");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
        log::info!("logger still usable");
    }
}
