//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when it is set. Returns `false` if a logger was
/// already installed, which happens when several tests or hosts race to
/// initialize logging.
pub fn init_with_level(default_filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
