//! crates/logging/src/tracing_bridge.rs
//! Subscriber installation for binaries and tests.

use super::config::VerbosityConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an `EnvFilter` directive that overrides the
/// verbosity-derived default.
pub const LOG_ENV_VAR: &str = "SYNCDIR_LOG";

/// Renders the filter directive used when [`LOG_ENV_VAR`] is unset.
///
/// Third-party crates stay at `warn` so `-vvv` does not drown the output in
/// backend chatter; every `syncdir::` target follows the configured level.
#[must_use]
pub fn default_directive(config: VerbosityConfig) -> String {
    let level = config.level().as_str().to_ascii_lowercase();
    let mut directive = if config.is_quiet() {
        String::from("error")
    } else {
        String::from("warn")
    };
    for target in crate::targets::ALL {
        directive.push(',');
        directive.push_str(target);
        directive.push('=');
        directive.push_str(&level);
    }
    directive
}

/// Installs a stderr `fmt` subscriber filtered according to `config`.
///
/// The directive in [`LOG_ENV_VAR`] wins when it is set and parses. Calling
/// this function after a global subscriber is already installed does nothing.
pub fn init_tracing(config: VerbosityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}
