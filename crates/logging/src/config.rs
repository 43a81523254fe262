//! crates/logging/src/config.rs
//! Verbosity configuration derived from command-line switches.

use tracing::Level;

/// Default log level selected by `-v` repetitions and `--quiet`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerbosityConfig {
    verbose: u8,
    quiet: bool,
}

impl VerbosityConfig {
    /// Creates a configuration from the number of `-v` flags supplied.
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        Self {
            verbose: level,
            quiet: false,
        }
    }

    /// Suppresses everything below `error` regardless of the verbose level.
    #[must_use]
    #[doc(alias = "--quiet")]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Returns the configured verbose level.
    #[must_use]
    pub const fn verbose_level(&self) -> u8 {
        self.verbose
    }

    /// Reports whether quiet mode is active.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Maps the configuration to the most detailed level that is emitted.
    #[must_use]
    pub const fn level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
