use std::cell::Cell;
use std::thread_local;

/// Tunables for change propagation on the current thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How many notifies may nest (a write whose subscriber writes, whose subscriber writes, ...)
    /// before the innermost one fails with [Error::PropagationDepthExceeded](crate::Error::PropagationDepthExceeded).
    pub max_propagation_depth: usize
}

thread_local! {
    static CONFIG: Cell<Config> = Cell::new(Config::default());
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_propagation_depth: 128
        }
    }
}

impl Config {
    /// The configuration in effect on this thread.
    pub fn current() -> Config {
        CONFIG.with(|config| config.get())
    }

    /// Make this the configuration for this thread, returning the one it replaces.
    pub fn install(self) -> Config {
        CONFIG.with(|config| config.replace(self))
    }
}
