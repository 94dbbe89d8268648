//! Program configuration.

use ember_analyze::ScopeMode;
use ember_eval::{buffer_handler, silent_handler, stdout_handler, SharedPrintHandler};

/// Where `echo` output of environments created by a program goes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Captured per environment; read back with `Environment::output`.
    Buffer,
    Silent,
}

impl OutputMode {
    /// A fresh handler for one environment.
    pub fn handler(self) -> SharedPrintHandler {
        match self {
            OutputMode::Stdout => stdout_handler(),
            OutputMode::Buffer => buffer_handler(),
            OutputMode::Silent => silent_handler(),
        }
    }
}

/// Settings fixed when a program is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// How names not assigned yet are treated by the analysis.
    pub scope: ScopeMode,
    pub output: OutputMode,
    /// Name of the function `Program::compile` emits.
    pub unit_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scope: ScopeMode::Script,
            output: OutputMode::Stdout,
            unit_name: "run".to_owned(),
        }
    }
}
