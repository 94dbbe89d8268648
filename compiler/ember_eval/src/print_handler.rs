//! Destinations for `echo` output.
//!
//! Each environment holds a `SharedPrintHandler`. Typed prints format
//! here so both backends produce byte-identical output: longs in decimal,
//! doubles through `format_double`, `true` as `1`, `false` as nothing.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

use ember_value::format_double;

/// Where echoed text goes.
pub enum PrintHandler {
    Stdout,
    /// Captured; read back with `output` or `take_output`.
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    pub fn print(&self, text: &str) {
        match self {
            PrintHandler::Stdout => {
                // Echo has no error channel; a closed stdout drops output.
                let _ = std::io::stdout().lock().write_all(text.as_bytes());
            }
            PrintHandler::Buffer(buffer) => buffer.lock().push_str(text),
            PrintHandler::Silent => {}
        }
    }

    pub fn print_long(&self, value: i64) {
        if !matches!(self, PrintHandler::Silent) {
            self.print(&value.to_string());
        }
    }

    pub fn print_double(&self, value: f64) {
        if !matches!(self, PrintHandler::Silent) {
            self.print(&format_double(value));
        }
    }

    pub fn print_bool(&self, value: bool) {
        if value {
            self.print("1");
        }
    }

    /// Captured text; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    /// Captured text, leaving the buffer empty.
    pub fn take_output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, PrintHandler::Buffer(_))
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

/// A handler that captures output, for tests and backend comparison.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
