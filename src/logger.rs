//! Logging utilities with colored output and pluggable diagnostic sinks.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` / `debug_do!` macros gated by the global verbose flag
//! - [`LogSink`] for routing resolver diagnostics to the embedding application
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("resolve"; "found {} of {} assets", found, total);
//!
//! // Resolver diagnostics go through a sink
//! sink.log(Severity::Error, "missing asset", Some(&err));
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    error::Error,
    fmt,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Execute code only when --verbose is enabled
///
/// Use this to avoid computing expensive debug data when not needed.
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "resolve" => prefix.bright_blue().bold().to_string(),
        "found" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Diagnostic Sinks
// ============================================================================

/// Severity of a resolver diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Module prefix used by the terminal logger.
    pub const fn module(self) -> &'static str {
        match self {
            Self::Info => "resolve",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Destination for resolver diagnostics.
///
/// The resolver never prints directly; it reports `(severity, message, cause)`
/// triples here so embedding applications can route them into their own log.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Sink that writes through the terminal logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl LogSink for TerminalSink {
    fn log(&self, severity: Severity, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => log(severity.module(), &format!("{message}: {cause}")),
            None => log(severity.module(), message),
        }
    }
}

/// A diagnostic captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    /// Rendered cause, if one was attached.
    pub cause: Option<String>,
}

/// Sink that keeps every diagnostic in memory.
///
/// Useful for embedding applications that batch diagnostics, and for tests
/// that assert on exactly what was reported.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Number of records with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn log(&self, severity: Severity, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.records.lock().push(Record {
            severity,
            message: message.to_string(),
            cause: cause.map(ToString::to_string),
        });
    }
}
