// Print a compact, rustc-like diagnostic to stderr.
//
// Lowering reports recoverable per-node failures (an undeclared variable,
// an unknown call target) through this channel and then degrades the
// offending subtree instead of aborting the pass. Fatal conditions
// (module verification, engine construction) travel as `anyhow::Error`
// instead and never go through here.

use std::sync::atomic::{AtomicBool, Ordering};

pub fn report_error(message: &str, note: Option<&str>) {
    // ANSI red for "error"
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    eprintln!("{}error{}: {}", red, reset, message);

    if let Some(note) = note {
        // ANSI blue for note
        let blue = "\x1b[34m";
        eprintln!("{}note{}: {}", blue, reset, note);
    }
}

// Simple Diagnostic container used by lowering to propagate structured
// errors up to a single emission site.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub note: Option<String>,
}

impl Diagnostic {
    pub fn simple(msg: impl Into<String>) -> Self {
        Diagnostic {
            message: msg.into(),
            note: None,
        }
    }

    pub fn with_note(msg: impl Into<String>, note: impl Into<String>) -> Self {
        Diagnostic {
            message: msg.into(),
            note: Some(note.into()),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

// Emit the diagnostic via the lightweight printer.
pub fn emit_diagnostic(d: &Diagnostic) {
    if DIAGNOSTICS_ENABLED.load(Ordering::SeqCst) {
        report_error(&d.message, d.note.as_deref());
    }
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Suppress diagnostic printing for the current scope. Returns a guard that
/// restores the previous enabled state when dropped. Tests can call
/// `let _g = diagnostics::suppress();` to silence stderr output while still
/// allowing callers to inspect the lowered module.
pub fn suppress() -> SuppressGuard {
    let prev = DIAGNOSTICS_ENABLED.swap(false, Ordering::SeqCst);
    SuppressGuard { prev }
}

/// Internal guard type returned by `suppress()`.
pub struct SuppressGuard {
    prev: bool,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        DIAGNOSTICS_ENABLED.store(self.prev, Ordering::SeqCst);
    }
}
