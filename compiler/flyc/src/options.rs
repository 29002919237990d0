//! Driver configuration (`SPEC_FULL.md §1` Ambient stack: Configuration).
//!
//! The real CLI grammar is out of scope (`spec.md §1`): this struct is the
//! small set of knobs a caller — whether `main`'s own argv parsing or an
//! embedding tool — needs to pass through to codegen and diagnostic
//! reporting.

use thiserror::Error;

/// Target and diagnostic knobs threaded from the CLI into the driver.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Intended for the LLVM module's target triple once object emission
    /// (out of scope, `spec.md §1`) is wired in; `None` leaves it at
    /// LLVM's default host triple. Not yet consulted by `fly_codegen`.
    pub target_triple: Option<String>,
    /// Stops emitting further diagnostics for a module once this many have
    /// accumulated, so a badly malformed input can't flood the caller.
    pub max_diagnostics: usize,
    /// Print the textual LLVM IR for each compiled module to stdout in
    /// addition to returning it.
    pub emit_llvm_to_stdout: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            target_triple: None,
            max_diagnostics: 100,
            emit_llvm_to_stdout: false,
        }
    }
}

/// Failures that are not compile diagnostics — malformed driver input,
/// I/O, or an LLVM context that refused to initialize
/// (`SPEC_FULL.md §1` Ambient stack: Errors).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("compilation aborted: {count} fatal diagnostic(s) were reported")]
    FatalDiagnostics { count: usize },
    #[error("failed to write output to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unrecognized option: {0}")]
    BadArgument(String),
}
