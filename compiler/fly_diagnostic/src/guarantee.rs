//! Proof that an error was actually emitted.
//!
//! A function that detects a semantic error can return this token instead
//! of silently swallowing the failure, so the type system (not
//! convention) prevents a "forgotten" diagnostic.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Only `DiagnosticQueue::emit_error`/`emit_fatal` may mint one of
    /// these — see `crate::queue`.
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }
}
