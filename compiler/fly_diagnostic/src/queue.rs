//! Diagnostic queue: the per-module error sink (`spec.md §7`).
//!
//! Non-fatal diagnostics accumulate and never unwind — the current phase
//! continues best-effort so the user sees multiple errors per run. A fatal
//! diagnostic aborts the current module's resolution/lowering; the driver
//! (out of scope here) decides whether to continue with other modules
//! (`spec.md §5`).
//!
//! Diagnostics are never reordered here: they appear in source-location
//! order because the builder and resolver walk the program top-down
//! (`spec.md §5` Ordering guarantees) — the queue just records insertion
//! order.

use crate::diagnostic::{Diagnostic, Severity};
use crate::error_code::ErrorCode;
use crate::guarantee::ErrorGuaranteed;
use fly_ir::Span;

#[derive(Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    fatal: bool,
}

impl DiagnosticQueue {
    #[must_use]
    pub fn new() -> Self {
        DiagnosticQueue::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) -> Option<ErrorGuaranteed> {
        let is_error = matches!(diagnostic.severity, Severity::Error | Severity::Fatal);
        if diagnostic.severity.is_fatal() {
            self.fatal = true;
        }
        self.diagnostics.push(diagnostic);
        is_error.then(ErrorGuaranteed::new)
    }

    pub fn emit_error(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> ErrorGuaranteed {
        self.emit(Diagnostic::error(code, message, span))
            .unwrap_or_else(|| panic!("Severity::Error always mints ErrorGuaranteed"))
    }

    pub fn emit_fatal(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> ErrorGuaranteed {
        self.emit(Diagnostic::fatal(code, message, span))
            .unwrap_or_else(|| panic!("Severity::Fatal always mints ErrorGuaranteed"))
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, Severity::Error | Severity::Fatal))
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_marks_queue_fatal_but_does_not_unwind() {
        let mut queue = DiagnosticQueue::new();
        queue.emit_error(ErrorCode::DUPLICATE_GLOBAL, "dup", Span::DUMMY);
        assert!(!queue.is_fatal());
        queue.emit_fatal(ErrorCode::NAMESPACE_NOT_FOUND, "boom", Span::DUMMY);
        assert!(queue.is_fatal());
        assert_eq!(queue.diagnostics().len(), 2);
    }
}
