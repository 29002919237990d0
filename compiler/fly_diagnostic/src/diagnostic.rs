//! Core diagnostic types (`spec.md §7`).
//!
//! Rendering/formatting a `Diagnostic` for a terminal or editor is an
//! external collaborator's job (`spec.md §1`: "diagnostic
//! formatting/printing" is out of scope) — this crate only produces the
//! structured value.

use crate::error_code::ErrorCode;
use fly_ir::Span;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Note,
    Warning,
    Error,
    /// Aborts the current module's resolution/lowering; other modules
    /// continue independently (`spec.md §5`).
    Fatal,
}

impl Severity {
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub primary_span: Span,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity,
            code,
            message: message.into(),
            primary_span: span,
        }
    }

    #[must_use]
    pub fn error(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic::new(Severity::Error, code, message, span)
    }

    #[must_use]
    pub fn fatal(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic::new(Severity::Fatal, code, message, span)
    }
}
