//! Structural validator (`spec.md §4.3`).
//!
//! Pure predicate functions used by both the builder (structural checks at
//! construction time) and the resolver (deep checks during pass 2). Kept
//! free of any `DiagnosticQueue` dependency so they're trivially unit
//! testable; callers turn a failed predicate into a diagnostic with the
//! right span and message at the call site.

mod comments;
mod convert;

pub use comments::{comment_matches_signature, count_param_tags, count_return_tags};
pub use convert::{
    both_bool, categories_match_for_arithmetic, categories_match_for_comparison, is_convertible,
    types_equal, wider,
};
