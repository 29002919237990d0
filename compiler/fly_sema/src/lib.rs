//! Fly sema — builder façade, symbol tables, and structural validator.
//!
//! `builder` is the parser's single entry point for AST construction
//! (`spec.md §4.1`); `symbols` holds the overload/namespace tables
//! (`spec.md §4.2`, §4.5); `validate` holds pure structural predicates
//! shared by the builder and the resolver (`spec.md §4.3`).
//!
//! This crate does not resolve anything — it builds an unresolved AST and
//! exposes the tables the resolver (`fly_resolve`) fills in and consults.

pub mod builder;
pub mod symbols;
pub mod validate;

pub use builder::Builder;
