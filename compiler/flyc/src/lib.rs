//! Fly driver — wires the builder façade, the resolver, and (behind the
//! `llvm` feature) LLVM IR emission into a single `compile` entry point.
//!
//! Lexing and parsing are out of scope (`spec.md §1`): this crate's input
//! is a program already built through `fly_sema::Builder`, the way an
//! external parser would hand it off. `demo` builds one such program
//! directly, standing in for that external parser in the `flyc` binary and
//! in this crate's own tests.

pub mod demo;
pub mod driver;
pub mod options;

pub use driver::{compile, CompiledModule};
pub use options::{CompileOptions, DriverError};
