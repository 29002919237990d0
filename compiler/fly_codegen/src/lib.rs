//! LLVM IR lowering for Fly (`spec.md §4.7-§4.9`).
//!
//! Two-tier codegen split, the same shape as `ori_llvm`: a thin
//! [`context::Ctx`] wrapping the LLVM context/module/common types, and a
//! [`module::ModuleCompiler`] that drives the four lowering entry points
//! (`gen_global`, `gen_function`, `gen_class`, `gen_enum`) per resolved
//! `fly_ir::Module`. Unlike `ori_llvm`, Fly has no lambdas, generics, or
//! runtime collection types, so there is no `evaluator`/`matching`/
//! `collections` split — one `stmt` + `expr` module covers the whole
//! expression/statement grammar in `spec.md §3`.
//!
//! # Debugging
//! `RUST_LOG=fly_codegen=debug` traces per-function/per-class lowering.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

mod context;
mod declare;
mod error_abi;
mod expr;
mod functions;
mod mangle;
mod objects;
mod stmt;
mod types;

pub mod module;

pub use context::Ctx;
pub use module::ModuleCompiler;

#[cfg(test)]
mod tests;
