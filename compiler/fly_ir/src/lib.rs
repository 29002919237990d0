//! Fly IR — core data structures for the Fly compiler.
//!
//! This crate holds the AST + symbol model (`spec.md §3`): source spans,
//! interned names, the type and value model, and the declaration /
//! statement / expression node shapes that the builder façade
//! (`fly_sema::builder`) constructs and the resolver (`fly_resolve`) fills
//! in. It has no knowledge of lexing, parsing, or code generation.

pub mod decl;
pub mod expr;
pub mod name;
pub mod refs;
pub mod scope;
pub mod stmt;
pub mod types;
pub mod value;

pub use decl::{
    ClassAttribute, ClassDecl, ClassKind, ClassMethod, Comment, EnumDecl, EnumEntry, Function,
    GlobalVar, Import, LocalVar, MethodKind, Module, Parameter,
};
pub use expr::{BinaryOp, Expr, ExprKind, Fixity, UnaryOp};
pub use name::{Interner, Name};
pub use refs::{CallTarget, Ref, RefTarget, VarTarget};
pub use scope::{Scopes, Visibility};
pub use span::{Span, Spanned};
pub use stmt::{
    AssignOp, Block, HandleStmt, IfArm, IfStmt, LoopInStmt, LoopStmt, Stmt, StmtKind, SwitchCase,
    SwitchStmt,
};
pub use types::{FloatBits, IdentityDef, IdentityKind, IdentityRef, IntBits, MacroCategory, Type};
pub use value::Value;

mod span;
