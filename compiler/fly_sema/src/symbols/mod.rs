//! Symbol tables (`spec.md §4.2`).

mod namespace;
mod overload;

pub use namespace::{DuplicateGlobal, DuplicateIdentity, GlobalRegistry, NamespaceSymbols};
pub use overload::{DuplicateOverload, Overloadable, OverloadTable};
