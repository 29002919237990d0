//! Declarations (`spec.md §3`).
//!
//! Declarations are held behind `Rc` so that both the owning `Module` (or
//! `ClassDecl`/`Function`) and the symbol tables/`Ref`s that point at them
//! can share ownership without the C++ original's raw non-owning pointers.
//! `spec.md §9`'s "Parent back-pointers → parent indices" note is satisfied
//! by `Block::parent`, which holds a `Weak<Block>` rather than an index —
//! the idiomatic Rust shape for "children borrow from an arena owned
//! upward", since blocks only ever point to an ancestor, never a cycle.

use crate::name::Name;
use crate::scope::Scopes;
use crate::span::{Span, Spanned};
use crate::stmt::Block;
use crate::types::{IdentityRef, Type};
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub struct Comment {
    pub text: Rc<str>,
    pub loc: Span,
}

/// A function/method parameter.
#[derive(Clone)]
pub struct Parameter {
    pub name: Name,
    pub ty: Type,
    pub default: Option<Value>,
    pub loc: Span,
    pub scopes: Scopes,
    /// True only for the synthesized leading `%error*` parameter
    /// (`SPEC_FULL.md §2`, `CreateErrorHandlerParam`). Materializing it as a
    /// real parameter lets lowering treat every parameter uniformly instead
    /// of special-casing index 0 at every call site.
    pub is_error_handler: bool,
}

impl Parameter {
    #[must_use]
    pub fn error_handler(error_name: Name) -> Rc<Parameter> {
        Rc::new(Parameter {
            name: error_name,
            ty: Type::Error,
            default: None,
            loc: Span::DUMMY,
            scopes: Scopes::default(),
            is_error_handler: true,
        })
    }
}

impl Spanned for Parameter {
    fn span(&self) -> Span {
        self.loc
    }
}

/// A local variable declared inside a function/method body.
#[derive(Clone)]
pub struct LocalVar {
    pub name: Name,
    pub ty: Type,
    pub loc: Span,
    pub scopes: Scopes,
}

impl Spanned for LocalVar {
    fn span(&self) -> Span {
        self.loc
    }
}

/// A module-level global variable.
pub struct GlobalVar {
    pub name: Name,
    pub ty: Type,
    pub loc: Span,
    pub scopes: Scopes,
    pub comment: Option<Comment>,
    /// Initializer constant. `None` only transiently during construction —
    /// the builder always fills this with either the user's literal or the
    /// type's synthesized default (`spec.md §4.1` Defaulting).
    pub init: RefCell<Option<Value>>,
}

impl Spanned for GlobalVar {
    fn span(&self) -> Span {
        self.loc
    }
}

/// A free function or a class method/constructor.
pub struct Function {
    pub name: Name,
    pub return_ty: Type,
    pub params: Vec<Rc<Parameter>>,
    pub body: RefCell<Option<Rc<Block>>>,
    pub loc: Span,
    pub scopes: Scopes,
    pub comment: Option<Comment>,
    /// Flat list of every `LocalVar` declared anywhere in the body,
    /// accumulated during pass 2 of resolution. Lowering walks this list to
    /// allocate stack slots (`spec.md §3` invariants, §4.7 Function
    /// prologue).
    pub locals: RefCell<Vec<Rc<LocalVar>>>,
}

impl Function {
    /// Non-receiver parameters (skips the implicit leading `%error*`).
    pub fn user_params(&self) -> impl Iterator<Item = &Rc<Parameter>> {
        self.params.iter().filter(|p| !p.is_error_handler)
    }
}

impl Spanned for Function {
    fn span(&self) -> Span {
        self.loc
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKind {
    Class,
    /// A struct is a class whose vtable slot is omitted; its methods (if
    /// any) are static free functions with no implicit receiver
    /// (`spec.md §4.6`).
    Struct,
}

pub struct ClassAttribute {
    pub name: Name,
    pub ty: Type,
    pub loc: Span,
    pub scopes: Scopes,
    pub default: Option<Value>,
    /// 0-based declaration order among this class's attributes, independent
    /// of the vtable slot (`spec.md §4.6`: `{ vtable*, field0, field1, ... }`).
    /// Codegen adds one when the owning class has a vtable slot to get the
    /// actual struct-field index; a struct's attribute uses this value
    /// directly.
    pub field_index: u32,
}

impl Spanned for ClassAttribute {
    fn span(&self) -> Span {
        self.loc
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodKind {
    Constructor,
    /// Instance method on a class: receives an implicit receiver pointer.
    Instance,
    /// A struct's method: no implicit receiver.
    Static,
}

pub struct ClassMethod {
    pub name: Name,
    pub return_ty: Type,
    pub params: Vec<Rc<Parameter>>,
    pub body: RefCell<Option<Rc<Block>>>,
    pub loc: Span,
    pub scopes: Scopes,
    pub kind: MethodKind,
    pub locals: RefCell<Vec<Rc<LocalVar>>>,
    /// Declaration order, used for vtable slot ordering (`spec.md §4.8`).
    pub vtable_slot: Option<u32>,
}

impl ClassMethod {
    pub fn user_params(&self) -> impl Iterator<Item = &Rc<Parameter>> {
        self.params.iter().filter(|p| !p.is_error_handler)
    }
}

impl Spanned for ClassMethod {
    fn span(&self) -> Span {
        self.loc
    }
}

pub struct ClassDecl {
    pub name: Name,
    pub kind: ClassKind,
    pub loc: Span,
    pub scopes: Scopes,
    pub comment: Option<Comment>,
    /// Superclass chain, outermost-declared first. Only meaningful for
    /// `ClassKind::Class` (`spec.md §4.3`: "nominal...with class-inheritance
    /// walk upward").
    pub supers: Vec<IdentityRef>,
    pub attributes: RefCell<Vec<Rc<ClassAttribute>>>,
    /// All constructors currently registered for this class. An
    /// auto-default constructor lives here until the first user constructor
    /// replaces it (`spec.md §3` invariants, Open Question ii).
    pub constructors: RefCell<Vec<Rc<ClassMethod>>>,
    /// Methods in declaration order — this order is the vtable layout
    /// (`spec.md §4.8`).
    pub methods: RefCell<Vec<Rc<ClassMethod>>>,
}

impl ClassDecl {
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.kind == ClassKind::Struct
    }
}

impl Spanned for ClassDecl {
    fn span(&self) -> Span {
        self.loc
    }
}

/// One entry (`A`, `B`, ...) of an enum, represented as a constant of the
/// enum type obtained by calling the synthesized constructor with its
/// 1-based ordinal (`spec.md §4.6`, Open Question iii).
pub struct EnumEntry {
    pub name: Name,
    pub loc: Span,
    pub scopes: Scopes,
    pub ordinal: u32,
}

impl Spanned for EnumEntry {
    fn span(&self) -> Span {
        self.loc
    }
}

/// An enum: an identity type backed by a single private `uint` field and a
/// private constructor taking that `uint` (`spec.md §4.6`).
pub struct EnumDecl {
    pub name: Name,
    pub loc: Span,
    pub scopes: Scopes,
    pub comment: Option<Comment>,
    pub entries: RefCell<Vec<Rc<EnumEntry>>>,
}

impl Spanned for EnumDecl {
    fn span(&self) -> Span {
        self.loc
    }
}

/// A named import of another module's namespace
/// (`spec.md §6` Import grammar).
pub struct Import {
    pub target_namespace: Name,
    pub alias: Option<Name>,
    pub loc: Span,
    /// Set once the resolver confirms `target_namespace` exists in the
    /// global namespace registry (`spec.md §4.4` pass 1, step 1). The
    /// symbol table itself is looked up by name at each use site rather than
    /// cached here, keeping `fly_ir` free of a dependency on `fly_sema`.
    pub resolved: std::cell::Cell<bool>,
}

impl Spanned for Import {
    fn span(&self) -> Span {
        self.loc
    }
}

/// One source file's top-level container (`spec.md §3`).
pub struct Module {
    /// Monotonically assigned id, used for duplicate-module-name checks
    /// (`spec.md §3`).
    pub id: u32,
    pub name: Name,
    pub namespace: Name,
    pub is_header: bool,
    pub imports: RefCell<Vec<Rc<Import>>>,
    pub globals: RefCell<Vec<Rc<GlobalVar>>>,
    pub functions: RefCell<Vec<Rc<Function>>>,
    pub classes: RefCell<Vec<Rc<ClassDecl>>>,
    pub enums: RefCell<Vec<Rc<EnumDecl>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Interner;

    #[test]
    fn user_params_skips_error_handler() {
        let interner = Interner::new();
        let err_name = interner.intern("$err");
        let a_name = interner.intern("a");
        let params = vec![
            Parameter::error_handler(err_name),
            Rc::new(Parameter {
                name: a_name,
                ty: Type::Bool,
                default: None,
                loc: Span::DUMMY,
                scopes: Scopes::default(),
                is_error_handler: false,
            }),
        ];
        let func = Function {
            name: interner.intern("f"),
            return_ty: Type::Void,
            params,
            body: RefCell::new(None),
            loc: Span::DUMMY,
            scopes: Scopes::default(),
            comment: None,
            locals: RefCell::new(Vec::new()),
        };
        let user: Vec<_> = func.user_params().collect();
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].name, a_name);
    }
}
