//! References (`spec.md §3` References).
//!
//! A `Ref` is a dotted identifier, optionally namespace-qualified, that
//! starts out as bare text+location and is tagged by the resolver with
//! exactly what it names. `spec.md §3` invariants: "A `Ref` is never
//! partially resolved: after resolution it has exactly one `def`."

use crate::decl::{ClassAttribute, ClassMethod, EnumEntry, Function, GlobalVar, LocalVar, Parameter};
use crate::name::Name;
use crate::span::{Span, Spanned};
use crate::types::IdentityDef;
use std::cell::RefCell;
use std::rc::Rc;

/// What a variable `Ref` binds to.
#[derive(Clone)]
pub enum VarTarget {
    Local(Rc<LocalVar>),
    Param(Rc<Parameter>),
    Global(Rc<GlobalVar>),
    ClassAttribute(Rc<ClassAttribute>),
    EnumEntry(Rc<EnumEntry>),
}

/// What a call `Ref` binds to.
#[derive(Clone)]
pub enum CallTarget {
    Function(Rc<Function>),
    Method(Rc<ClassMethod>),
}

/// The tag a `Ref` carries once resolved (`spec.md §3`).
#[derive(Clone)]
pub enum RefTarget {
    Var(VarTarget),
    Call(CallTarget),
    Type(IdentityDef),
}

/// A dotted identifier, optionally chained off a `parent` (receiver or
/// namespace prefix) — `a.b.c` is represented as `Ref{c, parent: Ref{b,
/// parent: Ref{a}}}`.
pub struct Ref {
    pub name: Name,
    pub loc: Span,
    pub parent: Option<Box<Ref>>,
    def: RefCell<Option<RefTarget>>,
}

impl Ref {
    #[must_use]
    pub fn new(name: Name, loc: Span, parent: Option<Box<Ref>>) -> Self {
        Ref {
            name,
            loc,
            parent,
            def: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.def.borrow().is_some()
    }

    /// The bound declaration. Panics if called before resolution — every
    /// consumer downstream of the resolver may assume this invariant holds
    /// (`spec.md §8`: "Every `Ref.def` in P is non-null").
    #[must_use]
    pub fn def(&self) -> RefTarget {
        self.def
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("Ref::def() called before resolution"))
    }

    /// Fill in the resolved target. Called exactly once by the resolver.
    ///
    /// # Panics
    /// Panics if the ref was already resolved — that would violate the
    /// "never partially resolved" invariant.
    pub fn resolve(&self, target: RefTarget) {
        let mut slot = self.def.borrow_mut();
        assert!(slot.is_none(), "Ref resolved twice");
        *slot = Some(target);
    }
}

impl Spanned for Ref {
    fn span(&self) -> Span {
        self.loc
    }
}
