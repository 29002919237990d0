//! The type model (`spec.md §3`).
//!
//! Types are immutable after construction with one exception: an
//! `IdentityRef` starts out holding only a qualified name and is filled in
//! by the resolver with the declaration it names (`spec.md §4.4` pass 1,
//! "Materialize type references in signatures"). Equality is structural for
//! primitives and arrays, nominal (by qualified name) for identity types —
//! two `IdentityRef`s naming the same type are equal whether or not either
//! has been resolved yet.

use crate::decl::{ClassDecl, EnumDecl};
use crate::name::Name;
use crate::span::Span;
use std::cell::RefCell;
use std::rc::Rc;

/// Bit width for integer and floating-point types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntBits {
    B8,
    B16,
    B32,
    B64,
}

impl IntBits {
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            IntBits::B8 => 8,
            IntBits::B16 => 16,
            IntBits::B32 => 32,
            IntBits::B64 => 64,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatBits {
    B32,
    B64,
}

impl FloatBits {
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            FloatBits::B32 => 32,
            FloatBits::B64 => 64,
        }
    }
}

/// The kind an `IdentityRef` names before/after resolution.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IdentityKind {
    Class,
    Struct,
    Enum,
}

/// What an `IdentityRef` resolves to.
#[derive(Clone)]
pub enum IdentityDef {
    Class(Rc<ClassDecl>),
    Enum(Rc<EnumDecl>),
}

/// A reference to a nominal (class/struct/enum) type.
///
/// `resolved` is the "fill-after" field the resolver populates; until then
/// only `qualified_name` is meaningful. Equality never looks at `resolved`.
#[derive(Clone)]
pub struct IdentityRef {
    pub kind: IdentityKind,
    pub qualified_name: Name,
    pub loc: Span,
    resolved: Rc<RefCell<Option<IdentityDef>>>,
}

impl IdentityRef {
    #[must_use]
    pub fn new(kind: IdentityKind, qualified_name: Name, loc: Span) -> Self {
        IdentityRef {
            kind,
            qualified_name,
            loc,
            resolved: Rc::new(RefCell::new(None)),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.borrow().is_some()
    }

    #[must_use]
    pub fn resolved(&self) -> Option<IdentityDef> {
        self.resolved.borrow().clone()
    }

    /// Fill in the resolved declaration. Called exactly once by the resolver.
    pub fn resolve(&self, def: IdentityDef) {
        *self.resolved.borrow_mut() = Some(def);
    }
}

impl PartialEq for IdentityRef {
    fn eq(&self, other: &Self) -> bool {
        // Nominal equality: same kind + same qualified name, regardless of
        // whether either side has been resolved yet.
        self.kind == other.kind && self.qualified_name == other.qualified_name
    }
}
impl Eq for IdentityRef {}

/// A type (`spec.md §3`).
#[derive(Clone, PartialEq)]
pub enum Type {
    Void,
    Bool,
    Int { bits: IntBits, signed: bool },
    Float(FloatBits),
    String,
    /// The runtime error payload type (`spec.md §4.9`), usable as a
    /// first-class value (`fail`'s operand may be of this type).
    Error,
    Array {
        elem: Box<Type>,
        /// `None` for a dynamically-sized array type reference; fixed-size
        /// arrays carry their length as an (already resolved) expression,
        /// represented here as the constant it evaluates to.
        size: Option<u64>,
    },
    Identity(IdentityRef),
}

/// Coarse grouping used by the validator/resolver for comparison and
/// conversion rules (`spec.md` Glossary: "Macro-category").
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MacroCategory {
    Integer,
    Floating,
    Bool,
    String,
    Identity,
    Void,
    Error,
}

impl Type {
    #[must_use]
    pub fn category(&self) -> MacroCategory {
        match self {
            Type::Void => MacroCategory::Void,
            Type::Bool => MacroCategory::Bool,
            Type::Int { .. } => MacroCategory::Integer,
            Type::Float(_) => MacroCategory::Floating,
            Type::String => MacroCategory::String,
            Type::Error => MacroCategory::Error,
            Type::Array { .. } | Type::Identity(_) => MacroCategory::Identity,
        }
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int { .. })
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    /// The default value's type-appropriate constructor (`spec.md §4.1`
    /// Defaulting / `§4.7` Globals).
    #[must_use]
    pub fn default_is_zero_like(&self) -> bool {
        !matches!(self, Type::Array { .. } | Type::Identity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Interner;

    #[test]
    fn identity_ref_equality_is_nominal() {
        let interner = Interner::new();
        let point = interner.intern("Point");
        let line = interner.intern("Line");

        let a = IdentityRef::new(IdentityKind::Class, point, Span::DUMMY);
        let b = IdentityRef::new(IdentityKind::Class, point, Span::DUMMY);
        assert_eq!(a, b);
        let c = IdentityRef::new(IdentityKind::Class, line, Span::DUMMY);
        assert_ne!(a, c);
    }
}
