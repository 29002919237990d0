//! Type equality, convertibility, and category rules (`spec.md §4.3`).

use fly_ir::{IdentityDef, IdentityKind, IdentityRef, MacroCategory, Type};

/// Structural equality for primitives/arrays, nominal for identities.
/// `Type` already derives this relation via `IdentityRef`'s custom
/// `PartialEq` — this wrapper exists so call sites read like the spec.
#[must_use]
pub fn types_equal(a: &Type, b: &Type) -> bool {
    a == b
}

/// Convertibility rules (`spec.md §4.3`):
/// - bool ↔ bool
/// - integer → integer requires `from-width ≤ to-width` **or** same
///   signedness
/// - float → float requires `from-width ≤ to-width`
/// - array → array requires element compatibility
/// - identity → identity requires enum-name equality or subclass chain
/// - `Error` is convertible to `Bool`, integer, or `String`
#[must_use]
pub fn is_convertible(from: &Type, to: &Type) -> bool {
    match (from, to) {
        (Type::Void, Type::Void) | (Type::Bool, Type::Bool) | (Type::String, Type::String) => true,
        (Type::Int { bits: fb, signed: fs }, Type::Int { bits: tb, signed: ts }) => {
            fb.bits() <= tb.bits() || fs == ts
        }
        (Type::Float(fb), Type::Float(tb)) => fb.bits() <= tb.bits(),
        (Type::Array { elem: fe, .. }, Type::Array { elem: te, .. }) => is_convertible(fe, te),
        (Type::Identity(f), Type::Identity(t)) => identity_convertible(f, t),
        (Type::Error, Type::Bool | Type::Int { .. } | Type::String) => true,
        _ => false,
    }
}

fn identity_convertible(from: &IdentityRef, to: &IdentityRef) -> bool {
    if from == to {
        // Nominal equality already covers "enum-name equality" and
        // "same class".
        return true;
    }
    if from.kind == IdentityKind::Enum || to.kind == IdentityKind::Enum {
        return false;
    }
    // Subclass chain: walk `from`'s resolved superclasses upward.
    match from.resolved() {
        Some(IdentityDef::Class(class)) => {
            class.supers.iter().any(|s| identity_convertible(s, to))
        }
        _ => false,
    }
}

/// Arithmetic operators require both operands share a macro-category
/// (`spec.md §4.3`).
#[must_use]
pub fn categories_match_for_arithmetic(lhs: &Type, rhs: &Type) -> bool {
    matches!(
        (lhs.category(), rhs.category()),
        (MacroCategory::Integer, MacroCategory::Integer)
            | (MacroCategory::Floating, MacroCategory::Floating)
    )
}

/// Logical operators require both operands `Bool` (`spec.md §4.3`).
#[must_use]
pub fn both_bool(lhs: &Type, rhs: &Type) -> bool {
    matches!(lhs, Type::Bool) && matches!(rhs, Type::Bool)
}

/// Comparison requires same macro-category (`spec.md §4.3`).
#[must_use]
pub fn categories_match_for_comparison(lhs: &Type, rhs: &Type) -> bool {
    lhs.category() == rhs.category()
}

/// The wider of two numeric types, used for binary-arithmetic result typing
/// and ternary-branch unification (`spec.md §4.4`).
#[must_use]
pub fn wider(a: &Type, b: &Type) -> Type {
    match (a, b) {
        (Type::Int { bits: ab, signed: asg }, Type::Int { bits: bb, signed: bsg }) => {
            if ab.bits() >= bb.bits() {
                Type::Int {
                    bits: *ab,
                    signed: *asg,
                }
            } else {
                Type::Int {
                    bits: *bb,
                    signed: *bsg,
                }
            }
        }
        (Type::Float(ab), Type::Float(bb)) => {
            if ab.bits() >= bb.bits() {
                Type::Float(*ab)
            } else {
                Type::Float(*bb)
            }
        }
        _ => a.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_ir::IntBits;

    #[test]
    fn integer_widening_is_convertible() {
        let byte = Type::Int {
            bits: IntBits::B8,
            signed: true,
        };
        let long = Type::Int {
            bits: IntBits::B64,
            signed: true,
        };
        assert!(is_convertible(&byte, &long));
        assert!(!is_convertible(&long, &byte));
    }

    #[test]
    fn same_signedness_permits_any_direction() {
        let a = Type::Int {
            bits: IntBits::B64,
            signed: true,
        };
        let b = Type::Int {
            bits: IntBits::B8,
            signed: true,
        };
        assert!(is_convertible(&a, &b));
    }

    #[test]
    fn error_converts_to_bool_int_string() {
        assert!(is_convertible(&Type::Error, &Type::Bool));
        assert!(is_convertible(
            &Type::Error,
            &Type::Int {
                bits: IntBits::B32,
                signed: true
            }
        ));
        assert!(is_convertible(&Type::Error, &Type::String));
        assert!(!is_convertible(&Type::Error, &Type::Float(fly_ir::FloatBits::B64)));
    }
}
