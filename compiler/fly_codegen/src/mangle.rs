//! Stable symbol naming (`spec.md §6`).
//!
//! A non-overloaded function `F` keeps the bare name `F`. An overloaded one
//! appends `_<arity>_<type-chars>`, one character per user parameter:
//! `b`=bool, `i`/`u` + width for signed/unsigned ints, `f`/`d` for
//! float/double, `S` for string, and an identity's unqualified name for
//! class/struct/enum parameters. Classes produce `%C` (layout), `%C_vtable`,
//! constructor `C_C`, and methods `C_<name>`.

use crate::context::Ctx;
use fly_ir::{FloatBits, Name, Type};

pub fn type_char(ctx: &Ctx, ty: &Type) -> String {
    match ty {
        Type::Bool => "b".to_string(),
        Type::Int { bits, signed } => format!("{}{}", if *signed { "i" } else { "u" }, bits.bits()),
        Type::Float(FloatBits::B32) => "f".to_string(),
        Type::Float(FloatBits::B64) => "d".to_string(),
        Type::String => "S".to_string(),
        Type::Void | Type::Error => "v".to_string(),
        Type::Array { elem, .. } => format!("A{}", type_char(ctx, elem)),
        Type::Identity(ir) => ctx.name_str(ir.qualified_name).to_string(),
    }
}

/// `F_<arity>_<chars>` for an overloaded free function/method; bare `F`
/// otherwise. `is_overloaded` is decided by the caller (the namespace/class
/// overload table already answers "more than one candidate with this name").
pub fn mangled_name(ctx: &Ctx, base: Name, user_param_types: &[Type], is_overloaded: bool) -> String {
    let base_str = ctx.name_str(base);
    if !is_overloaded {
        return base_str.to_string();
    }
    let chars: String = user_param_types.iter().map(|t| type_char(ctx, t)).collect();
    format!("{base_str}_{}_{chars}", user_param_types.len())
}

#[must_use]
pub fn class_struct_name(ctx: &Ctx, class_name: Name) -> String {
    ctx.name_str(class_name).to_string()
}

#[must_use]
pub fn class_vtable_type_name(ctx: &Ctx, class_name: Name) -> String {
    format!("{}_vtable", ctx.name_str(class_name))
}

#[must_use]
pub fn class_vtable_global_name(ctx: &Ctx, class_name: Name) -> String {
    format!("{}_vtable_init", ctx.name_str(class_name))
}

#[must_use]
pub fn constructor_name(ctx: &Ctx, class_name: Name) -> String {
    let c = ctx.name_str(class_name);
    format!("{c}_{c}")
}

#[must_use]
pub fn method_name(ctx: &Ctx, class_name: Name, method: Name) -> String {
    format!("{}_{}", ctx.name_str(class_name), ctx.name_str(method))
}
