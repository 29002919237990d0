//! `fly_ir::Type` → LLVM type mapping (`spec.md §4.7`).
//!
//! Booleans are `i1` as SSA values but `i8` in memory — every `alloca`/
//! `global`/struct-field slot for a `Bool` uses [`Ctx::store_type`], with a
//! `zext`/`trunc` pair at the store/load boundary (`functions::store_param`,
//! `expr::load_ref`).

use crate::context::Ctx;
use fly_ir::{FloatBits, IdentityDef, IntBits, Type};
use inkwell::types::BasicTypeEnum;

impl<'ll> Ctx<'ll> {
    /// The type of an SSA value of this Fly type (`i1` for bool).
    #[must_use]
    pub fn value_type(&self, ty: &Type) -> BasicTypeEnum<'ll> {
        match ty {
            Type::Void | Type::Error => self.type_i8().into(),
            Type::Bool => self.type_i1().into(),
            Type::Int { bits, .. } => int_type(self, *bits).into(),
            Type::Float(FloatBits::B32) => self.llcx.f32_type().into(),
            Type::Float(FloatBits::B64) => self.llcx.f64_type().into(),
            Type::String => self.ptr_ty.into(),
            Type::Array { .. } => self.ptr_ty.into(),
            Type::Identity(ir) => identity_value_type(self, ir),
        }
    }

    /// The type of the memory slot that stores a value of this Fly type
    /// (`i8` for bool, identical to `value_type` otherwise).
    #[must_use]
    pub fn store_type(&self, ty: &Type) -> BasicTypeEnum<'ll> {
        match ty {
            Type::Bool => self.type_i8().into(),
            other => self.value_type(other),
        }
    }
}

/// The attribute/global default for a type carrying no explicit initializer
/// (`spec.md §4.1` Defaulting).
#[must_use]
pub fn zero_value<'ll>(ctx: &Ctx<'ll>, ty: &Type) -> inkwell::values::BasicValueEnum<'ll> {
    match ty {
        Type::Bool => ctx.type_i1().const_int(0, false).into(),
        Type::Int { .. } => ctx.value_type(ty).into_int_type().const_int(0, false).into(),
        Type::Float(_) => ctx.value_type(ty).into_float_type().const_float(0.0).into(),
        Type::String | Type::Array { .. } | Type::Identity(_) => ctx.ptr_ty.const_null().into(),
        Type::Void | Type::Error => ctx.type_i8().const_int(0, false).into(),
    }
}

fn int_type<'ll>(ctx: &Ctx<'ll>, bits: IntBits) -> inkwell::types::IntType<'ll> {
    match bits {
        IntBits::B8 => ctx.type_i8(),
        IntBits::B16 => ctx.llcx.i16_type(),
        IntBits::B32 => ctx.type_i32(),
        IntBits::B64 => ctx.type_i64(),
    }
}

/// Class/struct instances are always accessed through a pointer; an enum
/// value is its underlying `uint` (`spec.md §4.6`).
fn identity_value_type<'ll>(ctx: &Ctx<'ll>, ir: &fly_ir::IdentityRef) -> BasicTypeEnum<'ll> {
    match ir.resolved() {
        Some(IdentityDef::Enum(_)) => ctx.type_i32().into(),
        _ => ctx.ptr_ty.into(),
    }
}
