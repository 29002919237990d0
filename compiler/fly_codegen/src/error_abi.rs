//! Error-handling ABI (`spec.md §4.9`).
//!
//! `%error = type { i8 kind, i32 integer_payload, i8* pointer_payload }`.
//! `fail` writes `kind`/the appropriate payload slot and either returns
//! early with the function's default value, or — inside a `handle` body —
//! branches to the installed `safe` continuation.

use crate::context::Ctx;
use fly_ir::Type;
use inkwell::builder::Builder;
use inkwell::values::{BasicValueEnum, IntValue, PointerValue};
use inkwell::IntPredicate;

pub const KIND_NONE: u64 = 0;
pub const KIND_INT: u64 = 1;
pub const KIND_STRING: u64 = 2;
pub const KIND_IDENTITY: u64 = 3;

/// Zeroes a just-`alloca`'d `%error` slot (`kind = 0`, payloads left
/// undefined — nothing reads them until `kind != 0`).
pub fn zero_error(ctx: &Ctx, llb: &Builder, error_slot: PointerValue) {
    let kind_ptr = llb.build_struct_gep(ctx.error_ty, error_slot, 0, "error.kind_ptr").expect("gep");
    llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_NONE, false)).expect("store");
}

/// Writes `kind` and the appropriate payload slot for one `fail` arm
/// (`spec.md §4.9`'s five payload cases).
pub fn store_fail_payload<'ll>(
    ctx: &Ctx<'ll>,
    llb: &Builder<'ll>,
    error_slot: PointerValue<'ll>,
    payload: Option<(fly_ir::Type, inkwell::values::BasicValueEnum<'ll>)>,
) {
    let kind_ptr = llb.build_struct_gep(ctx.error_ty, error_slot, 0, "error.kind_ptr").expect("gep");
    let int_ptr = llb.build_struct_gep(ctx.error_ty, error_slot, 1, "error.int_ptr").expect("gep");
    let ptr_ptr = llb.build_struct_gep(ctx.error_ty, error_slot, 2, "error.ptr_ptr").expect("gep");

    let Some((ty, value)) = payload else {
        llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_INT, false)).expect("store");
        llb.build_store(int_ptr, ctx.type_i32().const_int(1, false)).expect("store");
        return;
    };

    match ty {
        Type::Bool => {
            let i1 = value.into_int_value();
            let as_i32 = llb.build_int_z_extend(i1, ctx.type_i32(), "fail.bool_to_i32").expect("zext");
            llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_INT, false)).expect("store");
            llb.build_store(int_ptr, as_i32).expect("store");
        }
        Type::Int { .. } => {
            let iv = value.into_int_value();
            let as_i32 = if iv.get_type().get_bit_width() < 32 {
                llb.build_int_z_extend(iv, ctx.type_i32(), "fail.int_to_i32").expect("zext")
            } else if iv.get_type().get_bit_width() > 32 {
                llb.build_int_truncate(iv, ctx.type_i32(), "fail.int_to_i32").expect("trunc")
            } else {
                iv
            };
            llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_INT, false)).expect("store");
            llb.build_store(int_ptr, as_i32).expect("store");
        }
        Type::String => {
            llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_STRING, false)).expect("store");
            llb.build_store(ptr_ptr, value.into_pointer_value()).expect("store");
        }
        Type::Identity(_) => {
            llb.build_store(kind_ptr, ctx.type_i8().const_int(KIND_IDENTITY, false)).expect("store");
            llb.build_store(ptr_ptr, value.into_pointer_value()).expect("store");
        }
        _ => unreachable!("fail payload type already validated during resolution"),
    }
}

/// The zero/false/null the function returns on an early `fail` exit
/// (`spec.md §4.9`).
#[must_use]
pub fn default_return_value<'ll>(ctx: &Ctx<'ll>, ty: &Type) -> Option<inkwell::values::BasicValueEnum<'ll>> {
    match ty {
        Type::Void => None,
        other => Some(crate::types::zero_value(ctx, other)),
    }
}

/// `Error → Bool` (`spec.md §4.3`): the same `kind != 0` reading
/// `emit_main_epilogue` gives the hidden error slot, available to source
/// code directly through a `handle` block's aliased error variable.
pub fn kind_to_bool<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, kind: IntValue<'ll>) -> IntValue<'ll> {
    let zero = ctx.type_i8().const_int(KIND_NONE, false);
    llb.build_int_compare(IntPredicate::NE, kind, zero, "error.kind_to_bool").expect("icmp")
}

/// `Error → integer` (`spec.md §4.3`): the `kind` byte zero/sign-extended
/// (it is never negative, so sign doesn't matter) to the target width, or
/// truncated if the target is narrower than `i8`.
pub fn kind_to_int<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, kind: IntValue<'ll>, to: &Type) -> BasicValueEnum<'ll> {
    let target = ctx.value_type(to).into_int_type();
    if target.get_bit_width() < 8 {
        llb.build_int_truncate(kind, target, "error.kind_to_int").expect("trunc").into()
    } else if target.get_bit_width() > 8 {
        llb.build_int_z_extend(kind, target, "error.kind_to_int").expect("zext").into()
    } else {
        kind.into()
    }
}

/// `Error → String` (`spec.md §4.3`): one fixed label per `kind` value,
/// the same vocabulary `fail`'s own payload discriminant uses.
pub fn kind_to_string<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, kind: IntValue<'ll>) -> BasicValueEnum<'ll> {
    let none = llb.build_global_string_ptr("none", "error.kind.none").expect("global string").as_pointer_value();
    let int = llb.build_global_string_ptr("int", "error.kind.int").expect("global string").as_pointer_value();
    let string = llb.build_global_string_ptr("string", "error.kind.string").expect("global string").as_pointer_value();
    let identity = llb.build_global_string_ptr("identity", "error.kind.identity").expect("global string").as_pointer_value();

    let is_none = llb.build_int_compare(IntPredicate::EQ, kind, ctx.type_i8().const_int(KIND_NONE, false), "error.kind.is_none").expect("icmp");
    let is_int = llb.build_int_compare(IntPredicate::EQ, kind, ctx.type_i8().const_int(KIND_INT, false), "error.kind.is_int").expect("icmp");
    let is_string = llb.build_int_compare(IntPredicate::EQ, kind, ctx.type_i8().const_int(KIND_STRING, false), "error.kind.is_string").expect("icmp");

    let by_payload = llb.build_select(is_string, string, identity, "error.kind.by_payload").expect("select").into_pointer_value();
    let by_int = llb.build_select(is_int, int, by_payload, "error.kind.by_int").expect("select").into_pointer_value();
    llb.build_select(is_none, none, by_int, "error.kind.resolved").expect("select")
}

/// `__fly_main_impl`'s real exit: `zext(error.kind != 0 to i32)`
/// (`spec.md §4.9`). Shared by every path that can end `main`'s body — a
/// plain fall-through, an explicit bare `return;`, and an unhandled `fail`
/// all need the same translation from the hidden `%error` slot to the `i32`
/// the emitted `main` symbol actually returns.
pub fn emit_main_epilogue(ctx: &Ctx, llb: &Builder, error_storage: PointerValue) {
    let kind_ptr = llb.build_struct_gep(ctx.error_ty, error_storage, 0, "error.kind_ptr").expect("gep");
    let kind = llb.build_load(ctx.type_i8(), kind_ptr, "error.kind").expect("load").into_int_value();
    let failed = kind_to_bool(ctx, llb, kind);
    let ret = llb.build_int_z_extend(failed, ctx.type_i32(), "error.ret").expect("zext");
    llb.build_return(Some(&ret)).expect("ret");
}
