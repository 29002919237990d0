//! Class/struct object support: the vtable constant each non-struct class
//! carries, and the implicit part of every constructor's prologue
//! (`spec.md §4.6`, §4.8).

use crate::context::Ctx;
use crate::expr;
use crate::mangle;
use fly_ir::ClassDecl;
use inkwell::builder::Builder;
use inkwell::values::FunctionValue;
use std::rc::Rc;

/// Builds `@C_vtable_init`, the constant struct of method pointers every
/// instance's hidden vtable slot points at — direct dispatch still calls the
/// concrete symbol (`spec.md §4.8`: "never the vtable slot"), so this exists
/// only so the vtable slot itself has a well-formed value to read back.
/// Called once per non-struct class, after `declare::declare_class_members`
/// has given every method a `FunctionValue` to reference.
pub fn build_vtable_global(ctx: &Ctx, class: &Rc<ClassDecl>) {
    if class.is_struct() {
        return;
    }
    let methods = class.methods.borrow();
    let fn_ptrs: Vec<_> = methods
        .iter()
        .map(|m| {
            let key = Rc::as_ptr(m) as usize;
            ctx.get_function(key).expect("method predeclared").as_global_value().as_pointer_value().into()
        })
        .collect();
    drop(methods);

    let vtable_ty = ctx.classes.borrow()[&class.name].vtable_ty.expect("vtable type declared");
    let init = vtable_ty.const_named_struct(&fn_ptrs);
    let global = ctx.llmod.add_global(vtable_ty, None, &mangle::class_vtable_global_name(ctx, class.name));
    global.set_initializer(&init);
    global.set_constant(true);

    ctx.classes.borrow_mut().get_mut(&class.name).expect("class predeclared").vtable_global = Some(global);
}

/// The part of a constructor's body no source statement spells out: write
/// the vtable pointer into field 0 (non-struct classes only) and zero/
/// default-init every attribute in declaration order, before any
/// user-written constructor statement runs. Struct constructors skip the
/// vtable write; both still zero-init every field so a partially-initialized
/// instance never has undefined attribute memory.
pub fn init_constructor_prologue<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, class: &Rc<ClassDecl>, fn_value: FunctionValue<'ll>) {
    let receiver = fn_value.get_nth_param(1).expect("constructor receiver present").into_pointer_value();
    let layout = &ctx.classes.borrow()[&class.name];
    let struct_ty = layout.struct_ty;

    if layout.has_vtable_slot {
        let vtable_global = layout.vtable_global.expect("vtable global built before any constructor");
        let slot = llb.build_struct_gep(struct_ty, receiver, 0, "ctor.vtable_ptr").expect("gep");
        llb.build_store(slot, vtable_global.as_pointer_value()).expect("store");
    }

    for attr in class.attributes.borrow().iter() {
        let idx = if layout.has_vtable_slot { attr.field_index + 1 } else { attr.field_index };
        let field_ptr = llb.build_struct_gep(struct_ty, receiver, idx, "ctor.field_ptr").expect("gep");
        let value = match &attr.default {
            Some(v) => expr::lower_value_const(ctx, llb, v, &attr.ty),
            None => crate::types::zero_value(ctx, &attr.ty),
        };
        crate::functions::store_value(ctx, llb, field_ptr, &attr.ty, value);
    }
}
