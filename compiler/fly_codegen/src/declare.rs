//! Two-phase declaration (`ori_llvm::declare` pattern): every symbol gets a
//! forward declaration before any function body is lowered, so a function
//! can call one declared later in the same module without ordering tricks.

use crate::context::{ClassLayout, Ctx};
use crate::mangle;
use fly_ir::{ClassDecl, EnumDecl, Function, Module, Type, Value};
use inkwell::module::Linkage;
use inkwell::types::BasicMetadataTypeEnum;
use inkwell::values::{BasicValueEnum, GlobalValue};
use inkwell::AddressSpace;
use std::rc::Rc;

/// `malloc`/`free`, the only runtime entry points Fly's codegen calls
/// directly (`spec.md §4.7` Object creation and destruction).
pub fn declare_runtime(ctx: &Ctx) {
    let i8ptr = ctx.llcx.ptr_type(AddressSpace::default());
    ctx.llmod.add_function(
        "malloc",
        i8ptr.fn_type(&[ctx.isize_ty.into()], false),
        Some(Linkage::External),
    );
    ctx.llmod.add_function(
        "free",
        ctx.llcx.void_type().fn_type(&[i8ptr.into()], false),
        Some(Linkage::External),
    );
}

/// Opaque struct shells for every class/struct so attribute types that refer
/// to another identity (including itself, recursively through a pointer)
/// resolve regardless of declaration order.
pub fn predeclare_classes(ctx: &Ctx, module: &Module) {
    for class in module.classes.borrow().iter() {
        if ctx.classes.borrow().contains_key(&class.name) {
            continue;
        }
        let struct_ty = ctx.llcx.opaque_struct_type(&mangle::class_struct_name(ctx, class.name));
        let has_vtable_slot = !class.is_struct();
        ctx.classes.borrow_mut().insert(
            class.name,
            ClassLayout {
                struct_ty,
                vtable_ty: None,
                vtable_global: None,
                has_vtable_slot,
            },
        );
    }
}

/// Fills in each class's body now that every class shell exists
/// (`spec.md §4.6`: `{ vtable*, field0, field1, ... }`, vtable slot omitted
/// for structs).
pub fn define_class_layouts(ctx: &Ctx, module: &Module) {
    for class in module.classes.borrow().iter() {
        let mut fields: Vec<inkwell::types::BasicTypeEnum> = Vec::new();
        if !class.is_struct() {
            fields.push(ctx.ptr_ty.into());
        }
        for attr in class.attributes.borrow().iter() {
            fields.push(ctx.store_type(&attr.ty));
            ctx.register_attribute_owner(Rc::as_ptr(attr) as usize, class.name);
        }
        let struct_ty = ctx.classes.borrow()[&class.name].struct_ty;
        struct_ty.set_body(&fields, false);

        if !class.is_struct() {
            declare_vtable(ctx, class);
        }
    }
}

fn declare_vtable(ctx: &Ctx, class: &Rc<ClassDecl>) {
    let methods = class.methods.borrow();
    let fn_ptr_tys: Vec<inkwell::types::BasicTypeEnum> = methods.iter().map(|_| ctx.ptr_ty.into()).collect();
    let vtable_ty = ctx.llcx.opaque_struct_type(&mangle::class_vtable_type_name(ctx, class.name));
    vtable_ty.set_body(&fn_ptr_tys, false);
    drop(methods);

    let mut classes = ctx.classes.borrow_mut();
    let layout = classes.get_mut(&class.name).expect("class predeclared");
    layout.vtable_ty = Some(vtable_ty);
}

/// Declares every free function's LLVM signature (`ret (%error*, <user
/// params>)`, `spec.md §4.7` Function prologue) ahead of any body lowering.
pub fn declare_functions(ctx: &Ctx, module: &Module) {
    let functions = module.functions.borrow();
    for function in functions.iter() {
        let overloaded = functions.iter().filter(|f| f.name == function.name).count() > 1;
        declare_function(ctx, function, overloaded);
    }
}

pub fn declare_function(ctx: &Ctx, function: &Rc<Function>, overloaded: bool) {
    let key = Rc::as_ptr(function) as usize;
    if ctx.get_function(key).is_some() {
        return;
    }
    let user_types: Vec<_> = function.user_params().map(|p| p.ty.clone()).collect();
    let symbol = mangle::mangled_name(ctx, function.name, &user_types, overloaded);
    let is_main = &*ctx.name_str(function.name) == "main" && user_types.is_empty();

    let fn_value = if is_main {
        // `main` is emitted parameterless, returning `i32`
        // (`spec.md §4.9`); the real body is generated under a different
        // symbol and called from the synthesized wrapper
        // (`functions::gen_main_wrapper`).
        let inner = ctx.llcx.i32_type().fn_type(&[], false);
        ctx.llmod.add_function("__fly_main_impl", inner, None)
    } else {
        let mut params: Vec<BasicMetadataTypeEnum> = vec![ctx.ptr_ty.into()];
        params.extend(user_types.iter().map(|t| ctx.value_type(t).into()));
        let ret = ctx.value_type(&function.return_ty);
        let fn_ty = ret.fn_type(&params, false);
        ctx.llmod.add_function(&symbol, fn_ty, None)
    };
    ctx.register_function(key, fn_value);
}

/// Declares every class's constructors and methods under their mangled
/// symbols (`spec.md §6`: constructor `C_C`, methods `C_<name>`).
pub fn declare_class_members(ctx: &Ctx, class: &Rc<ClassDecl>) {
    let constructors = class.constructors.borrow();
    for ctor in constructors.iter() {
        let key = Rc::as_ptr(ctor) as usize;
        if ctx.get_function(key).is_some() {
            continue;
        }
        let overloaded = constructors.len() > 1;
        let user_types: Vec<_> = ctor.user_params().map(|p| p.ty.clone()).collect();
        let symbol = if overloaded {
            format!("{}_{}", mangle::constructor_name(ctx, class.name), user_types.iter().map(|t| mangle::type_char(ctx, t)).collect::<String>())
        } else {
            mangle::constructor_name(ctx, class.name)
        };
        let mut params: Vec<BasicMetadataTypeEnum> = vec![ctx.ptr_ty.into(), ctx.ptr_ty.into()];
        params.extend(user_types.iter().map(|t| ctx.value_type(t).into()));
        let fn_ty = ctx.llcx.void_type().fn_type(&params, false);
        let fn_value = ctx.llmod.add_function(&symbol, fn_ty, None);
        ctx.register_function(key, fn_value);
        ctx.register_method_owner(key, class.name);
    }
    drop(constructors);

    let methods = class.methods.borrow();
    for method in methods.iter() {
        let key = Rc::as_ptr(method) as usize;
        if ctx.get_function(key).is_some() {
            continue;
        }
        let overloaded = methods.iter().filter(|m| m.name == method.name).count() > 1;
        let user_types: Vec<_> = method.user_params().map(|p| p.ty.clone()).collect();
        let base_symbol = mangle::method_name(ctx, class.name, method.name);
        let symbol = if overloaded {
            format!("{base_symbol}_{}_{}", user_types.len(), user_types.iter().map(|t| mangle::type_char(ctx, t)).collect::<String>())
        } else {
            base_symbol
        };
        let mut params: Vec<BasicMetadataTypeEnum> = vec![ctx.ptr_ty.into()];
        if !class.is_struct() {
            params.push(ctx.ptr_ty.into()); // implicit receiver
        }
        params.extend(user_types.iter().map(|t| ctx.value_type(t).into()));
        let ret = ctx.value_type(&method.return_ty);
        let fn_ty = ret.fn_type(&params, false);
        let fn_value = ctx.llmod.add_function(&symbol, fn_ty, None);
        ctx.register_function(key, fn_value);
        ctx.register_method_owner(key, class.name);
    }
}

/// Declares every module-level global and materializes its initializer —
/// always a constant, so (unlike functions/classes) this needs only one
/// pass, not a separate declare/define split (`spec.md §4.1` Defaulting).
pub fn declare_globals(ctx: &Ctx, module: &Module) {
    for global in module.globals.borrow().iter() {
        if ctx.globals.borrow().contains_key(&global.name) {
            continue;
        }
        let ty = ctx.store_type(&global.ty);
        let llglobal = ctx.llmod.add_global(ty, None, &ctx.name_str(global.name));
        let value = match global.init.borrow().as_ref() {
            Some(v) => global_init_value(ctx, v, &global.ty),
            None => crate::types::zero_value(ctx, &global.ty),
        };
        llglobal.set_initializer(&value);
        ctx.globals.borrow_mut().insert(global.name, llglobal);
    }
}

/// A constant materialization of a literal `Value`, usable as a global's
/// initializer. Distinct from `expr::lower_value_const`: a `String` literal
/// there goes through `Builder::build_global_string_ptr`, an instruction
/// that needs a live insertion point a top-level global initializer doesn't
/// have, so it gets its own constant-global-backed string here instead.
fn global_init_value<'ll>(ctx: &Ctx<'ll>, value: &Value, ty: &Type) -> BasicValueEnum<'ll> {
    match value {
        Value::Bool(b) => ctx.type_i1().const_int(u64::from(*b), false).into(),
        Value::Integer { magnitude, negative, .. } => {
            let int_ty = ctx.value_type(ty).into_int_type();
            let bits = if *negative { magnitude.wrapping_neg() } else { *magnitude };
            int_ty.const_int(bits, true).into()
        }
        Value::Floating(text) => {
            let f: f64 = text.parse().unwrap_or(0.0);
            ctx.value_type(ty).into_float_type().const_float(f).into()
        }
        Value::Char(c) => ctx.type_i8().const_int(u64::from(*c as u32), false).into(),
        Value::String(s) => const_string_global(ctx, s).as_pointer_value().into(),
        Value::Null => ctx.ptr_ty.const_null().into(),
        Value::Zero => crate::types::zero_value(ctx, ty),
        Value::Array(_) | Value::Struct(_) => ctx.ptr_ty.const_null().into(),
    }
}

fn const_string_global<'ll>(ctx: &Ctx<'ll>, s: &str) -> GlobalValue<'ll> {
    let bytes = s.as_bytes();
    let array_ty = ctx.type_i8().array_type(u32::try_from(bytes.len() + 1).expect("string literal too long"));
    let mut chars: Vec<_> = bytes.iter().map(|&b| ctx.type_i8().const_int(u64::from(b), false)).collect();
    chars.push(ctx.type_i8().const_int(0, false));
    let init = ctx.type_i8().const_array(&chars);

    let global = ctx.llmod.add_global(array_ty, None, "str");
    global.set_initializer(&init);
    global.set_constant(true);
    global.set_linkage(Linkage::Private);
    global
}

/// Enum entries are emitted as internal global constants once their
/// constructor is lowered (`spec.md §4.6`); nothing to predeclare beyond the
/// `uint` representation already chosen in `types::identity_value_type`.
pub fn declare_enum(_ctx: &Ctx, _enum_decl: &Rc<EnumDecl>) {}
