//! Function prologue and `main`'s wrapper (`spec.md §4.7` Function
//! prologue, `§4.9` Error-handling ABI).

use crate::context::Ctx;
use crate::error_abi;
use crate::stmt::FnLower;
use fly_ir::{ClassDecl, ClassMethod, Function, LocalVar, MethodKind, Parameter};
use inkwell::builder::Builder;
use inkwell::values::{FunctionValue, PointerValue};
use rustc_hash::FxHashMap;
use std::rc::Rc;
use tracing::debug;

/// Per-function local storage: every parameter (including the synthesized
/// error pointer and, for instance methods, the receiver) plus every
/// `LocalVar` gets one `alloca`'d slot (`spec.md §4.7`).
pub struct Locals<'ll> {
    pub slots: FxHashMap<usize, PointerValue<'ll>>,
}

impl<'ll> Locals<'ll> {
    fn new() -> Self {
        Locals {
            slots: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn slot_for_local(&self, local: &Rc<LocalVar>) -> PointerValue<'ll> {
        self.slots[&local_key(local)]
    }

    #[must_use]
    pub fn slot_for_param(&self, param: &Rc<Parameter>) -> PointerValue<'ll> {
        self.slots[&param_key(param)]
    }
}

pub(crate) fn param_key(p: &Rc<Parameter>) -> usize {
    Rc::as_ptr(p) as usize
}
pub(crate) fn local_key(l: &Rc<LocalVar>) -> usize {
    Rc::as_ptr(l) as usize
}

/// Allocates and stores the prologue slots for a plain free function
/// (`error pointer`, then user params in order), then lowers the body.
pub fn gen_function(ctx: &Ctx, function: &Rc<Function>) {
    let is_main = &*ctx.name_str(function.name) == "main" && function.user_params().next().is_none();
    if is_main {
        gen_main_impl(ctx, function);
        gen_main_wrapper(ctx, function);
        return;
    }

    let key = Rc::as_ptr(function) as usize;
    let fn_value = ctx.get_function(key).expect("function predeclared");
    debug!(name = %ctx.name_str(function.name), "gen_function");

    let Some(body) = function.body.borrow().clone() else {
        return;
    };
    let entry = ctx.llcx.append_basic_block(fn_value, "entry");
    let llb = ctx.llcx.create_builder();
    llb.position_at_end(entry);

    let mut locals = Locals::new();
    let error_slot = store_prologue_params(ctx, &llb, fn_value, &function.params, &mut locals, None);
    for local in function.locals.borrow().iter() {
        alloca_local(ctx, &llb, local, &mut locals);
    }

    let mut lower = FnLower {
        ctx,
        llb: &llb,
        function: fn_value,
        locals: &mut locals,
        error_slot,
        return_ty: function.return_ty.clone(),
        loop_stack: Vec::new(),
        handle_stack: Vec::new(),
        main_epilogue: None,
    };
    lower.lower_block(&body);
    lower.finish_fallthrough();
}

pub fn gen_method(ctx: &Ctx, class: &Rc<ClassDecl>, method: &Rc<ClassMethod>) {
    let key = Rc::as_ptr(method) as usize;
    let fn_value = ctx.get_function(key).expect("method predeclared");
    let body = method.body.borrow().clone();
    // The synthesized auto-default constructor (`spec.md §8` S2) never gets
    // a body from the builder — it carries nothing but the implicit
    // prologue. Every other bodyless method is a forward declaration with
    // nothing to lower.
    if body.is_none() && method.kind != MethodKind::Constructor {
        return;
    }
    let entry = ctx.llcx.append_basic_block(fn_value, "entry");
    let llb = ctx.llcx.create_builder();
    llb.position_at_end(entry);

    let mut locals = Locals::new();
    let receiver_ty = class.is_struct().then_some(());
    let error_slot = store_prologue_params(ctx, &llb, fn_value, &method.params, &mut locals, receiver_ty.map(|()| 0));
    for local in method.locals.borrow().iter() {
        alloca_local(ctx, &llb, local, &mut locals);
    }

    let mut lower = FnLower {
        ctx,
        llb: &llb,
        function: fn_value,
        locals: &mut locals,
        error_slot,
        return_ty: method.return_ty.clone(),
        loop_stack: Vec::new(),
        handle_stack: Vec::new(),
        main_epilogue: None,
    };
    if method.kind == MethodKind::Constructor {
        crate::objects::init_constructor_prologue(ctx, &llb, class, fn_value);
    }
    if let Some(body) = body {
        lower.lower_block(&body);
    }
    lower.finish_fallthrough();
}

/// Stores the error pointer argument and every user parameter into fresh
/// `alloca`s; `skip_receiver_alloca` only matters for struct methods, whose
/// LLVM signature has no receiver slot to skip (`spec.md §4.6`).
fn store_prologue_params<'ll>(
    ctx: &Ctx<'ll>,
    llb: &Builder<'ll>,
    fn_value: FunctionValue<'ll>,
    params: &[Rc<Parameter>],
    locals: &mut Locals<'ll>,
    _skip_receiver_alloca: Option<u32>,
) -> PointerValue<'ll> {
    let error_arg = fn_value.get_nth_param(0).expect("error param present").into_pointer_value();
    let error_slot = llb.build_alloca(ctx.ptr_ty, "error.slot").expect("alloca");
    llb.build_store(error_slot, error_arg).expect("store");

    for (i, param) in params.iter().filter(|p| !p.is_error_handler).enumerate() {
        let arg = fn_value.get_nth_param((i + 1) as u32).expect("param arg present");
        let slot = llb.build_alloca(ctx.store_type(&param.ty), "param.slot").expect("alloca");
        store_value(ctx, llb, slot, &param.ty, arg);
        locals.slots.insert(param_key(param), slot);
    }
    error_slot
}

/// Stores `value` into `slot`, zero-extending a bool SSA value to `i8`
/// (`spec.md §4.7`: "Booleans stored in memory use i8").
pub fn store_value<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, slot: PointerValue<'ll>, ty: &fly_ir::Type, value: inkwell::values::BasicValueEnum<'ll>) {
    if matches!(ty, fly_ir::Type::Bool) {
        let zext = llb.build_int_z_extend(value.into_int_value(), ctx.type_i8(), "bool.zext").expect("zext");
        llb.build_store(slot, zext).expect("store");
    } else {
        llb.build_store(slot, value).expect("store");
    }
}

fn alloca_local<'ll>(ctx: &Ctx<'ll>, llb: &Builder<'ll>, local: &Rc<LocalVar>, locals: &mut Locals<'ll>) {
    let slot = llb.build_alloca(ctx.store_type(&local.ty), "local.slot").expect("alloca");
    locals.slots.insert(local_key(local), slot);
}

/// Generates the real body of `main` under a hidden symbol
/// (`__fly_main_impl`) returning `i32` — `0` on the fall-through path; any
/// `fail` still runs through the normal early-return machinery against the
/// wrapper's error pointer, which `gen_main_wrapper` threads in.
fn gen_main_impl(ctx: &Ctx, function: &Rc<Function>) {
    let key = Rc::as_ptr(function) as usize;
    let fn_value = ctx.get_function(key).expect("main predeclared");
    let Some(body) = function.body.borrow().clone() else {
        return;
    };
    let entry = ctx.llcx.append_basic_block(fn_value, "entry");
    let llb = ctx.llcx.create_builder();
    llb.position_at_end(entry);

    // `main` has no caller-supplied error pointer; it allocates and zeroes
    // its own (`spec.md §4.9`), which every nested call threads onward.
    let error_slot = llb.build_alloca(ctx.ptr_ty, "error.slot").expect("alloca");
    let error_storage = llb.build_alloca(ctx.error_ty, "error.storage").expect("alloca");
    error_abi::zero_error(ctx, &llb, error_storage);
    llb.build_store(error_slot, error_storage).expect("store");

    let mut locals = Locals::new();
    for local in function.locals.borrow().iter() {
        alloca_local(ctx, &llb, local, &mut locals);
    }

    let mut lower = FnLower {
        ctx,
        llb: &llb,
        function: fn_value,
        locals: &mut locals,
        error_slot,
        return_ty: fly_ir::Type::Void,
        loop_stack: Vec::new(),
        handle_stack: Vec::new(),
        main_epilogue: Some(error_storage),
    };
    lower.lower_block(&body);
    lower.finish_fallthrough();
}

/// `main`'s emitted signature: parameterless, returns `i32`
/// (`spec.md §4.9`).
fn gen_main_wrapper(ctx: &Ctx, function: &Rc<Function>) {
    let inner_key = Rc::as_ptr(function) as usize;
    let inner = ctx.get_function(inner_key).expect("main impl declared");

    let wrapper_ty = ctx.type_i32().fn_type(&[], false);
    let wrapper = ctx.llmod.add_function("main", wrapper_ty, None);

    let entry = ctx.llcx.append_basic_block(wrapper, "entry");
    let llb = ctx.llcx.create_builder();
    llb.position_at_end(entry);
    let call = llb.build_call(inner, &[], "call.main_impl").expect("call");
    let ret = call.try_as_basic_value().left().expect("main impl returns i32");
    llb.build_return(Some(&ret)).expect("ret");
}
