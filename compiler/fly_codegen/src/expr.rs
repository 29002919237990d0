//! Expression lowering (`spec.md §4.7`).
//!
//! A resolved `Ref` is the uniform way to load "the value behind a name" —
//! a plain local/param reference, a namespaced global, or (via `Ref::parent`)
//! an implicit method-call receiver. [`ref_slot`] is the one place that
//! walks `RefTarget` to find where a value lives; everything else (`VarRef`
//! expressions, call receivers, assignment targets) goes through it.

use crate::context::Ctx;
use crate::error_abi;
use crate::functions::store_value;
use crate::stmt::FnLower;
use fly_ir::{BinaryOp, Expr, ExprKind, Fixity, MethodKind, Ref, RefTarget, Type, UnaryOp, Value, VarTarget};
use inkwell::values::{BasicValueEnum, PointerValue};
use inkwell::{FloatPredicate, IntPredicate};
use std::rc::Rc;

/// Where a resolved `Ref` keeps its value: an addressable memory slot, or
/// (for an enum entry, which has no backing storage) a value materialized
/// on the spot.
pub enum RefSlot<'ll> {
    Address(PointerValue<'ll>, Type),
    Direct(BasicValueEnum<'ll>),
}

/// Resolves a `Ref` chain down to where its value lives. Qualified access
/// (`r.parent.is_some()`) is always either a namespaced global (handled
/// entirely by the resolver, which already bound it to `VarTarget::Global`)
/// or a class-attribute access off a receiver `Ref` that must itself be
/// loaded first.
pub fn ref_slot<'ll>(fl: &mut FnLower<'_, 'll>, r: &Ref) -> RefSlot<'ll> {
    match r.def() {
        RefTarget::Var(VarTarget::Local(local)) => {
            let slot = fl.locals.slot_for_local(&local);
            RefSlot::Address(slot, local.ty.clone())
        }
        RefTarget::Var(VarTarget::Param(param)) => {
            let slot = fl.locals.slot_for_param(&param);
            RefSlot::Address(slot, param.ty.clone())
        }
        RefTarget::Var(VarTarget::Global(global)) => {
            let ptr = fl
                .ctx
                .globals
                .borrow()
                .get(&global.name)
                .expect("global predeclared")
                .as_pointer_value();
            RefSlot::Address(ptr, global.ty.clone())
        }
        RefTarget::Var(VarTarget::ClassAttribute(attr)) => {
            let parent = r.parent.as_ref().expect("attribute ref is always qualified");
            let receiver = load_ref(fl, parent).into_pointer_value();
            let owner = fl.ctx.attribute_owner_of(Rc::as_ptr(&attr) as usize);
            let classes = fl.ctx.classes.borrow();
            let layout = &classes[&owner];
            let idx = if layout.has_vtable_slot { attr.field_index + 1 } else { attr.field_index };
            let ptr = fl
                .llb
                .build_struct_gep(layout.struct_ty, receiver, idx, "attr.gep")
                .expect("gep");
            RefSlot::Address(ptr, attr.ty.clone())
        }
        RefTarget::Var(VarTarget::EnumEntry(entry)) => {
            RefSlot::Direct(fl.ctx.type_i32().const_int(u64::from(entry.ordinal), false).into())
        }
        RefTarget::Call(_) | RefTarget::Type(_) => unreachable!("a VarRef never resolves to a call/type target"),
    }
}

/// Loads the value a resolved `Ref` names, truncating a bool's `i8` memory
/// representation back down to `i1` (`spec.md §4.7`).
pub fn load_ref<'ll>(fl: &mut FnLower<'_, 'll>, r: &Ref) -> BasicValueEnum<'ll> {
    match ref_slot(fl, r) {
        RefSlot::Direct(v) => v,
        RefSlot::Address(ptr, ty) => {
            let raw = fl.llb.build_load(fl.ctx.store_type(&ty), ptr, "ref.load").expect("load");
            if matches!(ty, Type::Bool) {
                fl.llb
                    .build_int_truncate(raw.into_int_value(), fl.ctx.type_i1(), "bool.trunc")
                    .expect("trunc")
                    .into()
            } else {
                raw
            }
        }
    }
}

/// Lowers a literal `Value` directly at `ty`'s width — simpler than
/// recomputing a "natural width" for every leaf, since a literal's
/// magnitude is still on hand to materialize at whatever width the
/// resolver decided the expression needs (`spec.md §4.4` Expression typing).
pub fn lower_value_const<'ll>(ctx: &Ctx<'ll>, llb: &inkwell::builder::Builder<'ll>, value: &Value, ty: &Type) -> BasicValueEnum<'ll> {
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
        // A char literal resolves to an unsigned byte (DESIGN.md Open Question).
        Value::Char(c) => ctx.type_i8().const_int(u64::from(*c as u32), false).into(),
        Value::String(s) => llb.build_global_string_ptr(s, "str").expect("global string").as_pointer_value().into(),
        Value::Null => ctx.ptr_ty.const_null().into(),
        Value::Zero => crate::types::zero_value(ctx, ty),
        // Array/struct literals never appear in value position, only as a
        // default (DESIGN.md).
        Value::Array(_) | Value::Struct(_) => ctx.ptr_ty.const_null().into(),
    }
}

pub fn lower_expr<'ll>(fl: &mut FnLower<'_, 'll>, e: &Expr) -> BasicValueEnum<'ll> {
    match &e.kind {
        ExprKind::Value(v) => lower_value_const(fl.ctx, fl.llb, v, &e.ty()),
        ExprKind::VarRef(r) => load_ref(fl, r),
        ExprKind::Call { callee, args } => lower_call(fl, callee, args).unwrap_or_else(|| crate::types::zero_value(fl.ctx, &e.ty())),
        ExprKind::Unary { op, operand, fixity } => lower_unary(fl, *op, operand, *fixity),
        ExprKind::Binary { op, lhs, rhs } => lower_binary(fl, *op, lhs, rhs),
        ExprKind::Ternary { cond, then_branch, else_branch } => lower_ternary(fl, cond, then_branch, else_branch),
    }
}

/// Widens a narrower-than-`to` operand (`spec.md §4.7`: "an `sext`/`zext`
/// is inserted" for ints, `fpext`/`fptrunc` for floats), or converts an
/// `Error` operand to whichever of `Bool`/integer/`String` it's being
/// assigned into (`spec.md §4.3`: `Error` converts to any of the three).
/// Only ever called on leaf values whose *natural* width/type can differ
/// from the node's final, possibly-promoted `ty()`; a `Binary`/`Unary`
/// node's own value is already at its final width by construction, so
/// callers only invoke this for `VarRef`/`Call` operands.
fn widen<'ll>(fl: &FnLower<'_, 'll>, value: BasicValueEnum<'ll>, from: &Type, to: &Type) -> BasicValueEnum<'ll> {
    match (from, to) {
        (Type::Int { signed, .. }, Type::Int { .. }) => {
            let iv = value.into_int_value();
            let target = fl.ctx.value_type(to).into_int_type();
            if iv.get_type().get_bit_width() == target.get_bit_width() {
                iv.into()
            } else if *signed {
                fl.llb.build_int_s_extend(iv, target, "sext").expect("sext").into()
            } else {
                fl.llb.build_int_z_extend(iv, target, "zext").expect("zext").into()
            }
        }
        (Type::Float(_), Type::Float(_)) => {
            let fv = value.into_float_value();
            let target = fl.ctx.value_type(to).into_float_type();
            fl.llb.build_float_ext(fv, target, "fpext").expect("fpext").into()
        }
        (Type::Error, Type::Bool) => error_abi::kind_to_bool(fl.ctx, fl.llb, value.into_int_value()).into(),
        (Type::Error, Type::Int { .. }) => error_abi::kind_to_int(fl.ctx, fl.llb, value.into_int_value(), to),
        (Type::Error, Type::String) => error_abi::kind_to_string(fl.ctx, fl.llb, value.into_int_value()),
        _ => value,
    }
}

/// Lowers a condition expression to the `i1` a branch instruction needs —
/// the one place that has to know a `Bool`-typed condition already loaded
/// as `i1` (`load_ref`'s truncation) while an `Error`-typed one (a `handle`
/// block's aliased error variable, used directly as a condition per
/// `spec.md §4.3`) is still the raw `i8` kind byte and needs the same
/// `icmp ne 0` `lower_if`/`lower_loop`/`main`'s epilogue all use.
pub(crate) fn lower_condition<'ll>(fl: &mut FnLower<'_, 'll>, e: &Expr) -> inkwell::values::IntValue<'ll> {
    let value = lower_expr(fl, e);
    match e.ty() {
        Type::Error => error_abi::kind_to_bool(fl.ctx, fl.llb, value.into_int_value()),
        _ => value.into_int_value(),
    }
}

/// Lowers an operand then widens it to `target_ty` if its own declared
/// type is narrower (`spec.md §4.7`).
pub(crate) fn lower_operand<'ll>(fl: &mut FnLower<'_, 'll>, e: &Expr, target_ty: &Type) -> BasicValueEnum<'ll> {
    let value = lower_expr(fl, e);
    let from = match &e.kind {
        ExprKind::VarRef(r) => match r.def() {
            RefTarget::Var(VarTarget::Local(l)) => l.ty.clone(),
            RefTarget::Var(VarTarget::Param(p)) => p.ty.clone(),
            RefTarget::Var(VarTarget::Global(g)) => g.ty.clone(),
            RefTarget::Var(VarTarget::ClassAttribute(a)) => a.ty.clone(),
            _ => target_ty.clone(),
        },
        ExprKind::Call { callee, .. } => match callee.def() {
            RefTarget::Call(fly_ir::CallTarget::Function(f)) => f.return_ty.clone(),
            RefTarget::Call(fly_ir::CallTarget::Method(m)) => m.return_ty.clone(),
            _ => target_ty.clone(),
        },
        _ => target_ty.clone(),
    };
    widen(fl, value, &from, target_ty)
}

fn lower_unary<'ll>(fl: &mut FnLower<'_, 'll>, op: UnaryOp, operand: &Expr, fixity: Fixity) -> BasicValueEnum<'ll> {
    match op {
        UnaryOp::Not => {
            let v = lower_expr(fl, operand).into_int_value();
            fl.llb.build_not(v, "not").expect("not").into()
        }
        UnaryOp::Neg => {
            let v = lower_expr(fl, operand);
            if operand.ty().is_floating() {
                fl.llb.build_float_neg(v.into_float_value(), "fneg").expect("fneg").into()
            } else {
                fl.llb.build_int_neg(v.into_int_value(), "neg").expect("neg").into()
            }
        }
        UnaryOp::Incr | UnaryOp::Decr => lower_incr_decr(fl, op, operand, fixity),
    }
}

fn lower_incr_decr<'ll>(fl: &mut FnLower<'_, 'll>, op: UnaryOp, operand: &Expr, fixity: Fixity) -> BasicValueEnum<'ll> {
    let ExprKind::VarRef(r) = &operand.kind else {
        unreachable!("++/-- operand is always an assignable VarRef");
    };
    let (ptr, ty) = match ref_slot(fl, r) {
        RefSlot::Address(ptr, ty) => (ptr, ty),
        RefSlot::Direct(_) => unreachable!("enum entries are not assignable"),
    };
    let old = load_ref(fl, r);
    let one = fl.ctx.value_type(&ty).into_int_type().const_int(1, false);
    let iv = old.into_int_value();
    let new = if op == UnaryOp::Incr {
        fl.llb.build_int_add(iv, one, "incr").expect("add")
    } else {
        fl.llb.build_int_sub(iv, one, "decr").expect("sub")
    };
    store_value(fl.ctx, fl.llb, ptr, &ty, new.into());
    if fixity == Fixity::Prefix {
        new.into()
    } else {
        old
    }
}

fn lower_binary<'ll>(fl: &mut FnLower<'_, 'll>, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> BasicValueEnum<'ll> {
    if op.is_short_circuit() {
        return lower_short_circuit(fl, op, lhs, rhs);
    }
    // For a comparison, `lhs`/`rhs` were promoted to a shared comparison
    // type by the resolver but the binary's own `ty()` stays `Bool`; for
    // arithmetic, the resolver already rewrote both operands (and this
    // node) to the common type, so `lhs.ty()`/`rhs.ty()` already agree and
    // either one names it.
    let operand_ty = if op.is_comparison() { lhs.ty().max(rhs.ty()) } else { lhs.ty() };
    let l = lower_operand(fl, lhs, &operand_ty);
    let r = lower_operand(fl, rhs, &operand_ty);

    if op.is_comparison() {
        return lower_comparison(fl, op, l, r, &operand_ty);
    }
    lower_arithmetic(fl, op, l, r, &operand_ty)
}

/// Orders two numeric types by width so arithmetic promotion always widens
/// toward the larger one (`spec.md §4.7`).
trait Widest {
    fn max(self, other: Self) -> Self;
}
impl Widest for Type {
    fn max(self, other: Self) -> Self {
        match (&self, &other) {
            (Type::Float(a), Type::Float(b)) => {
                if a.bits() >= b.bits() {
                    self
                } else {
                    other
                }
            }
            (Type::Float(_), _) => self,
            (_, Type::Float(_)) => other,
            (Type::Int { bits: a, .. }, Type::Int { bits: b, .. }) => {
                if a.bits() >= b.bits() {
                    self
                } else {
                    other
                }
            }
            _ => self,
        }
    }
}

pub(crate) fn lower_arithmetic<'ll>(fl: &mut FnLower<'_, 'll>, op: BinaryOp, l: BasicValueEnum<'ll>, r: BasicValueEnum<'ll>, ty: &Type) -> BasicValueEnum<'ll> {
    if ty.is_floating() {
        let (lf, rf) = (l.into_float_value(), r.into_float_value());
        match op {
            BinaryOp::Add => fl.llb.build_float_add(lf, rf, "fadd").expect("fadd").into(),
            BinaryOp::Sub => fl.llb.build_float_sub(lf, rf, "fsub").expect("fsub").into(),
            BinaryOp::Mul => fl.llb.build_float_mul(lf, rf, "fmul").expect("fmul").into(),
            BinaryOp::Div => fl.llb.build_float_div(lf, rf, "fdiv").expect("fdiv").into(),
            BinaryOp::Rem => fl.llb.build_float_rem(lf, rf, "frem").expect("frem").into(),
            _ => unreachable!("only arithmetic ops reach lower_arithmetic"),
        }
    } else {
        let signed = matches!(ty, Type::Int { signed: true, .. });
        let (li, ri) = (l.into_int_value(), r.into_int_value());
        match op {
            BinaryOp::Add => fl.llb.build_int_add(li, ri, "add").expect("add").into(),
            BinaryOp::Sub => fl.llb.build_int_sub(li, ri, "sub").expect("sub").into(),
            BinaryOp::Mul => fl.llb.build_int_mul(li, ri, "mul").expect("mul").into(),
            BinaryOp::Div if signed => fl.llb.build_int_signed_div(li, ri, "sdiv").expect("sdiv").into(),
            BinaryOp::Div => fl.llb.build_int_unsigned_div(li, ri, "udiv").expect("udiv").into(),
            BinaryOp::Rem if signed => fl.llb.build_int_signed_rem(li, ri, "srem").expect("srem").into(),
            BinaryOp::Rem => fl.llb.build_int_unsigned_rem(li, ri, "urem").expect("urem").into(),
            _ => unreachable!("only arithmetic ops reach lower_arithmetic"),
        }
    }
}

fn lower_comparison<'ll>(fl: &mut FnLower<'_, 'll>, op: BinaryOp, l: BasicValueEnum<'ll>, r: BasicValueEnum<'ll>, ty: &Type) -> BasicValueEnum<'ll> {
    if ty.is_floating() {
        let pred = match op {
            BinaryOp::Eq => FloatPredicate::OEQ,
            BinaryOp::Ne => FloatPredicate::ONE,
            BinaryOp::Lt => FloatPredicate::OLT,
            BinaryOp::Le => FloatPredicate::OLE,
            BinaryOp::Gt => FloatPredicate::OGT,
            BinaryOp::Ge => FloatPredicate::OGE,
            _ => unreachable!("only comparisons reach lower_comparison"),
        };
        fl.llb
            .build_float_compare(pred, l.into_float_value(), r.into_float_value(), "fcmp")
            .expect("fcmp")
            .into()
    } else {
        let signed = matches!(ty, Type::Int { signed: true, .. }) || matches!(ty, Type::Identity(_));
        let pred = match (op, signed) {
            (BinaryOp::Eq, _) => IntPredicate::EQ,
            (BinaryOp::Ne, _) => IntPredicate::NE,
            (BinaryOp::Lt, true) => IntPredicate::SLT,
            (BinaryOp::Lt, false) => IntPredicate::ULT,
            (BinaryOp::Le, true) => IntPredicate::SLE,
            (BinaryOp::Le, false) => IntPredicate::ULE,
            (BinaryOp::Gt, true) => IntPredicate::SGT,
            (BinaryOp::Gt, false) => IntPredicate::UGT,
            (BinaryOp::Ge, true) => IntPredicate::SGE,
            (BinaryOp::Ge, false) => IntPredicate::UGE,
            _ => unreachable!("only comparisons reach lower_comparison"),
        };
        fl.llb
            .build_int_compare(pred, l.into_int_value(), r.into_int_value(), "icmp")
            .expect("icmp")
            .into()
    }
}

/// `&&`/`||` and ternary share the two-block-diamond-with-`phi` shape
/// (`spec.md §4.7`: "ternary emits the same shape") — deliberately not
/// `select`, even though it is available and used elsewhere, because the
/// short-circuit operand must not be evaluated unconditionally.
fn lower_short_circuit<'ll>(fl: &mut FnLower<'_, 'll>, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> BasicValueEnum<'ll> {
    let lv = lower_expr(fl, lhs).into_int_value();
    let entry_block = fl.llb.get_insert_block().expect("positioned");
    let rhs_block = fl.ctx.llcx.append_basic_block(fl.function, "sc.rhs");
    let end_block = fl.ctx.llcx.append_basic_block(fl.function, "sc.end");

    if op == BinaryOp::And {
        fl.llb.build_conditional_branch(lv, rhs_block, end_block).expect("br");
    } else {
        fl.llb.build_conditional_branch(lv, end_block, rhs_block).expect("br");
    }

    fl.llb.position_at_end(rhs_block);
    let rv = lower_expr(fl, rhs).into_int_value();
    let rhs_block = fl.llb.get_insert_block().expect("positioned");
    fl.llb.build_unconditional_branch(end_block).expect("br");

    fl.llb.position_at_end(end_block);
    let phi = fl.llb.build_phi(fl.ctx.type_i1(), "sc.phi").expect("phi");
    phi.add_incoming(&[(&lv, entry_block), (&rv, rhs_block)]);
    phi.as_basic_value()
}

fn lower_ternary<'ll>(fl: &mut FnLower<'_, 'll>, cond: &Expr, then_branch: &Expr, else_branch: &Expr) -> BasicValueEnum<'ll> {
    let cv = lower_condition(fl, cond);
    let then_block = fl.ctx.llcx.append_basic_block(fl.function, "ternary.then");
    let else_block = fl.ctx.llcx.append_basic_block(fl.function, "ternary.else");
    let end_block = fl.ctx.llcx.append_basic_block(fl.function, "ternary.end");
    fl.llb.build_conditional_branch(cv, then_block, else_block).expect("br");

    let result_ty = then_branch.ty();
    fl.llb.position_at_end(then_block);
    let tv = lower_operand(fl, then_branch, &result_ty);
    let then_block = fl.llb.get_insert_block().expect("positioned");
    fl.llb.build_unconditional_branch(end_block).expect("br");

    fl.llb.position_at_end(else_block);
    let ev = lower_operand(fl, else_branch, &result_ty);
    let else_block = fl.llb.get_insert_block().expect("positioned");
    fl.llb.build_unconditional_branch(end_block).expect("br");

    fl.llb.position_at_end(end_block);
    let phi = fl.llb.build_phi(fl.ctx.value_type(&result_ty), "ternary.phi").expect("phi");
    phi.add_incoming(&[(&tv, then_block), (&ev, else_block)]);
    phi.as_basic_value()
}

/// `new T(...)` has no dedicated AST node: it is an ordinary `Call` whose
/// callee resolves to a constructor with no receiver `Ref` (a real method
/// call's callee always has `parent: Some(..)`; a constructor reached via
/// the class-name-priority heuristic never does). Lowers to `malloc(sizeof
/// T)` + `T_T(%error*, %T*, args...)` + the pointer (`spec.md §4.7` Object
/// creation).
fn lower_call<'ll>(fl: &mut FnLower<'_, 'll>, callee: &Rc<Ref>, args: &[Expr]) -> Option<BasicValueEnum<'ll>> {
    match callee.def() {
        RefTarget::Call(fly_ir::CallTarget::Function(f)) => {
            let key = Rc::as_ptr(&f) as usize;
            let fn_value = fl.ctx.get_function(key).expect("function predeclared");
            let error_ptr = fl.llb.build_load(fl.ctx.ptr_ty, fl.error_slot, "error.load").expect("load");
            let mut llargs = vec![error_ptr.into()];
            for (arg, param) in args.iter().zip(f.user_params()) {
                llargs.push(lower_operand(fl, arg, &param.ty).into());
            }
            fl.llb.build_call(fn_value, &llargs, "call").expect("call").try_as_basic_value().left()
        }
        RefTarget::Call(fly_ir::CallTarget::Method(m)) if m.kind == MethodKind::Constructor && callee.parent.is_none() => {
            lower_constructor_call(fl, &m, args)
        }
        RefTarget::Call(fly_ir::CallTarget::Method(m)) => lower_method_call(fl, callee, &m, args),
        RefTarget::Var(_) | RefTarget::Type(_) => unreachable!("a Call callee always resolves to a Function/Method"),
    }
}

fn lower_constructor_call<'ll>(fl: &mut FnLower<'_, 'll>, ctor: &Rc<fly_ir::ClassMethod>, args: &[Expr]) -> Option<BasicValueEnum<'ll>> {
    let key = Rc::as_ptr(ctor) as usize;
    let fn_value = fl.ctx.get_function(key).expect("constructor predeclared");
    let owner = fl.ctx.method_owner_of(key);
    let struct_ty = fl.ctx.classes.borrow()[&owner].struct_ty;

    let malloc = fl.ctx.llmod.get_function("malloc").expect("malloc declared");
    let size = struct_ty.size_of().expect("sized struct");
    let raw = fl
        .llb
        .build_call(malloc, &[size.into()], "call.malloc")
        .expect("call")
        .try_as_basic_value()
        .left()
        .expect("malloc returns a pointer");

    let error_ptr = fl.llb.build_load(fl.ctx.ptr_ty, fl.error_slot, "error.load").expect("load");
    let mut llargs = vec![error_ptr.into(), raw.into()];
    for (arg, param) in args.iter().zip(ctor.user_params()) {
        llargs.push(lower_operand(fl, arg, &param.ty).into());
    }
    fl.llb.build_call(fn_value, &llargs, "call.ctor").expect("call");
    Some(raw)
}

/// Any other call on a `ClassMethod` is an instance/static method call; the
/// receiver, when present, is `callee.parent` — a `Ref` chain, not a nested
/// `Expr` (`spec.md §4.4` pass 2 resolves it as part of the same walk that
/// resolved `callee` itself). Direct dispatch: the concrete symbol is
/// called, never the vtable slot (`spec.md §4.8`).
fn lower_method_call<'ll>(fl: &mut FnLower<'_, 'll>, callee: &Ref, m: &Rc<fly_ir::ClassMethod>, args: &[Expr]) -> Option<BasicValueEnum<'ll>> {
    let key = Rc::as_ptr(m) as usize;
    let fn_value = fl.ctx.get_function(key).expect("method predeclared");
    let error_ptr = fl.llb.build_load(fl.ctx.ptr_ty, fl.error_slot, "error.load").expect("load");
    let mut llargs = vec![error_ptr.into()];
    if m.kind == MethodKind::Instance {
        let parent = callee.parent.as_ref().expect("instance method call has a receiver");
        let receiver = load_ref(fl, parent);
        llargs.push(receiver.into());
    }
    for (arg, param) in args.iter().zip(m.user_params()) {
        llargs.push(lower_operand(fl, arg, &param.ty).into());
    }
    fl.llb.build_call(fn_value, &llargs, "call.method").expect("call").try_as_basic_value().left()
}

/// `delete x` (`spec.md §4.7`): `free`s the receiver. Opaque pointers mean
/// there's no `bitcast i8*` instruction to emit — the pointer is already
/// untyped by the time it reaches `free`.
pub fn lower_delete(fl: &mut FnLower, target: &Ref) {
    let ptr = load_ref(fl, target).into_pointer_value();
    let free = fl.ctx.llmod.get_function("free").expect("free declared");
    fl.llb.build_call(free, &[ptr.into()], "call.free").expect("call");
}
