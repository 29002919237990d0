//! Statement lowering (`spec.md §4.7` Statements).
//!
//! [`FnLower`] carries the per-function state a statement sequence needs:
//! the active loop's break/continue targets, the active `handle` block's
//! `safe` continuation, and (for `main`'s hidden body only) the error
//! storage the final epilogue reads.

use crate::context::Ctx;
use crate::error_abi;
use crate::expr;
use crate::functions::{local_key, Locals};
use fly_ir::{
    Block, Expr, HandleStmt, IfStmt, LoopInStmt, LoopStmt, Ref, Stmt, StmtKind, SwitchStmt, Type,
};
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::values::{FunctionValue, PointerValue};
use inkwell::IntPredicate;
use std::rc::Rc;

/// A loop's `continue`/`break` targets: `continue` always goes through the
/// post block, even for a `while` with no post statement, so the four-label
/// shape (`spec.md §4.7`) stays uniform across `while`, `for`, and `loop-in`.
pub struct LoopLabels<'ll> {
    post: BasicBlock<'ll>,
    end: BasicBlock<'ll>,
}

/// An active `handle` block's `safe` continuation (`spec.md §4.9`).
pub struct HandleFrame<'ll> {
    safe_block: BasicBlock<'ll>,
}

pub struct FnLower<'a, 'll> {
    pub ctx: &'a Ctx<'ll>,
    pub llb: &'a Builder<'ll>,
    pub function: FunctionValue<'ll>,
    pub locals: &'a mut Locals<'ll>,
    pub error_slot: PointerValue<'ll>,
    pub return_ty: Type,
    pub loop_stack: Vec<LoopLabels<'ll>>,
    pub handle_stack: Vec<HandleFrame<'ll>>,
    /// `Some(error_storage)` only while lowering `__fly_main_impl`'s body —
    /// every exit (fall-through, `return;`, unhandled `fail`) must route
    /// through [`error_abi::emit_main_epilogue`] instead of a plain `ret`,
    /// since `main`'s own LLVM signature returns `i32`, not the `Void` its
    /// source-level return type carries.
    pub main_epilogue: Option<PointerValue<'ll>>,
}

impl<'a, 'll> FnLower<'a, 'll> {
    pub fn lower_block(&mut self, block: &Rc<Block>) {
        for stmt in block.stmts.borrow().iter() {
            if !self.current_block_needs_terminator() {
                break;
            }
            lower_stmt(self, stmt);
        }
    }

    #[must_use]
    pub fn current_block_needs_terminator(&self) -> bool {
        self.llb.get_insert_block().expect("positioned").get_terminator().is_none()
    }

    /// Closes off whatever block lowering left open at the end of a
    /// function/constructor/method body — a plain fall-through past the
    /// last statement needs the same default-return/epilogue treatment as
    /// an explicit bare `return;` would have (`spec.md §4.9`).
    pub fn finish_fallthrough(&mut self) {
        if !self.current_block_needs_terminator() {
            return;
        }
        if let Some(storage) = self.main_epilogue {
            error_abi::emit_main_epilogue(self.ctx, self.llb, storage);
            return;
        }
        let default = error_abi::default_return_value(self.ctx, &self.return_ty.clone());
        self.llb.build_return(default.as_ref()).expect("ret");
    }
}

fn append<'ll>(fl: &FnLower<'_, 'll>, name: &str) -> BasicBlock<'ll> {
    fl.ctx.llcx.append_basic_block(fl.function, name)
}

fn block_terminated(llb: &Builder) -> bool {
    llb.get_insert_block().expect("positioned").get_terminator().is_some()
}

fn lower_stmt(fl: &mut FnLower, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Block(b) => fl.lower_block(b),
        StmtKind::Expr(e) => {
            expr::lower_expr(fl, e);
        }
        StmtKind::VarDecl { local, init } => {
            let slot = fl.locals.slot_for_local(local);
            let value = match init {
                Some(e) => expr::lower_operand(fl, e, &local.ty),
                None => crate::types::zero_value(fl.ctx, &local.ty),
            };
            crate::functions::store_value(fl.ctx, fl.llb, slot, &local.ty, value);
        }
        StmtKind::Assignment { target, op, value } => lower_assignment(fl, target, *op, value),
        StmtKind::Return(expr_opt) => lower_return(fl, expr_opt.as_ref()),
        StmtKind::Break => {
            let target = fl.loop_stack.last().expect("break only resolves inside a loop").end;
            fl.llb.build_unconditional_branch(target).expect("br");
        }
        StmtKind::Continue => {
            let target = fl.loop_stack.last().expect("continue only resolves inside a loop").post;
            fl.llb.build_unconditional_branch(target).expect("br");
        }
        StmtKind::If(s) => lower_if(fl, s),
        StmtKind::Switch(s) => lower_switch(fl, s),
        StmtKind::Loop(s) => lower_loop(fl, s),
        StmtKind::LoopIn(s) => lower_loop_in(fl, s),
        StmtKind::Handle(s) => lower_handle(fl, s),
        StmtKind::Fail(expr_opt) => lower_fail(fl, expr_opt.as_ref()),
        StmtKind::Delete(target) => expr::lower_delete(fl, target),
    }
}

fn lower_assignment(fl: &mut FnLower, target: &Rc<Ref>, op: fly_ir::AssignOp, value: &Expr) {
    let (ptr, ty) = match expr::ref_slot(fl, target) {
        expr::RefSlot::Address(ptr, ty) => (ptr, ty),
        expr::RefSlot::Direct(_) => unreachable!("an enum entry is never an assignment target"),
    };
    let rhs = expr::lower_operand(fl, value, &ty);
    let new_value = if op.is_compound() {
        let current = expr::load_ref(fl, target);
        let bin_op = match op {
            fly_ir::AssignOp::AddAssign => fly_ir::BinaryOp::Add,
            fly_ir::AssignOp::SubAssign => fly_ir::BinaryOp::Sub,
            fly_ir::AssignOp::MulAssign => fly_ir::BinaryOp::Mul,
            fly_ir::AssignOp::DivAssign => fly_ir::BinaryOp::Div,
            fly_ir::AssignOp::RemAssign => fly_ir::BinaryOp::Rem,
            fly_ir::AssignOp::Assign => unreachable!("is_compound() excludes plain Assign"),
        };
        expr::lower_arithmetic(fl, bin_op, current, rhs, &ty)
    } else {
        rhs
    };
    crate::functions::store_value(fl.ctx, fl.llb, ptr, &ty, new_value);
}

fn lower_return(fl: &mut FnLower, expr_opt: Option<&Expr>) {
    if let Some(storage) = fl.main_epilogue {
        error_abi::emit_main_epilogue(fl.ctx, fl.llb, storage);
        return;
    }
    match expr_opt {
        Some(e) => {
            let return_ty = fl.return_ty.clone();
            let value = expr::lower_operand(fl, e, &return_ty);
            fl.llb.build_return(Some(&value)).expect("ret");
        }
        None => {
            fl.llb.build_return(None).expect("ret");
        }
    }
}

/// `if`/`elsif`/`else` chain: each arm's condition is evaluated in the block
/// reached by falling off the previous arm's condition (`elsif`), its body
/// runs in a dedicated `ifthen`/`elsifthen` block, and every body branches
/// to the shared `endif` (`spec.md §4.7`).
fn lower_if(fl: &mut FnLower, s: &IfStmt) {
    let end_block = append(fl, "endif");
    let arm_count = s.arms.len();
    for (i, arm) in s.arms.iter().enumerate() {
        let cond = expr::lower_condition(fl, &arm.cond);
        let then_block = append(fl, if i == 0 { "ifthen" } else { "elsifthen" });
        let is_last = i + 1 == arm_count;
        let next_block = if is_last {
            if s.else_block.is_some() {
                append(fl, "ifelse")
            } else {
                end_block
            }
        } else {
            append(fl, "elsif")
        };
        fl.llb.build_conditional_branch(cond, then_block, next_block).expect("br");

        fl.llb.position_at_end(then_block);
        fl.lower_block(&arm.then);
        if !block_terminated(fl.llb) {
            fl.llb.build_unconditional_branch(end_block).expect("br");
        }
        fl.llb.position_at_end(next_block);
    }
    if let Some(else_block) = &s.else_block {
        fl.lower_block(else_block);
        if !block_terminated(fl.llb) {
            fl.llb.build_unconditional_branch(end_block).expect("br");
        }
    }
    fl.llb.position_at_end(end_block);
}

/// Sequential equality chain against the scrutinee (`spec.md §4.7`); a
/// switch with no default falls through to `endswitch` on a non-match.
fn lower_switch(fl: &mut FnLower, s: &SwitchStmt) {
    let end_block = append(fl, "endswitch");
    if s.cases.is_empty() {
        if let Some(default) = &s.default {
            fl.lower_block(default);
        }
        if !block_terminated(fl.llb) {
            fl.llb.build_unconditional_branch(end_block).expect("br");
        }
        fl.llb.position_at_end(end_block);
        return;
    }

    let scrutinee_ty = s.scrutinee.ty();
    let scrutinee_val = expr::lower_expr(fl, &s.scrutinee);
    let case_count = s.cases.len();
    for (i, case) in s.cases.iter().enumerate() {
        let case_val = expr::lower_operand(fl, &case.value, &scrutinee_ty);
        let eq = lower_eq(fl, scrutinee_val, case_val, &scrutinee_ty);
        let case_block = append(fl, "switchcase");
        let is_last = i + 1 == case_count;
        let next_block = if is_last {
            if s.default.is_some() {
                append(fl, "switchdefault")
            } else {
                end_block
            }
        } else {
            append(fl, "switchnext")
        };
        fl.llb.build_conditional_branch(eq, case_block, next_block).expect("br");

        fl.llb.position_at_end(case_block);
        fl.lower_block(&case.body);
        if !block_terminated(fl.llb) {
            fl.llb.build_unconditional_branch(end_block).expect("br");
        }
        fl.llb.position_at_end(next_block);
    }
    if let Some(default) = &s.default {
        fl.lower_block(default);
        if !block_terminated(fl.llb) {
            fl.llb.build_unconditional_branch(end_block).expect("br");
        }
    }
    fl.llb.position_at_end(end_block);
}

fn lower_eq<'ll>(fl: &FnLower<'_, 'll>, a: inkwell::values::BasicValueEnum<'ll>, b: inkwell::values::BasicValueEnum<'ll>, ty: &Type) -> inkwell::values::IntValue<'ll> {
    if ty.is_floating() {
        fl.llb
            .build_float_compare(inkwell::FloatPredicate::OEQ, a.into_float_value(), b.into_float_value(), "switch.eq")
            .expect("fcmp")
    } else {
        fl.llb
            .build_int_compare(IntPredicate::EQ, a.into_int_value(), b.into_int_value(), "switch.eq")
            .expect("icmp")
    }
}

/// `while`/`for` (`spec.md §4.7`): four labels, always in the same order;
/// `while` simply has no `init`/`post` statement to run.
fn lower_loop(fl: &mut FnLower, s: &LoopStmt) {
    if let Some(init) = &s.init {
        lower_stmt(fl, init);
    }
    let cond_block = append(fl, "loopcond");
    let body_block = append(fl, "loop");
    let post_block = append(fl, "looppost");
    let end_block = append(fl, "loopend");
    fl.llb.build_unconditional_branch(cond_block).expect("br");

    fl.llb.position_at_end(cond_block);
    match &s.cond {
        Some(cond) => {
            let cv = expr::lower_condition(fl, cond);
            fl.llb.build_conditional_branch(cv, body_block, end_block).expect("br");
        }
        None => {
            fl.llb.build_unconditional_branch(body_block).expect("br");
        }
    }

    fl.llb.position_at_end(body_block);
    fl.loop_stack.push(LoopLabels { post: post_block, end: end_block });
    fl.lower_block(&s.body);
    fl.loop_stack.pop();
    if !block_terminated(fl.llb) {
        fl.llb.build_unconditional_branch(post_block).expect("br");
    }

    fl.llb.position_at_end(post_block);
    if let Some(post) = &s.post {
        lower_stmt(fl, post);
    }
    if !block_terminated(fl.llb) {
        fl.llb.build_unconditional_branch(cond_block).expect("br");
    }

    fl.llb.position_at_end(end_block);
}

/// `loop-in` over a fixed-size array (`spec.md §4.1`: `Array { elem, size }`).
/// A dynamically-sized iterable is rejected during resolution
/// (`ErrorCode::LOOP_IN_DYNAMIC_ARRAY`, DESIGN.md) — it carries no runtime
/// length to iterate against, so it never reaches codegen.
fn lower_loop_in(fl: &mut FnLower, s: &LoopInStmt) {
    let Type::Array { elem, size: Some(len) } = s.iterable.ty() else {
        unreachable!("loop-in over a dynamically-sized array is rejected during resolution");
    };
    let base = expr::lower_expr(fl, &s.iterable).into_pointer_value();
    let elem_llty = fl.ctx.store_type(&elem);
    let var_slot = fl.locals.slot_for_local(&s.var);

    let cond_block = append(fl, "loopcond");
    let body_block = append(fl, "loop");
    let post_block = append(fl, "looppost");
    let end_block = append(fl, "loopend");

    let idx_slot = fl.llb.build_alloca(fl.ctx.type_i64(), "loopin.idx").expect("alloca");
    fl.llb.build_store(idx_slot, fl.ctx.type_i64().const_int(0, false)).expect("store");
    fl.llb.build_unconditional_branch(cond_block).expect("br");

    fl.llb.position_at_end(cond_block);
    let idx = fl.llb.build_load(fl.ctx.type_i64(), idx_slot, "loopin.idx.load").expect("load").into_int_value();
    let limit = fl.ctx.type_i64().const_int(len, false);
    let more = fl.llb.build_int_compare(IntPredicate::ULT, idx, limit, "loopin.more").expect("icmp");
    fl.llb.build_conditional_branch(more, body_block, end_block).expect("br");

    fl.llb.position_at_end(body_block);
    let elem_ptr = unsafe { fl.llb.build_gep(elem_llty, base, &[idx], "loopin.elem") }.expect("gep");
    let loaded = fl.llb.build_load(elem_llty, elem_ptr, "loopin.elem.load").expect("load");
    crate::functions::store_value(fl.ctx, fl.llb, var_slot, &elem, loaded);
    fl.loop_stack.push(LoopLabels { post: post_block, end: end_block });
    fl.lower_block(&s.body);
    fl.loop_stack.pop();
    if !block_terminated(fl.llb) {
        fl.llb.build_unconditional_branch(post_block).expect("br");
    }

    fl.llb.position_at_end(post_block);
    let next = fl.llb.build_int_add(idx, fl.ctx.type_i64().const_int(1, false), "loopin.next").expect("add");
    fl.llb.build_store(idx_slot, next).expect("store");
    if !block_terminated(fl.llb) {
        fl.llb.build_unconditional_branch(cond_block).expect("br");
    }

    fl.llb.position_at_end(end_block);
}

/// `handle { ... }` (`spec.md §4.9`): any `fail` reached while this block is
/// active branches to `safe` instead of returning; the optional error
/// variable aliases the function's own error pointer rather than getting a
/// fresh slot, so reading it afterward sees whatever `fail` just wrote.
fn lower_handle(fl: &mut FnLower, s: &HandleStmt) {
    let safe_block = append(fl, "handlesafe");
    if let Some(var) = &s.error_var {
        let error_ptr = fl.llb.build_load(fl.ctx.ptr_ty, fl.error_slot, "error.load").expect("load").into_pointer_value();
        let kind_ptr = fl.llb.build_struct_gep(fl.ctx.error_ty, error_ptr, 0, "error.kind_ptr").expect("gep");
        fl.locals.slots.insert(local_key(var), kind_ptr);
    }
    fl.handle_stack.push(HandleFrame { safe_block });
    fl.lower_block(&s.body);
    fl.handle_stack.pop();
    if !block_terminated(fl.llb) {
        fl.llb.build_unconditional_branch(safe_block).expect("br");
    }
    fl.llb.position_at_end(safe_block);
}

/// `fail` (`spec.md §4.9`): writes the error payload, then either branches
/// to the innermost active `handle`'s `safe` block or exits the function
/// with its default return value (through the `main` epilogue when
/// applicable, same as a bare `return;`).
fn lower_fail(fl: &mut FnLower, expr_opt: Option<&Expr>) {
    let error_ptr = fl.llb.build_load(fl.ctx.ptr_ty, fl.error_slot, "error.load").expect("load").into_pointer_value();
    let payload = expr_opt.map(|e| (e.ty(), expr::lower_expr(fl, e)));
    error_abi::store_fail_payload(fl.ctx, fl.llb, error_ptr, payload);

    if let Some(frame) = fl.handle_stack.last() {
        fl.llb.build_unconditional_branch(frame.safe_block).expect("br");
    } else if let Some(storage) = fl.main_epilogue {
        error_abi::emit_main_epilogue(fl.ctx, fl.llb, storage);
    } else {
        let default = error_abi::default_return_value(fl.ctx, &fl.return_ty.clone());
        fl.llb.build_return(default.as_ref()).expect("ret");
    }
}
