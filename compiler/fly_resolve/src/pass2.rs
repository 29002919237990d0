//! Pass 2 — bodies (`spec.md §4.4`).
//!
//! Walks every function/method body once, resolving every `Ref` it contains
//! and assigning every `Expr` a type as it goes (the two are interleaved
//! rather than separate passes: a `VarRef`'s type falls straight out of the
//! declaration it binds to, so there is nothing to gain by revisiting it).

use crate::pass1::find_identity;
use fly_diagnostic::{DiagnosticQueue, ErrorCode};
use fly_ir::{
    Block, CallTarget, ClassAttribute, ClassDecl, ClassMethod, Expr, ExprKind, FloatBits, Function,
    IdentityDef, IntBits, Module, Name, Ref, RefTarget, Span, StmtKind, Type, UnaryOp, Value,
    VarTarget, Visibility,
};
use fly_sema::symbols::{GlobalRegistry, Overloadable};
use fly_sema::validate;
use std::rc::Rc;

pub fn run(modules: &[Rc<Module>], registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    for module in modules {
        for function in module.functions.borrow().iter() {
            resolve_function(function, module, registry, diagnostics);
        }
        for class in module.classes.borrow().iter() {
            for ctor in class.constructors.borrow().iter() {
                resolve_method(ctor, module, registry, diagnostics);
            }
            for method in class.methods.borrow().iter() {
                resolve_method(method, module, registry, diagnostics);
            }
        }
    }
}

/// Everything a body walk needs about its enclosing callable, bundled so
/// helper functions don't grow an ever-longer parameter list.
struct FnContext<'a> {
    module: &'a Rc<Module>,
    registry: &'a GlobalRegistry,
    params: &'a [Rc<fly_ir::Parameter>],
    return_ty: Type,
    locals: &'a std::cell::RefCell<Vec<Rc<fly_ir::LocalVar>>>,
}

fn resolve_function(function: &Rc<Function>, module: &Rc<Module>, registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    let Some(body) = function.body.borrow().clone() else {
        return;
    };
    let fctx = FnContext {
        module,
        registry,
        params: &function.params,
        return_ty: function.return_ty.clone(),
        locals: &function.locals,
    };
    walk_block(&body, &fctx, diagnostics);
}

fn resolve_method(method: &Rc<ClassMethod>, module: &Rc<Module>, registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    let Some(body) = method.body.borrow().clone() else {
        return;
    };
    let fctx = FnContext {
        module,
        registry,
        params: &method.params,
        return_ty: method.return_ty.clone(),
        locals: &method.locals,
    };
    walk_block(&body, &fctx, diagnostics);
}

fn walk_block(block: &Rc<Block>, fctx: &FnContext, diagnostics: &mut DiagnosticQueue) {
    let len = block.stmts.borrow().len();
    for i in 0..len {
        walk_stmt_at(block, i, fctx, diagnostics);
    }
}

fn walk_stmt_at(block: &Rc<Block>, index: usize, fctx: &FnContext, diagnostics: &mut DiagnosticQueue) {
    let stmts = block.stmts.borrow();
    match &stmts[index].kind {
        StmtKind::VarDecl { local, init } => {
            resolve_type_in_place(&local.ty, fctx, diagnostics);
            if let Some(init_expr) = init {
                let init_ty = type_expr(init_expr, fctx, block, diagnostics);
                if !validate::is_convertible(&init_ty, &local.ty) {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "initializer type does not convert to declared type", init_expr.loc);
                }
            }
            fctx.locals.borrow_mut().push(local.clone());
        }
        StmtKind::Assignment { target, op, value } => {
            let target_ty = resolve_var_ref(target, fctx, block, diagnostics).unwrap_or(Type::Void);
            let value_ty = type_expr(value, fctx, block, diagnostics);
            if !validate::is_convertible(&value_ty, &target_ty) {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "assigned value does not convert to target type", value.loc);
            }
            if op.is_compound() && !validate::categories_match_for_arithmetic(&target_ty, &value_ty) {
                diagnostics.emit_error(ErrorCode::TYPE_ARITH, "compound assignment requires matching arithmetic categories", value.loc);
            }
        }
        StmtKind::Return(expr) => {
            if let Some(e) = expr {
                let ty = type_expr(e, fctx, block, diagnostics);
                if !validate::is_convertible(&ty, &fctx.return_ty) {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "return expression does not convert to declared return type", e.loc);
                }
            }
        }
        StmtKind::Expr(e) => {
            type_expr(e, fctx, block, diagnostics);
        }
        StmtKind::If(if_stmt) => {
            for arm in &if_stmt.arms {
                let cond_ty = type_expr(&arm.cond, fctx, block, diagnostics);
                if !validate::is_convertible(&cond_ty, &Type::Bool) {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "condition must be convertible to bool", arm.cond.loc);
                }
                walk_block(&arm.then, fctx, diagnostics);
            }
            if let Some(else_block) = &if_stmt.else_block {
                walk_block(else_block, fctx, diagnostics);
            }
        }
        StmtKind::Switch(switch_stmt) => {
            let scrutinee_ty = type_expr(&switch_stmt.scrutinee, fctx, block, diagnostics);
            if !scrutinee_ty.is_integer() {
                diagnostics.emit_error(ErrorCode::TYPE_COMPARABLE, "switch scrutinee must be integer", switch_stmt.scrutinee.loc);
            }
            for case in &switch_stmt.cases {
                let case_ty = type_expr(&case.value, fctx, block, diagnostics);
                if !validate::is_convertible(&case_ty, &scrutinee_ty) {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "case value does not convert to scrutinee type", case.value.loc);
                }
                walk_block(&case.body, fctx, diagnostics);
            }
            if let Some(default) = &switch_stmt.default {
                walk_block(default, fctx, diagnostics);
            }
        }
        StmtKind::Loop(loop_stmt) => {
            if let Some(cond) = &loop_stmt.cond {
                let cond_ty = type_expr(cond, fctx, block, diagnostics);
                if !validate::is_convertible(&cond_ty, &Type::Bool) {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "loop condition must be convertible to bool", cond.loc);
                }
            }
            walk_block(&loop_stmt.body, fctx, diagnostics);
        }
        StmtKind::LoopIn(loop_in) => {
            let iterable_ty = type_expr(&loop_in.iterable, fctx, block, diagnostics);
            // Codegen walks the array by a statically-known length (DESIGN.md);
            // a dynamically-sized array carries no runtime length to drive that
            // loop against, so it's rejected here rather than reaching codegen.
            if matches!(iterable_ty, Type::Array { size: None, .. }) {
                diagnostics.emit_error(
                    ErrorCode::LOOP_IN_DYNAMIC_ARRAY,
                    "loop-in requires an array with a known size",
                    loop_in.iterable.loc,
                );
            }
            walk_block(&loop_in.body, fctx, diagnostics);
        }
        StmtKind::Handle(handle) => {
            walk_block(&handle.body, fctx, diagnostics);
        }
        StmtKind::Fail(expr) => {
            if let Some(e) = expr {
                let ty = type_expr(e, fctx, block, diagnostics);
                let ok = matches!(ty, Type::Bool | Type::Int { .. } | Type::String | Type::Identity(_));
                if !ok {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "fail payload must be bool, integer, string, or an identity instance", e.loc);
                }
            }
        }
        StmtKind::Delete(target) => {
            let ty = resolve_var_ref(target, fctx, block, diagnostics).unwrap_or(Type::Void);
            if !matches!(ty, Type::Identity(_)) {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "delete operand must be a class/struct instance", target.loc);
            }
        }
        StmtKind::Block(child) => {
            let child = child.clone();
            drop(stmts);
            walk_block(&child, fctx, diagnostics);
        }
        StmtKind::Break | StmtKind::Continue => {}
    }
}

// ---- Type resolution of body-local `IdentityRef`s ------------------------

fn resolve_type_in_place(ty: &Type, fctx: &FnContext, diagnostics: &mut DiagnosticQueue) {
    match ty {
        Type::Identity(ir) if !ir.is_resolved() => match find_identity(fctx.module, fctx.registry, ir.qualified_name) {
            Some(def) => ir.resolve(def),
            None => diagnostics.emit_error(ErrorCode::UNREF_TYPE, "unresolved type reference", ir.loc),
        },
        Type::Array { elem, .. } => resolve_type_in_place(elem, fctx, diagnostics),
        _ => {}
    }
}

// ---- VarRef resolution ----------------------------------------------------

/// A bare (parentless) segment that names an import alias or target
/// namespace qualifies the rest of the chain as a namespace lookup rather
/// than a receiver (`spec.md §6` Import grammar).
fn namespace_name_for(segment: &Ref, fctx: &FnContext) -> Option<Name> {
    if segment.parent.is_some() {
        return None;
    }
    fctx.module.imports.borrow().iter().find_map(|import| {
        let matches_alias = import.alias == Some(segment.name);
        let matches_bare = import.alias.is_none() && import.target_namespace == segment.name;
        (matches_alias || matches_bare).then_some(import.target_namespace)
    })
}

fn find_attribute(class: &Rc<ClassDecl>, name: Name) -> Option<Rc<ClassAttribute>> {
    if let Some(attr) = class.attributes.borrow().iter().find(|a| a.name == name) {
        return Some(attr.clone());
    }
    class.supers.iter().find_map(|s| match s.resolved() {
        Some(IdentityDef::Class(parent)) => find_attribute(&parent, name),
        _ => None,
    })
}

/// Resolves `r` (setting its `def`) and returns its type. `None` only on an
/// unresolvable reference, after a diagnostic has already been emitted.
fn resolve_var_ref(r: &Ref, fctx: &FnContext, block: &Rc<Block>, diagnostics: &mut DiagnosticQueue) -> Option<Type> {
    if r.is_resolved() {
        return Some(target_type(&r.def()));
    }
    if let Some(parent) = &r.parent {
        if let Some(ns_name) = namespace_name_for(parent, fctx) {
            if let Some(ns) = fctx.registry.find_namespace(ns_name) {
                let found = ns.borrow().globals.get(&r.name).cloned();
                if let Some(global) = found {
                    let ty = global.ty.clone();
                    r.resolve(RefTarget::Var(VarTarget::Global(global)));
                    return Some(ty);
                }
            }
            diagnostics.emit_error(ErrorCode::UNREF_VAR, "unresolved qualified variable", r.loc);
            return None;
        }

        let parent_ty = resolve_var_ref(parent, fctx, block, diagnostics)?;
        if let Type::Identity(ir) = &parent_ty {
            match ir.resolved() {
                Some(IdentityDef::Class(class)) => {
                    if let Some(attr) = find_attribute(&class, r.name) {
                        let ty = attr.ty.clone();
                        r.resolve(RefTarget::Var(VarTarget::ClassAttribute(attr)));
                        return Some(ty);
                    }
                }
                Some(IdentityDef::Enum(enum_decl)) => {
                    let entry = enum_decl.entries.borrow().iter().find(|e| e.name == r.name).cloned();
                    if let Some(entry) = entry {
                        r.resolve(RefTarget::Var(VarTarget::EnumEntry(entry)));
                        return Some(parent_ty.clone());
                    }
                }
                None => {}
            }
        }
        diagnostics.emit_error(ErrorCode::UNREF_VAR, "unresolved member reference", r.loc);
        return None;
    }

    if let Some(param) = fctx.params.iter().find(|p| p.name == r.name) {
        let ty = param.ty.clone();
        r.resolve(RefTarget::Var(VarTarget::Param(param.clone())));
        return Some(ty);
    }
    if let Some(local) = block.find_local(r.name) {
        let ty = local.ty.clone();
        r.resolve(RefTarget::Var(VarTarget::Local(local)));
        return Some(ty);
    }
    let global = fctx.module.globals.borrow().iter().find(|g| g.name == r.name).cloned();
    if let Some(global) = global {
        let ty = global.ty.clone();
        r.resolve(RefTarget::Var(VarTarget::Global(global)));
        return Some(ty);
    }
    diagnostics.emit_error(ErrorCode::UNREF_VAR, "unresolved variable", r.loc);
    None
}

fn target_type(target: &RefTarget) -> Type {
    match target {
        RefTarget::Var(VarTarget::Local(l)) => l.ty.clone(),
        RefTarget::Var(VarTarget::Param(p)) => p.ty.clone(),
        RefTarget::Var(VarTarget::Global(g)) => g.ty.clone(),
        RefTarget::Var(VarTarget::ClassAttribute(a)) => a.ty.clone(),
        // Never hit directly: an `EnumEntry` ref's type is the owning enum's
        // `IdentityRef`, produced at the resolution site where that enum is
        // already in hand, not recoverable from the entry alone.
        RefTarget::Var(VarTarget::EnumEntry(_)) => Type::Void,
        RefTarget::Call(CallTarget::Function(f)) => f.return_ty.clone(),
        RefTarget::Call(CallTarget::Method(m)) => m.return_ty.clone(),
        RefTarget::Type(_) => Type::Void,
    }
}

// ---- Call resolution --------------------------------------------------------

enum LevelResult<T> {
    NotFound,
    Resolved(T),
    NoMatch,
    Ambiguous,
}

/// The "most specific" candidate: every parameter must accept its argument
/// (by convertibility), and the count of *exact* type matches breaks ties;
/// an equal exact-match count between two otherwise-valid candidates is
/// reported as ambiguous rather than arbitrarily picking one
/// (`spec.md §4.4` Call resolution order).
fn pick_overload<T: Overloadable>(candidates: Vec<Rc<T>>, arg_types: &[Type]) -> Result<Option<Rc<T>>, ()> {
    let mut best: Option<(Rc<T>, u32)> = None;
    let mut tie = false;
    for candidate in candidates {
        let params = candidate.param_types();
        if params.len() != arg_types.len() {
            continue;
        }
        let mut viable = true;
        let mut exact = 0u32;
        for (param_ty, arg_ty) in params.iter().zip(arg_types.iter()) {
            if validate::types_equal(param_ty, arg_ty) {
                exact += 1;
            } else if !validate::is_convertible(arg_ty, param_ty) {
                viable = false;
                break;
            }
        }
        if !viable {
            continue;
        }
        match &best {
            None => best = Some((candidate, exact)),
            Some((_, best_exact)) if exact > *best_exact => {
                best = Some((candidate, exact));
                tie = false;
            }
            Some((_, best_exact)) if exact == *best_exact => tie = true,
            _ => {}
        }
    }
    if tie {
        Err(())
    } else {
        Ok(best)
    }
}

fn resolve_at_level<T: Overloadable>(matches_by_name: Vec<Rc<T>>, arg_types: &[Type]) -> LevelResult<Rc<T>> {
    if matches_by_name.is_empty() {
        return LevelResult::NotFound;
    }
    match pick_overload(matches_by_name, arg_types) {
        Ok(Some(c)) => LevelResult::Resolved(c),
        Ok(None) => LevelResult::NoMatch,
        Err(()) => LevelResult::Ambiguous,
    }
}

fn collect_methods(class: &Rc<ClassDecl>, name: Name) -> Vec<Rc<ClassMethod>> {
    let own: Vec<_> = class.methods.borrow().iter().filter(|m| m.name == name).cloned().collect();
    if !own.is_empty() {
        return own;
    }
    class
        .supers
        .iter()
        .find_map(|s| match s.resolved() {
            Some(IdentityDef::Class(parent)) => {
                let inherited = collect_methods(&parent, name);
                (!inherited.is_empty()).then_some(inherited)
            }
            _ => None,
        })
        .unwrap_or_default()
}

fn resolve_call_ref(callee: &Ref, arg_types: &[Type], fctx: &FnContext, block: &Rc<Block>, diagnostics: &mut DiagnosticQueue) -> Option<Type> {
    if let Some(parent) = &callee.parent {
        if let Some(ns_name) = namespace_name_for(parent, fctx) {
            if let Some(ns) = fctx.registry.find_namespace(ns_name) {
                let candidates: Vec<_> = ns
                    .borrow()
                    .functions
                    .find_all(callee.name)
                    .filter(|f| matches!(f.scopes.visibility, Visibility::Public))
                    .cloned()
                    .collect();
                return finish_function_call(callee, candidates, arg_types, diagnostics);
            }
            diagnostics.emit_error(ErrorCode::UNREF_CALL, "unresolved qualified call", callee.loc);
            return None;
        }

        let parent_ty = resolve_var_ref(parent, fctx, block, diagnostics)?;
        if let Type::Identity(ir) = &parent_ty {
            if let Some(IdentityDef::Class(class)) = ir.resolved() {
                let candidates = collect_methods(&class, callee.name);
                return finish_method_call(callee, candidates, arg_types, diagnostics);
            }
        }
        diagnostics.emit_error(ErrorCode::UNREF_CALL, "unresolved method call", callee.loc);
        return None;
    }

    // A bare name that also names a constructible type is a constructor
    // call (`new T(...)` lowers to a plain `Call` whose callee resolves to
    // `CallTarget::Method` with `MethodKind::Constructor` — see DESIGN.md).
    if let Some(IdentityDef::Class(class)) = find_identity(fctx.module, fctx.registry, callee.name) {
        let candidates: Vec<_> = class.constructors.borrow().iter().cloned().collect();
        match resolve_at_level(candidates, arg_types) {
            LevelResult::Resolved(ctor) => {
                let ty = ctor.return_ty.clone();
                callee.resolve(RefTarget::Call(CallTarget::Method(ctor)));
                return Some(ty);
            }
            LevelResult::NoMatch => {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no constructor overload accepts these arguments", callee.loc);
                return None;
            }
            LevelResult::Ambiguous => {
                diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous constructor call", callee.loc);
                return None;
            }
            LevelResult::NotFound => {}
        }
    }

    let module_matches: Vec<_> = fctx.module.functions.borrow().iter().filter(|f| f.name == callee.name).cloned().collect();
    match resolve_at_level(module_matches, arg_types) {
        LevelResult::Resolved(f) => {
            let ty = f.return_ty.clone();
            callee.resolve(RefTarget::Call(CallTarget::Function(f)));
            return Some(ty);
        }
        LevelResult::NoMatch => {
            diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no overload of this call accepts these arguments", callee.loc);
            return None;
        }
        LevelResult::Ambiguous => {
            diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous call", callee.loc);
            return None;
        }
        LevelResult::NotFound => {}
    }

    if let Some(ns) = fctx.registry.find_namespace(fctx.module.namespace) {
        let candidates: Vec<_> = ns
            .borrow()
            .functions
            .find_all(callee.name)
            .filter(|f| f.scopes.is_visible_from_outside())
            .cloned()
            .collect();
        match resolve_at_level(candidates, arg_types) {
            LevelResult::Resolved(f) => {
                let ty = f.return_ty.clone();
                callee.resolve(RefTarget::Call(CallTarget::Function(f)));
                return Some(ty);
            }
            LevelResult::NoMatch => {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no overload of this call accepts these arguments", callee.loc);
                return None;
            }
            LevelResult::Ambiguous => {
                diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous call", callee.loc);
                return None;
            }
            LevelResult::NotFound => {}
        }
    }

    for import in fctx.module.imports.borrow().iter() {
        if !import.resolved.get() {
            continue;
        }
        if let Some(ns) = fctx.registry.find_namespace(import.target_namespace) {
            let candidates: Vec<_> = ns
                .borrow()
                .functions
                .find_all(callee.name)
                .filter(|f| matches!(f.scopes.visibility, Visibility::Public))
                .cloned()
                .collect();
            match resolve_at_level(candidates, arg_types) {
                LevelResult::Resolved(f) => {
                    let ty = f.return_ty.clone();
                    callee.resolve(RefTarget::Call(CallTarget::Function(f)));
                    return Some(ty);
                }
                LevelResult::NoMatch => {
                    diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no overload of this call accepts these arguments", callee.loc);
                    return None;
                }
                LevelResult::Ambiguous => {
                    diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous call", callee.loc);
                    return None;
                }
                LevelResult::NotFound => {}
            }
        }
    }

    diagnostics.emit_error(ErrorCode::UNREF_CALL, "unresolved call", callee.loc);
    None
}

fn finish_function_call(callee: &Ref, candidates: Vec<Rc<Function>>, arg_types: &[Type], diagnostics: &mut DiagnosticQueue) -> Option<Type> {
    match resolve_at_level(candidates, arg_types) {
        LevelResult::Resolved(f) => {
            let ty = f.return_ty.clone();
            callee.resolve(RefTarget::Call(CallTarget::Function(f)));
            Some(ty)
        }
        LevelResult::NoMatch => {
            diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no overload of this call accepts these arguments", callee.loc);
            None
        }
        LevelResult::Ambiguous => {
            diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous call", callee.loc);
            None
        }
        LevelResult::NotFound => {
            diagnostics.emit_error(ErrorCode::UNREF_CALL, "unresolved call", callee.loc);
            None
        }
    }
}

fn finish_method_call(callee: &Ref, candidates: Vec<Rc<ClassMethod>>, arg_types: &[Type], diagnostics: &mut DiagnosticQueue) -> Option<Type> {
    match resolve_at_level(candidates, arg_types) {
        LevelResult::Resolved(m) => {
            let ty = m.return_ty.clone();
            callee.resolve(RefTarget::Call(CallTarget::Method(m)));
            Some(ty)
        }
        LevelResult::NoMatch => {
            diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "no overload of this method accepts these arguments", callee.loc);
            None
        }
        LevelResult::Ambiguous => {
            diagnostics.emit_error(ErrorCode::AMBIGUOUS_CALL, "ambiguous method call", callee.loc);
            None
        }
        LevelResult::NotFound => {
            diagnostics.emit_error(ErrorCode::UNREF_CALL, "unresolved method call", callee.loc);
            None
        }
    }
}

// ---- Expression typing ------------------------------------------------------

/// The smallest signed bit width that holds `magnitude` with the given
/// sign (`spec.md §4.4` ValueExpr typing).
fn smallest_bits(magnitude: u64, negative: bool) -> IntBits {
    for bits in [IntBits::B8, IntBits::B16, IntBits::B32, IntBits::B64] {
        let capacity = if negative {
            1u64 << (bits.bits() - 1)
        } else {
            (1u64 << (bits.bits() - 1)) - 1
        };
        if magnitude <= capacity {
            return bits;
        }
    }
    IntBits::B64
}

fn type_of_value(value: &Value, loc: Span, diagnostics: &mut DiagnosticQueue) -> Type {
    match value {
        Value::Bool(_) => Type::Bool,
        Value::Integer { magnitude, negative, .. } => {
            if Value::integer_overflows_i64(*magnitude, *negative) {
                let code = if *negative {
                    ErrorCode::INT_MIN_OVERFLOW
                } else {
                    ErrorCode::INT_MAX_OVERFLOW
                };
                diagnostics.emit_error(code, "integer literal out of range", loc);
                return Type::Int {
                    bits: IntBits::B64,
                    signed: true,
                };
            }
            Type::Int {
                bits: smallest_bits(*magnitude, *negative),
                signed: true,
            }
        }
        Value::Floating(_) => Type::Float(FloatBits::B64),
        // No dedicated `Char` type exists in the data model (`spec.md §3`
        // lists only `Void/Bool/Int/Float/String/Error/Array/Identity`); a
        // char literal is typed as an unsigned byte.
        Value::Char(_) => Type::Int {
            bits: IntBits::B8,
            signed: false,
        },
        Value::String(_) => Type::String,
        Value::Array(items) => {
            let elem = items.first().map_or(Type::Void, |v| type_of_value(v, loc, diagnostics));
            Type::Array {
                elem: Box::new(elem),
                size: Some(items.len() as u64),
            }
        }
        // A struct literal's field map is matched against a declared
        // identity by the caller's expected type (e.g. a `VarDecl`'s
        // declared type), which this bottom-up, context-free walk doesn't
        // have in hand; out of scope for the scenarios this resolver is
        // exercised against (`spec.md §8`).
        Value::Struct(_) | Value::Null | Value::Zero => Type::Void,
    }
}

fn is_literal(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Value(_))
}

fn type_expr(expr: &Expr, fctx: &FnContext, block: &Rc<Block>, diagnostics: &mut DiagnosticQueue) -> Type {
    if expr.has_ty() {
        return expr.ty();
    }
    let ty = match &expr.kind {
        ExprKind::Value(v) => type_of_value(v, expr.loc, diagnostics),
        ExprKind::VarRef(r) => resolve_var_ref(r, fctx, block, diagnostics).unwrap_or(Type::Void),
        ExprKind::Call { callee, args } => {
            let arg_types: Vec<_> = args.iter().map(|a| type_expr(a, fctx, block, diagnostics)).collect();
            resolve_call_ref(callee, &arg_types, fctx, block, diagnostics).unwrap_or(Type::Void)
        }
        ExprKind::Unary { op, operand, .. } => {
            let operand_ty = type_expr(operand, fctx, block, diagnostics);
            match op {
                UnaryOp::Not if !matches!(operand_ty, Type::Bool) => {
                    diagnostics.emit_error(ErrorCode::TYPE_LOGICAL, "'!' requires a bool operand", expr.loc);
                }
                UnaryOp::Neg if !(operand_ty.is_integer() || operand_ty.is_floating()) => {
                    diagnostics.emit_error(ErrorCode::TYPE_ARITH, "unary '-' requires a numeric operand", expr.loc);
                }
                UnaryOp::Incr | UnaryOp::Decr if !operand_ty.is_integer() => {
                    diagnostics.emit_error(ErrorCode::TYPE_ARITH, "'++'/'--' require an integer operand", expr.loc);
                }
                _ => {}
            }
            operand_ty
        }
        ExprKind::Binary { op, lhs, rhs } => type_binary(*op, lhs, rhs, expr.loc, fctx, block, diagnostics),
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond_ty = type_expr(cond, fctx, block, diagnostics);
            if !validate::is_convertible(&cond_ty, &Type::Bool) {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "ternary condition must be convertible to bool", cond.loc);
            }
            let then_ty = type_expr(then_branch, fctx, block, diagnostics);
            let else_ty = type_expr(else_branch, fctx, block, diagnostics);
            if validate::types_equal(&then_ty, &else_ty) {
                then_ty
            } else if validate::categories_match_for_arithmetic(&then_ty, &else_ty) {
                let common = validate::wider(&then_ty, &else_ty);
                then_branch.set_ty(common.clone());
                else_branch.set_ty(common.clone());
                common
            } else {
                diagnostics.emit_error(ErrorCode::TYPE_CONVERT, "ternary branches must share a common type", expr.loc);
                then_ty
            }
        }
    };
    expr.set_ty(ty.clone());
    ty
}

fn type_binary(op: fly_ir::BinaryOp, lhs: &Expr, rhs: &Expr, loc: Span, fctx: &FnContext, block: &Rc<Block>, diagnostics: &mut DiagnosticQueue) -> Type {
    let lhs_ty = type_expr(lhs, fctx, block, diagnostics);
    let rhs_ty = type_expr(rhs, fctx, block, diagnostics);

    if op.is_logical() {
        if !validate::both_bool(&lhs_ty, &rhs_ty) {
            diagnostics.emit_error(ErrorCode::TYPE_LOGICAL, "logical operator requires bool operands", loc);
        }
        return Type::Bool;
    }

    if op.is_comparison() {
        if !validate::categories_match_for_comparison(&lhs_ty, &rhs_ty) {
            diagnostics.emit_error(ErrorCode::TYPE_COMPARABLE, "comparison requires matching operand categories", loc);
        } else if !validate::types_equal(&lhs_ty, &rhs_ty) {
            promote_mismatched_operands(lhs, rhs, &lhs_ty, &rhs_ty);
        }
        return Type::Bool;
    }

    // Arithmetic.
    if !validate::categories_match_for_arithmetic(&lhs_ty, &rhs_ty) {
        diagnostics.emit_error(ErrorCode::TYPE_ARITH, "arithmetic operator requires matching operand categories", loc);
        return lhs_ty;
    }
    let result = validate::wider(&lhs_ty, &rhs_ty);
    lhs.set_ty(result.clone());
    rhs.set_ty(result.clone());
    result
}

/// Literal side promoted to the variable side's type when widths differ;
/// if both sides are literals, the wider type wins and both are rewritten
/// (`spec.md §4.4` Binary comparison typing).
fn promote_mismatched_operands(lhs: &Expr, rhs: &Expr, lhs_ty: &Type, rhs_ty: &Type) {
    match (is_literal(lhs), is_literal(rhs)) {
        (true, false) => lhs.set_ty(rhs_ty.clone()),
        (false, true) => rhs.set_ty(lhs_ty.clone()),
        _ => {
            let common = validate::wider(lhs_ty, rhs_ty);
            lhs.set_ty(common.clone());
            rhs.set_ty(common);
        }
    }
}
