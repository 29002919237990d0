//! End-to-end lowering tests (`spec.md §8` S1-S6): build a program through
//! the same `Builder` façade an external parser would drive, resolve it,
//! then assert on the textual LLVM IR `ModuleCompiler` emits. These require
//! a real LLVM install, same as the rest of this crate.

use crate::module::ModuleCompiler;
use fly_diagnostic::ErrorCode;
use fly_ir::{
    AssignOp, BinaryOp, ClassKind, FloatBits, IdentityKind, IdentityRef, IntBits, Interner, Module, Ref, Scopes,
    Span, Type, Value,
};
use fly_sema::symbols::GlobalRegistry;
use fly_sema::Builder;
use inkwell::context::Context;
use std::rc::Rc;

fn i32_ty() -> Type {
    Type::Int { bits: IntBits::B32, signed: true }
}

struct Harness {
    interner: Rc<Interner>,
    builder: Builder,
    module: Rc<Module>,
}

fn harness() -> Harness {
    let interner = Rc::new(Interner::new());
    let registry = Rc::new(GlobalRegistry::new());
    let builder = Builder::new(interner.clone(), registry);
    let Some(module) = builder.create_module("m", "app", Span::DUMMY) else {
        panic!("test module name is valid and used once");
    };
    Harness { interner, builder, module }
}

/// Resolves `harness.module`, asserts the result isn't fatally broken, and
/// returns the LLVM IR text `ModuleCompiler` produces for it.
fn lower(harness: Harness) -> String {
    let Harness { interner, builder, module } = harness;
    let registry = builder.registry().clone();
    let mut diagnostics = builder.into_diagnostics();
    fly_resolve::resolve_program(&[module.clone()], &registry, &mut diagnostics);
    assert!(!diagnostics.is_fatal(), "unexpected fatal diagnostics: {:?}", diagnostics.diagnostics());

    let llcx = Context::create();
    let compiler = ModuleCompiler::new(&llcx, interner, "m");
    compiler.compile(&module);
    compiler.print_to_string()
}

#[test]
fn s1_global_default() {
    let h = harness();
    h.builder.create_global_var(&h.module, Type::Bool, "a", Scopes::public(), None, Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("@a = global i1 false"), "{ir}");
}

#[test]
fn s2_struct_new_delete() {
    let h = harness();
    let Some(class) = h.builder.create_class(&h.module, ClassKind::Struct, "T", Scopes::public(), Vec::new(), Span::DUMMY) else {
        panic!("class name is valid and used once");
    };
    h.builder.create_class_attribute(&class, i32_ty(), "a", Scopes::public(), None, Span::DUMMY);
    h.builder.create_class_attribute(&class, i32_ty(), "b", Scopes::public(), None, Span::DUMMY);
    h.builder.create_class_attribute(&class, i32_ty(), "c", Scopes::public(), None, Span::DUMMY);

    let t_ty = Type::Identity(IdentityRef::new(IdentityKind::Struct, h.interner.intern("T"), Span::DUMMY));

    let body = h.builder.create_block(None, Span::DUMMY);

    let Some(t_local) = h.builder.create_local_var(&body, t_ty, "t", Scopes::default(), Span::DUMMY) else {
        panic!("local name is unused in this block");
    };
    let ctor_ref = h.builder.create_ref("T", None, Span::DUMMY);
    let new_t = h.builder.create_call_expr(ctor_ref, Vec::new(), Span::DUMMY);
    h.builder.create_var_decl_stmt(&body, t_local, Some(new_t), Span::DUMMY);

    let Some(x_local) = h.builder.create_local_var(&body, i32_ty(), "x", Scopes::default(), Span::DUMMY) else {
        panic!("local name is unused in this block");
    };
    let t_name = h.interner.intern("t");
    let field_a = h.builder.create_ref("a", Some(Box::new(Ref::new(t_name, Span::DUMMY, None))), Span::DUMMY);
    let load_a = h.builder.create_var_ref_expr(field_a, Span::DUMMY);
    h.builder.create_var_decl_stmt(&body, x_local, Some(load_a), Span::DUMMY);

    let field_b = h.builder.create_ref("b", Some(Box::new(Ref::new(t_name, Span::DUMMY, None))), Span::DUMMY);
    let two = h.builder.create_value_expr(
        Value::Integer { magnitude: 2, radix: 10, negative: false },
        Span::DUMMY,
    );
    h.builder.create_assignment_stmt(&body, field_b, AssignOp::Assign, Span::DUMMY).set_value(two);

    let t_ref = h.builder.create_ref("t", None, Span::DUMMY);
    h.builder.create_delete_stmt(&body, t_ref, Span::DUMMY);

    h.builder.create_function(&h.module, Type::Void, "func", Scopes::public(), Vec::new(), Some(body), Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("%T = type { i32, i32, i32 }"), "{ir}");
    assert!(ir.contains("T_T"), "{ir}");
    assert!(ir.to_lowercase().contains("malloc"), "{ir}");
    assert!(ir.contains("store i32 2"), "{ir}");
    assert!(ir.to_lowercase().contains("free"), "{ir}");
}

#[test]
fn s3_if_elif_else_chain() {
    let h = harness();
    let body = h.builder.create_block(None, Span::DUMMY);
    let param = h.builder.create_param(i32_ty(), "a", Scopes::default(), None, Span::DUMMY);

    let arm = |value: u64, assign: u64| {
        let then = h.builder.create_block(Some(&body), Span::DUMMY);
        let target = h.builder.create_ref("a", None, Span::DUMMY);
        let literal = h.builder.create_value_expr(
            Value::Integer { magnitude: assign, radix: 10, negative: false },
            Span::DUMMY,
        );
        h.builder.create_assignment_stmt(&then, target, AssignOp::Assign, Span::DUMMY).set_value(literal);
        let cond_ref = h.builder.create_var_ref_expr(h.builder.create_ref("a", None, Span::DUMMY), Span::DUMMY);
        let cond_val = h.builder.create_value_expr(
            Value::Integer { magnitude: value, radix: 10, negative: false },
            Span::DUMMY,
        );
        let cond = h.builder.create_binary_op_expr(BinaryOp::Eq, cond_ref, cond_val, Span::DUMMY);
        (cond, then)
    };

    let (cond1, then1) = arm(1, 11);
    let (cond2, then2) = arm(2, 22);
    let (cond3, then3) = arm(3, 33);

    let else_block = h.builder.create_block(Some(&body), Span::DUMMY);
    let else_target = h.builder.create_ref("a", None, Span::DUMMY);
    let else_val = h.builder.create_value_expr(
        Value::Integer { magnitude: 44, radix: 10, negative: false },
        Span::DUMMY,
    );
    h.builder.create_assignment_stmt(&else_block, else_target, AssignOp::Assign, Span::DUMMY).set_value(else_val);

    let finished = h
        .builder
        .create_if_builder(&body, Span::DUMMY)
        .arm(cond1, then1)
        .arm(cond2, then2)
        .arm(cond3, then3)
        .else_block(else_block)
        .finish();
    assert!(finished.is_ok(), "if builder has three arms, can't be empty");

    h.builder.create_function(&h.module, Type::Void, "func", Scopes::public(), vec![param], Some(body), Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("store i32 11"), "{ir}");
    assert!(ir.contains("store i32 22"), "{ir}");
    assert!(ir.contains("store i32 33"), "{ir}");
    assert!(ir.contains("store i32 44"), "{ir}");
}

#[test]
fn s4_short_circuit_and() {
    let h = harness();
    let body = h.builder.create_block(None, Span::DUMMY);
    let a = h.builder.create_param(Type::Bool, "a", Scopes::default(), None, Span::DUMMY);
    let b = h.builder.create_param(Type::Bool, "b", Scopes::default(), None, Span::DUMMY);

    let Some(c_local) = h.builder.create_local_var(&body, Type::Bool, "c", Scopes::default(), Span::DUMMY) else {
        panic!("local name is unused in this block");
    };
    let lhs = h.builder.create_var_ref_expr(h.builder.create_ref("a", None, Span::DUMMY), Span::DUMMY);
    let rhs = h.builder.create_var_ref_expr(h.builder.create_ref("b", None, Span::DUMMY), Span::DUMMY);
    let and_expr = h.builder.create_binary_op_expr(BinaryOp::And, lhs, rhs, Span::DUMMY);
    h.builder.create_var_decl_stmt(&body, c_local, Some(and_expr), Span::DUMMY);

    h.builder.create_function(&h.module, Type::Void, "func", Scopes::public(), vec![a, b], Some(body), Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("trunc"), "{ir}");
    assert!(ir.to_lowercase().contains("phi i1"), "{ir}");
    assert!(ir.contains("zext"), "{ir}");
}

#[test]
fn s5_fail_ladder_and_main() {
    let h = harness();

    let fail_with = |name: &str, value: Value| {
        let body = h.builder.create_block(None, Span::DUMMY);
        let expr = h.builder.create_value_expr(value, Span::DUMMY);
        h.builder.create_fail_stmt(&body, Span::DUMMY).with_expr(expr);
        h.builder.create_function(&h.module, Type::Void, name, Scopes::public(), Vec::new(), Some(body), Span::DUMMY);
    };

    fail_with("testFail0", Value::Bool(true));
    fail_with("testFail1", Value::Integer { magnitude: 7, radix: 10, negative: false });
    fail_with("testFail2", Value::Integer { magnitude: 9, radix: 10, negative: false });
    fail_with("testFail3", Value::String(Rc::from("boom")));

    let Some(_oops) = h.builder.create_class(&h.module, ClassKind::Class, "Oops", Scopes::public(), Vec::new(), Span::DUMMY) else {
        panic!("class name is valid and used once");
    };
    let fail4_body = h.builder.create_block(None, Span::DUMMY);
    let new_oops = h.builder.create_call_expr(h.builder.create_ref("Oops", None, Span::DUMMY), Vec::new(), Span::DUMMY);
    h.builder.create_fail_stmt(&fail4_body, Span::DUMMY).with_expr(new_oops);
    h.builder.create_function(&h.module, Type::Void, "testFail4", Scopes::public(), Vec::new(), Some(fail4_body), Span::DUMMY);

    let main_body = h.builder.create_block(None, Span::DUMMY);
    for i in 0..5 {
        let name = format!("testFail{i}");
        let call = h.builder.create_call_expr(h.builder.create_ref(&name, None, Span::DUMMY), Vec::new(), Span::DUMMY);
        h.builder.create_expr_stmt(&main_body, Span::DUMMY).set_expr(call);
    }
    h.builder.create_function(&h.module, Type::Void, "main", Scopes::public(), Vec::new(), Some(main_body), Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("define i32 @main()"), "{ir}");
    assert!(ir.contains("@testFail0"), "{ir}");
    assert!(ir.contains("@testFail4"), "{ir}");
}

#[test]
fn s6_overload_dispatch_rejects_bool_argument() {
    let h = harness();

    h.builder.create_function(&h.module, Type::Void, "f", Scopes::public(), vec![h.builder.create_param(i32_ty(), "x", Scopes::default(), None, Span::DUMMY)], Some(h.builder.create_block(None, Span::DUMMY)), Span::DUMMY);
    h.builder.create_function(
        &h.module,
        Type::Void,
        "f",
        Scopes::public(),
        vec![h.builder.create_param(Type::Float(FloatBits::B64), "x", Scopes::default(), None, Span::DUMMY)],
        Some(h.builder.create_block(None, Span::DUMMY)),
        Span::DUMMY,
    );

    let body = h.builder.create_block(None, Span::DUMMY);
    let bad_call = h.builder.create_call_expr(
        h.builder.create_ref("f", None, Span::DUMMY),
        vec![h.builder.create_value_expr(Value::Bool(true), Span::DUMMY)],
        Span::DUMMY,
    );
    h.builder.create_expr_stmt(&body, Span::DUMMY).set_expr(bad_call);
    h.builder.create_function(&h.module, Type::Void, "caller", Scopes::public(), Vec::new(), Some(body), Span::DUMMY);

    let registry = h.builder.registry().clone();
    let mut diagnostics = h.builder.into_diagnostics();
    fly_resolve::resolve_program(&[h.module.clone()], &registry, &mut diagnostics);

    assert!(diagnostics.diagnostics().iter().any(|d| d.code == ErrorCode::TYPE_CONVERT), "{:?}", diagnostics.diagnostics());
}

/// A `handle` block's aliased error variable used directly as an `if`
/// condition (`spec.md §4.3`: `Error` converts to `Bool`) must lower to a
/// real `i1`, not the raw `i8` kind byte.
#[test]
fn s7_handle_error_used_as_if_condition() {
    let h = harness();

    let body = h.builder.create_block(None, Span::DUMMY);
    let err_var = h
        .builder
        .create_local_var(&body, Type::Error, "e", Scopes::default(), Span::DUMMY)
        .expect("fresh local");

    let handle_body = h.builder.create_block(Some(&body), Span::DUMMY);
    let fail_value = h.builder.create_value_expr(Value::Integer { magnitude: 1, radix: 10, negative: false }, Span::DUMMY);
    h.builder.create_fail_stmt(&handle_body, Span::DUMMY).with_expr(fail_value);
    h.builder.create_handle_stmt(&body, Some(err_var), handle_body, Span::DUMMY);

    let then_block = h.builder.create_block(Some(&body), Span::DUMMY);
    let then_value = h.builder.create_value_expr(Value::Integer { magnitude: 0, radix: 10, negative: false }, Span::DUMMY);
    h.builder.create_expr_stmt(&then_block, Span::DUMMY).set_expr(then_value);
    let cond = h.builder.create_var_ref_expr(h.builder.create_ref("e", None, Span::DUMMY), Span::DUMMY);
    h.builder.create_if_builder(&body, Span::DUMMY).arm(cond, then_block).finish().expect("one arm");

    h.builder.create_function(&h.module, Type::Void, "usesErrorAsCondition", Scopes::public(), Vec::new(), Some(body), Span::DUMMY);

    let ir = lower(h);
    assert!(ir.contains("icmp ne i8"), "{ir}");
    assert!(ir.contains("br i1"), "{ir}");
}
