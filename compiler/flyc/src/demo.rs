//! A program built directly through the builder façade, standing in for
//! the module an external parser would hand the driver (`spec.md §1`:
//! parsing is out of scope). Exercises the "fail ladder and main"
//! end-to-end scenario (`spec.md §8` S5): five functions that each fail
//! with a different payload kind, and a `main` that calls them in order.

use fly_ir::{ClassKind, Interner, Module, Scopes, Span, Type, Value};
use fly_sema::symbols::GlobalRegistry;
use fly_sema::Builder;
use std::rc::Rc;

pub struct DemoProgram {
    pub interner: Rc<Interner>,
    pub registry: Rc<GlobalRegistry>,
    pub modules: Vec<Rc<Module>>,
}

/// Builds the S5 program: `testFail0`..`testFail4`, each failing with a
/// different payload (two distinct `int`s, a `bool` also routed through the
/// int payload slot, a `string`, and an identity), plus `main` calling all
/// five in order.
#[must_use]
pub fn build_fail_ladder() -> DemoProgram {
    let interner = Rc::new(Interner::new());
    let registry = Rc::new(GlobalRegistry::new());
    let builder = Builder::new(interner.clone(), registry.clone());

    let Some(module) = builder.create_module("main", "app", Span::DUMMY) else {
        panic!("demo module name is non-empty and used only once");
    };

    let Some(_oops) = builder.create_class(&module, ClassKind::Class, "Oops", Scopes::public(), Vec::new(), Span::DUMMY) else {
        panic!("demo class name is non-empty and unused");
    };

    build_fail_fn(&builder, &module, "testFail0", Value::Bool(true));
    build_fail_fn(
        &builder,
        &module,
        "testFail1",
        Value::Integer { magnitude: 7, radix: 10, negative: false },
    );
    build_fail_fn(
        &builder,
        &module,
        "testFail2",
        Value::Integer { magnitude: 9, radix: 10, negative: false },
    );
    build_fail_fn(&builder, &module, "testFail3", Value::String(Rc::from("boom")));
    build_fail_with_new(&builder, &module, "testFail4");

    build_main(&builder, &module);

    DemoProgram { interner, registry, modules: vec![module] }
}

/// `func testFailN() { fail <value> }`.
fn build_fail_fn(builder: &Builder, module: &Rc<Module>, name: &str, value: Value) {
    let body = builder.create_block(None, Span::DUMMY);
    let expr = builder.create_value_expr(value, Span::DUMMY);
    builder.create_fail_stmt(&body, Span::DUMMY).with_expr(expr);

    let Some(_function) = builder.create_function(module, Type::Void, name, Scopes::public(), Vec::new(), Some(body), Span::DUMMY) else {
        panic!("demo function name is non-empty and unused");
    };
}

/// `func testFail4() { fail new Oops() }` — the one payload of identity
/// kind (`spec.md §8` S5's `kind = 3` case).
fn build_fail_with_new(builder: &Builder, module: &Rc<Module>, name: &str) {
    let body = builder.create_block(None, Span::DUMMY);
    let ctor_ref = builder.create_ref("Oops", None, Span::DUMMY);
    let new_oops = builder.create_call_expr(ctor_ref, Vec::new(), Span::DUMMY);
    builder.create_fail_stmt(&body, Span::DUMMY).with_expr(new_oops);

    let Some(_function) = builder.create_function(module, Type::Void, name, Scopes::public(), Vec::new(), Some(body), Span::DUMMY) else {
        panic!("demo function name is non-empty and unused");
    };
}

/// `func main() { testFail0() testFail1() testFail2() testFail3() testFail4() }`.
fn build_main(builder: &Builder, module: &Rc<Module>) {
    let body = builder.create_block(None, Span::DUMMY);
    for i in 0..5 {
        let name = format!("testFail{i}");
        let callee = builder.create_ref(&name, None, Span::DUMMY);
        let call = builder.create_call_expr(callee, Vec::new(), Span::DUMMY);
        builder.create_expr_stmt(&body, Span::DUMMY).set_expr(call);
    }

    let Some(_main) = builder.create_function(module, Type::Void, "main", Scopes::public(), Vec::new(), Some(body), Span::DUMMY) else {
        panic!("demo main is declared exactly once");
    };
}
