//! Exercises the driver end-to-end (resolution only; LLVM lowering is
//! covered by `fly_codegen`'s own tests, which require a real LLVM
//! install). Grounded in `spec.md §8` S5.

use fly_diagnostic::DiagnosticQueue;
use flyc::CompileOptions;

#[test]
fn fail_ladder_resolves_without_fatal_diagnostics() {
    let program = flyc::demo::build_fail_ladder();
    let mut diagnostics = DiagnosticQueue::new();
    let result = flyc::compile(
        &program.modules,
        &program.registry,
        &program.interner,
        &mut diagnostics,
        &CompileOptions::default(),
    );

    assert!(result.is_ok(), "demo program should resolve cleanly");
    assert!(!diagnostics.is_fatal());
    let compiled = result.unwrap();
    assert_eq!(compiled.len(), 1);
    assert_eq!(compiled[0].name, "main");
}

#[test]
fn fail_ladder_declares_five_test_functions_and_main() {
    let program = flyc::demo::build_fail_ladder();
    let module = &program.modules[0];
    assert_eq!(module.functions.borrow().len(), 6);
    assert_eq!(module.classes.borrow().len(), 1);
}
