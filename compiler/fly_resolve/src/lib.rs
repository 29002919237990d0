//! Fly resolve — the two-pass name/type resolver (`spec.md §4.4`).
//!
//! Pass 1 confirms imports and materializes every `IdentityRef` in a
//! signature; pass 2 walks bodies, resolving every `Ref` and typing every
//! `Expr`. Both passes read/write the same `GlobalRegistry` the builder
//! (`fly_sema`) populated while constructing the program.

mod pass1;
mod pass2;

use fly_diagnostic::DiagnosticQueue;
use fly_ir::Module;
use fly_sema::symbols::GlobalRegistry;
use std::rc::Rc;
use tracing::debug;

/// Resolves every module in a program in place. Modules share one
/// `GlobalRegistry` (cross-module namespace lookups) but each carries its
/// own `IdentityRef`/`Ref` cells, mutated through shared `Rc`s — no value is
/// returned because there is nothing to return but already-mutated state.
pub fn resolve_program(modules: &[Rc<Module>], registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    debug!(modules = modules.len(), "pass 1: imports & interfaces");
    pass1::run(modules, registry, diagnostics);
    if diagnostics.is_fatal() {
        return;
    }
    debug!("pass 2: bodies");
    pass2::run(modules, registry, diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_ir::{Block, Function, GlobalVar, Import, Interner, Scopes, Span, Stmt, StmtKind, Type, Value};
    use fly_sema::Builder;
    use std::cell::{Cell, RefCell};

    fn setup() -> (Rc<Interner>, Builder) {
        let interner = Rc::new(Interner::new());
        let registry = Rc::new(GlobalRegistry::new());
        let builder = Builder::new(interner.clone(), registry);
        (interner, builder)
    }

    #[test]
    fn global_initializer_type_mismatch_is_reported() {
        let (interner, builder) = setup();
        let module = builder.create_module("m", "app", Span::DUMMY).unwrap();

        let name = interner.intern("ready");
        let global = Rc::new(GlobalVar {
            name,
            ty: Type::Bool,
            loc: Span::DUMMY,
            scopes: Scopes::default(),
            comment: None,
            init: RefCell::new(Some(Value::Bool(false))),
        });
        module.globals.borrow_mut().push(global);

        let registry = builder.registry().clone();
        let mut diagnostics = builder.into_diagnostics();
        resolve_program(&[module], &registry, &mut diagnostics);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn unresolved_variable_reference_is_reported() {
        let (interner, builder) = setup();
        let module = builder.create_module("m", "app", Span::DUMMY).unwrap();

        let fn_name = interner.intern("f");
        let body = Block::new(Span::DUMMY, None);
        let missing = interner.intern("missing");
        let r = fly_ir::Ref::new(missing, Span::DUMMY, None);
        body.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Expr(fly_ir::Expr::new(fly_ir::ExprKind::VarRef(Rc::new(r)), Span::DUMMY)),
            loc: Span::DUMMY,
        });
        let function = Rc::new(Function {
            name: fn_name,
            return_ty: Type::Void,
            params: vec![],
            body: RefCell::new(Some(body)),
            loc: Span::DUMMY,
            scopes: Scopes::default(),
            comment: None,
            locals: RefCell::new(Vec::new()),
        });
        module.functions.borrow_mut().push(function);

        let registry = builder.registry().clone();
        let mut diagnostics = builder.into_diagnostics();
        resolve_program(&[module], &registry, &mut diagnostics);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn undeclared_import_is_fatal() {
        let (interner, builder) = setup();
        let module = builder.create_module("m", "app", Span::DUMMY).unwrap();
        module.imports.borrow_mut().push(Rc::new(Import {
            target_namespace: interner.intern("nowhere"),
            alias: None,
            loc: Span::DUMMY,
            resolved: Cell::new(false),
        }));

        let registry = builder.registry().clone();
        let mut diagnostics = builder.into_diagnostics();
        resolve_program(&[module], &registry, &mut diagnostics);
        assert!(diagnostics.is_fatal());
    }
}
