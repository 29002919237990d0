//! Pass 1 — imports & interfaces (`spec.md §4.4`).
//!
//! Registering a module's own public defs into its namespace's symbol set
//! already happens at construction time (`fly_sema::Builder::create_*`
//! calls `GlobalRegistry::insert_*` as each node is built), so this pass
//! only has two jobs left: confirm every import names a namespace that
//! exists, and walk every signature materializing its `IdentityRef`s.

use fly_diagnostic::{DiagnosticQueue, ErrorCode};
use fly_ir::{IdentityDef, Module, Name, Type};
use fly_sema::symbols::GlobalRegistry;
use std::rc::Rc;

pub fn run(modules: &[Rc<Module>], registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    for module in modules {
        resolve_imports(module, registry, diagnostics);
    }
    for module in modules {
        materialize_signatures(module, registry, diagnostics);
    }
}

fn resolve_imports(module: &Rc<Module>, registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    for import in module.imports.borrow().iter() {
        if registry.find_namespace(import.target_namespace).is_some() {
            import.resolved.set(true);
        } else {
            diagnostics.emit_fatal(
                ErrorCode::IMPORT_UNDEFINED,
                "imported namespace does not exist",
                import.loc,
            );
        }
    }
}

/// `current module → current namespace → each resolved import's namespace`
/// (`spec.md §4.4` pass 1 step 3).
pub(crate) fn find_identity(module: &Rc<Module>, registry: &GlobalRegistry, name: Name) -> Option<IdentityDef> {
    for class in module.classes.borrow().iter() {
        if class.name == name {
            return Some(IdentityDef::Class(class.clone()));
        }
    }
    for e in module.enums.borrow().iter() {
        if e.name == name {
            return Some(IdentityDef::Enum(e.clone()));
        }
    }
    if let Some(ns) = registry.find_namespace(module.namespace) {
        if let Some(def) = ns.borrow().identities.get(&name) {
            return Some(def.clone());
        }
    }
    for import in module.imports.borrow().iter() {
        if !import.resolved.get() {
            continue;
        }
        if let Some(ns) = registry.find_namespace(import.target_namespace) {
            if let Some(def) = ns.borrow().identities.get(&name) {
                return Some(def.clone());
            }
        }
    }
    None
}

fn resolve_type(ty: &Type, module: &Rc<Module>, registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    match ty {
        Type::Identity(identity_ref) if !identity_ref.is_resolved() => {
            match find_identity(module, registry, identity_ref.qualified_name) {
                Some(def) => identity_ref.resolve(def),
                None => {
                    diagnostics.emit_error(ErrorCode::UNREF_TYPE, "unresolved type reference", identity_ref.loc);
                }
            }
        }
        Type::Array { elem, .. } => resolve_type(elem, module, registry, diagnostics),
        _ => {}
    }
}

fn materialize_signatures(module: &Rc<Module>, registry: &GlobalRegistry, diagnostics: &mut DiagnosticQueue) {
    for function in module.functions.borrow().iter() {
        for param in &function.params {
            resolve_type(&param.ty, module, registry, diagnostics);
        }
        resolve_type(&function.return_ty, module, registry, diagnostics);
    }
    for class in module.classes.borrow().iter() {
        for super_ref in &class.supers {
            if !super_ref.is_resolved() {
                match find_identity(module, registry, super_ref.qualified_name) {
                    Some(def) => super_ref.resolve(def),
                    None => {
                        diagnostics.emit_error(ErrorCode::UNREF_TYPE, "unresolved superclass", super_ref.loc);
                    }
                }
            }
        }
        for attr in class.attributes.borrow().iter() {
            resolve_type(&attr.ty, module, registry, diagnostics);
        }
        for ctor in class.constructors.borrow().iter() {
            for param in &ctor.params {
                resolve_type(&param.ty, module, registry, diagnostics);
            }
        }
        for method in class.methods.borrow().iter() {
            for param in &method.params {
                resolve_type(&param.ty, module, registry, diagnostics);
            }
            resolve_type(&method.return_ty, module, registry, diagnostics);
        }
    }
    for global in module.globals.borrow().iter() {
        resolve_type(&global.ty, module, registry, diagnostics);
    }
}
