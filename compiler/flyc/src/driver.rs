//! Resolve + lower a program of already-built modules.
//!
//! Parsing is out of scope (`spec.md §1`): modules arrive fully built, the
//! way an external parser driving `fly_sema::Builder` hands them off. This
//! is the one place the three resolved crates (`fly_sema`, `fly_resolve`,
//! `fly_codegen`) meet.

use crate::options::{CompileOptions, DriverError};
use fly_diagnostic::DiagnosticQueue;
use fly_ir::{Interner, Module, Name};
use fly_sema::symbols::GlobalRegistry;
use std::rc::Rc;
use tracing::info;

#[cfg(feature = "llvm")]
use fly_codegen::ModuleCompiler;
#[cfg(feature = "llvm")]
use inkwell::context::Context;

/// One module's compiled LLVM IR, ready for an external object emitter.
pub struct CompiledModule {
    pub name: String,
    pub llvm_ir: String,
}

fn resolve_name(interner: &Rc<Interner>, name: Name) -> String {
    interner.resolve(name).to_string()
}

/// Runs both resolver passes, then (behind the `llvm` feature) lowers every
/// module to LLVM IR. Returns one `CompiledModule` per input module, in
/// input order. Without the `llvm` feature only resolution runs — useful
/// for a diagnostics-only front end on a machine with no LLVM installed.
pub fn compile(
    modules: &[Rc<Module>],
    registry: &GlobalRegistry,
    interner: &Rc<Interner>,
    diagnostics: &mut DiagnosticQueue,
    options: &CompileOptions,
) -> Result<Vec<CompiledModule>, DriverError> {
    info!(modules = modules.len(), "resolving program");
    fly_resolve::resolve_program(modules, registry, diagnostics);
    if diagnostics.is_fatal() {
        return Err(DriverError::FatalDiagnostics {
            count: diagnostics.diagnostics().len(),
        });
    }

    lower(modules, interner, options)
}

#[cfg(feature = "llvm")]
fn lower(modules: &[Rc<Module>], interner: &Rc<Interner>, options: &CompileOptions) -> Result<Vec<CompiledModule>, DriverError> {
    let mut compiled = Vec::with_capacity(modules.len());
    for module in modules {
        let llcx = Context::create();
        let name = resolve_name(interner, module.name);
        info!(module = %name, "lowering to LLVM IR");
        let compiler = ModuleCompiler::new(&llcx, interner.clone(), &name);
        compiler.compile(module);
        let llvm_ir = compiler.print_to_string();
        if options.emit_llvm_to_stdout {
            println!("{llvm_ir}");
        }
        compiled.push(CompiledModule { name, llvm_ir });
    }
    Ok(compiled)
}

#[cfg(not(feature = "llvm"))]
fn lower(modules: &[Rc<Module>], interner: &Rc<Interner>, _options: &CompileOptions) -> Result<Vec<CompiledModule>, DriverError> {
    Ok(modules
        .iter()
        .map(|module| CompiledModule {
            name: resolve_name(interner, module.name),
            llvm_ir: String::new(),
        })
        .collect())
}
