//! Module-level LLVM compilation (`spec.md §4.7`).
//!
//! Drives the full per-module pipeline: declare everything first (`declare.rs`),
//! so a function can call one declared later in the same module, then
//! generate every body.

use crate::context::Ctx;
use crate::{declare, functions, objects};
use fly_ir::{Interner, Module};
use inkwell::context::Context;
use std::rc::Rc;
use tracing::debug;

/// Compiler for a complete Fly module, wrapping the shared [`Ctx`] the way
/// `ori_llvm::ModuleCompiler` wraps its own codegen handle.
pub struct ModuleCompiler<'ll> {
    ctx: Ctx<'ll>,
}

impl<'ll> ModuleCompiler<'ll> {
    #[must_use]
    pub fn new(llcx: &'ll Context, interner: Rc<Interner>, module_name: &str) -> Self {
        ModuleCompiler { ctx: Ctx::new(llcx, interner, module_name) }
    }

    #[must_use]
    pub fn ctx(&self) -> &Ctx<'ll> {
        &self.ctx
    }

    #[must_use]
    pub fn module(&self) -> &inkwell::module::Module<'ll> {
        &self.ctx.llmod
    }

    #[must_use]
    pub fn print_to_string(&self) -> String {
        self.ctx.llmod.print_to_string().to_string()
    }

    /// Lowers every declaration in `module` to LLVM IR.
    pub fn compile(&self, module: &Module) {
        debug!(name = %self.ctx.name_str(module.name), "compile module");
        declare::declare_runtime(&self.ctx);
        declare::predeclare_classes(&self.ctx, module);
        declare::define_class_layouts(&self.ctx, module);
        for class in module.classes.borrow().iter() {
            declare::declare_class_members(&self.ctx, class);
        }
        declare::declare_functions(&self.ctx, module);
        declare::declare_globals(&self.ctx, module);
        for enum_decl in module.enums.borrow().iter() {
            declare::declare_enum(&self.ctx, enum_decl);
        }

        // Every method/constructor is predeclared by now, so the vtable
        // constant (which references each method's `FunctionValue`) can be
        // built before any constructor body needs to read it back.
        for class in module.classes.borrow().iter() {
            objects::build_vtable_global(&self.ctx, class);
        }

        for function in module.functions.borrow().iter() {
            functions::gen_function(&self.ctx, function);
        }
        for class in module.classes.borrow().iter() {
            for ctor in class.constructors.borrow().iter() {
                functions::gen_method(&self.ctx, class, ctor);
            }
            for method in class.methods.borrow().iter() {
                functions::gen_method(&self.ctx, class, method);
            }
        }
    }
}
