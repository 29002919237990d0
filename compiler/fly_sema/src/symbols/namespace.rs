//! Per-namespace symbol tables (`spec.md §4.2`).

use crate::symbols::overload::{DuplicateOverload, Overloadable, OverloadTable};
use fly_ir::{ClassMethod, Function, GlobalVar, IdentityDef, Name};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

impl Overloadable for Function {
    fn name(&self) -> Name {
        self.name
    }
    fn param_types(&self) -> Vec<fly_ir::Type> {
        self.user_params().map(|p| p.ty.clone()).collect()
    }
}

impl Overloadable for ClassMethod {
    fn name(&self) -> Name {
        self.name
    }
    fn param_types(&self) -> Vec<fly_ir::Type> {
        self.user_params().map(|p| p.ty.clone()).collect()
    }
}

/// One namespace's exported symbols: globals, identities (classes/enums),
/// and an overload table of free functions (`spec.md §4.2`).
#[derive(Default)]
pub struct NamespaceSymbols {
    pub globals: FxHashMap<Name, Rc<GlobalVar>>,
    pub identities: FxHashMap<Name, IdentityDef>,
    pub functions: OverloadTable<Function>,
}

/// The global, cross-module namespace registry.
///
/// Built monotonically during pass 1 and only read during pass 2/lowering —
/// no locking is needed because compilation is single-threaded and
/// sequential per module (`spec.md §5`).
#[derive(Default)]
pub struct GlobalRegistry {
    namespaces: RefCell<FxHashMap<Name, Rc<RefCell<NamespaceSymbols>>>>,
}

pub struct DuplicateGlobal;
pub struct DuplicateIdentity;

impl GlobalRegistry {
    #[must_use]
    pub fn new() -> Self {
        GlobalRegistry::default()
    }

    #[must_use]
    pub fn namespace(&self, name: Name) -> Rc<RefCell<NamespaceSymbols>> {
        self.namespaces
            .borrow_mut()
            .entry(name)
            .or_insert_with(|| Rc::new(RefCell::new(NamespaceSymbols::default())))
            .clone()
    }

    #[must_use]
    pub fn find_namespace(&self, name: Name) -> Option<Rc<RefCell<NamespaceSymbols>>> {
        self.namespaces.borrow().get(&name).cloned()
    }

    pub fn insert_global(
        &self,
        ns: Name,
        global: Rc<GlobalVar>,
    ) -> Result<(), DuplicateGlobal> {
        let namespace = self.namespace(ns);
        let mut table = namespace.borrow_mut();
        if table.globals.contains_key(&global.name) {
            return Err(DuplicateGlobal);
        }
        table.globals.insert(global.name, global);
        Ok(())
    }

    pub fn insert_identity(&self, ns: Name, name: Name, def: IdentityDef) -> Result<(), DuplicateIdentity> {
        let namespace = self.namespace(ns);
        let mut table = namespace.borrow_mut();
        if table.identities.contains_key(&name) {
            return Err(DuplicateIdentity);
        }
        table.identities.insert(name, def);
        Ok(())
    }

    pub fn insert_function(
        &self,
        ns: Name,
        function: Rc<Function>,
    ) -> Result<(), DuplicateOverload> {
        let namespace = self.namespace(ns);
        let mut table = namespace.borrow_mut();
        table.functions.insert(function)
    }
}
