//! Codegen context (`ori_llvm::context::SimpleCx` pattern).
//!
//! Bundles the LLVM context/module and the commonly used types so lowering
//! code doesn't re-derive `i1`/`i8`/pointer types at every call site. Also
//! owns the per-module declaration caches (functions, classes, enums) that
//! the two-phase declare/define split (`declare.rs`) populates before any
//! function body is lowered, so forward calls resolve without ordering
//! constraints.

use fly_ir::{Interner, Name};
use inkwell::context::Context;
use inkwell::module::Module as LlvmModule;
use inkwell::types::{BasicTypeEnum, IntType, PointerType, StructType};
use inkwell::values::{FunctionValue, GlobalValue};
use inkwell::AddressSpace;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// One class's LLVM layout: the named struct type plus the vtable type,
/// ready once `declare::predeclare_classes` has run (`spec.md §4.6`).
pub struct ClassLayout<'ll> {
    pub struct_ty: StructType<'ll>,
    pub vtable_ty: Option<StructType<'ll>>,
    pub vtable_global: Option<GlobalValue<'ll>>,
    pub has_vtable_slot: bool,
}

pub struct Ctx<'ll> {
    pub llcx: &'ll Context,
    pub llmod: LlvmModule<'ll>,
    pub interner: Rc<Interner>,

    pub ptr_ty: PointerType<'ll>,
    pub isize_ty: IntType<'ll>,

    /// `%error = type { i8, i32, i8* }` (`spec.md §6`).
    pub error_ty: StructType<'ll>,

    /// Keyed by the declaration's `Rc` address rather than `Name`: two
    /// overloads share a `Name` but are distinct declarations, and pass 2
    /// already gave every `Call`/method `Ref` the specific `Rc` it resolved
    /// to (`fly_resolve::pass2`), so that address is the natural cache key.
    pub functions: RefCell<FxHashMap<usize, FunctionValue<'ll>>>,
    pub classes: RefCell<FxHashMap<Name, ClassLayout<'ll>>>,
    pub globals: RefCell<FxHashMap<Name, GlobalValue<'ll>>>,

    /// `decl.rs`'s `ClassMethod`/`ClassAttribute` carry no back-pointer to
    /// their owning `ClassDecl` (by design, per `fly_ir::decl`'s own module
    /// doc on avoiding non-owning back-pointers) — codegen needs one to find
    /// a receiver's struct layout, so it keeps this side table instead of
    /// changing `fly_ir`.
    pub method_owner: RefCell<FxHashMap<usize, Name>>,
    pub attribute_owner: RefCell<FxHashMap<usize, Name>>,
}

impl<'ll> Ctx<'ll> {
    #[must_use]
    pub fn new(llcx: &'ll Context, interner: Rc<Interner>, module_name: &str) -> Self {
        let llmod = llcx.create_module(module_name);
        let ptr_ty = llcx.ptr_type(AddressSpace::default());
        let isize_ty = llcx.i64_type();
        let error_ty = llcx.opaque_struct_type("error");
        error_ty.set_body(
            &[llcx.i8_type().into(), llcx.i32_type().into(), ptr_ty.into()],
            false,
        );

        Ctx {
            llcx,
            llmod,
            interner,
            ptr_ty,
            isize_ty,
            error_ty,
            functions: RefCell::new(FxHashMap::default()),
            classes: RefCell::new(FxHashMap::default()),
            globals: RefCell::new(FxHashMap::default()),
            method_owner: RefCell::new(FxHashMap::default()),
            attribute_owner: RefCell::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn name_str(&self, name: Name) -> Rc<str> {
        self.interner.resolve(name)
    }

    #[inline]
    #[must_use]
    pub fn type_i1(&self) -> IntType<'ll> {
        self.llcx.bool_type()
    }

    #[inline]
    #[must_use]
    pub fn type_i8(&self) -> IntType<'ll> {
        self.llcx.i8_type()
    }

    #[inline]
    #[must_use]
    pub fn type_i32(&self) -> IntType<'ll> {
        self.llcx.i32_type()
    }

    #[inline]
    #[must_use]
    pub fn type_i64(&self) -> IntType<'ll> {
        self.llcx.i64_type()
    }

    #[must_use]
    pub fn get_function(&self, key: usize) -> Option<FunctionValue<'ll>> {
        self.functions.borrow().get(&key).copied()
    }

    pub fn register_function(&self, key: usize, func: FunctionValue<'ll>) {
        self.functions.borrow_mut().insert(key, func);
    }

    #[must_use]
    pub fn struct_basic(&self, ty: StructType<'ll>) -> BasicTypeEnum<'ll> {
        ty.into()
    }

    pub fn register_method_owner(&self, key: usize, class: Name) {
        self.method_owner.borrow_mut().insert(key, class);
    }

    #[must_use]
    pub fn method_owner_of(&self, key: usize) -> Name {
        self.method_owner.borrow()[&key]
    }

    pub fn register_attribute_owner(&self, key: usize, class: Name) {
        self.attribute_owner.borrow_mut().insert(key, class);
    }

    #[must_use]
    pub fn attribute_owner_of(&self, key: usize) -> Name {
        self.attribute_owner.borrow()[&key]
    }
}
