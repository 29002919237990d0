//! The builder façade (`spec.md §4.1`): one entry point the parser calls to
//! construct every AST node, grounded on `SemaBuilder` and recovered from
//! `original_source`'s `SemaBuilder.h` method surface
//! (`CreateModule`, `CreateFunction`, `CreateClass`, ...).
//!
//! Construction invariants (empty names, duplicate module/global/function
//! names, malformed scope combinations) are rejected synchronously here —
//! deep semantic checks (type convertibility, reference resolution) are the
//! resolver's job (`spec.md §4.4`).

mod scopes;
mod stmt;

pub use scopes::{InvalidScopeCombination, ScopeBuilder};
pub use stmt::{
    AssignmentBuilder, EmptyIf, ExprStmtBuilder, FailBuilder, IfBuilder, LoopBuilder,
    MissingLoopBody, ReturnBuilder, SwitchBuilder,
};

use fly_diagnostic::{DiagnosticQueue, ErrorCode};
use fly_ir::{
    AssignOp, BinaryOp, Block, ClassAttribute, ClassDecl, ClassKind, ClassMethod, Comment,
    EnumDecl, EnumEntry, Expr, ExprKind, Fixity, Function, GlobalVar, IdentityDef, IdentityKind,
    IdentityRef, Import, Interner, LocalVar, LoopInStmt, MethodKind, Module, Parameter, Ref,
    Scopes, Span, Stmt, StmtKind, Type, UnaryOp, Value,
};
use crate::symbols::{DuplicateGlobal, DuplicateIdentity, DuplicateOverload, GlobalRegistry};
use rustc_hash::FxHashSet;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The name every `main` function is declared under; it never receives the
/// synthesized `%error*` parameter (`spec.md §4.9`).
const MAIN_FN: &str = "main";

pub struct Builder {
    interner: Rc<Interner>,
    registry: Rc<GlobalRegistry>,
    diagnostics: RefCell<DiagnosticQueue>,
    module_names: RefCell<FxHashSet<Name>>,
    next_module_id: Cell<u32>,
    /// One-slot buffer for the doc comment immediately preceding a
    /// declaration; cleared by any non-declaration construct
    /// (`SPEC_FULL.md §2`).
    pending_comment: RefCell<Option<Comment>>,
}

impl Builder {
    #[must_use]
    pub fn new(interner: Rc<Interner>, registry: Rc<GlobalRegistry>) -> Self {
        Builder {
            interner,
            registry,
            diagnostics: RefCell::new(DiagnosticQueue::new()),
            module_names: RefCell::new(FxHashSet::default()),
            next_module_id: Cell::new(0),
            pending_comment: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn interner(&self) -> &Rc<Interner> {
        &self.interner
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<GlobalRegistry> {
        &self.registry
    }

    pub fn into_diagnostics(self) -> DiagnosticQueue {
        self.diagnostics.into_inner()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().has_errors()
    }

    /// Attach a doc comment to whatever declaration is created next.
    pub fn note_comment(&self, text: &str, loc: Span) {
        *self.pending_comment.borrow_mut() = Some(Comment {
            text: Rc::from(text),
            loc,
        });
    }

    fn take_comment(&self) -> Option<Comment> {
        self.pending_comment.borrow_mut().take()
    }

    /// Any non-declaration construct (a statement, an expression) drops a
    /// comment that was never attached to anything.
    fn clear_comment_buffer(&self) {
        *self.pending_comment.borrow_mut() = None;
    }

    fn emit_error(&self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diagnostics.borrow_mut().emit_error(code, message, span);
    }

    // ---- Modules ---------------------------------------------------

    fn create_module_impl(&self, name: &str, namespace: &str, is_header: bool, loc: Span) -> Option<Rc<Module>> {
        if name.is_empty() {
            self.emit_error(ErrorCode::IDENTIFIER_EMPTY, "module name is empty", loc);
            return None;
        }
        if namespace.is_empty() {
            self.emit_error(ErrorCode::NAMESPACE_EMPTY, "namespace is empty", loc);
            return None;
        }
        let interned_name = self.interner.intern(name);
        if !self.module_names.borrow_mut().insert(interned_name) {
            self.emit_error(
                ErrorCode::MODULE_DUPLICATED,
                format!("module '{name}' already declared"),
                loc,
            );
            return None;
        }
        let id = self.next_module_id.get();
        self.next_module_id.set(id + 1);
        Some(Rc::new(Module {
            id,
            name: interned_name,
            namespace: self.interner.intern(namespace),
            is_header,
            imports: RefCell::new(Vec::new()),
            globals: RefCell::new(Vec::new()),
            functions: RefCell::new(Vec::new()),
            classes: RefCell::new(Vec::new()),
            enums: RefCell::new(Vec::new()),
        }))
    }

    pub fn create_module(&self, name: &str, namespace: &str, loc: Span) -> Option<Rc<Module>> {
        self.create_module_impl(name, namespace, false, loc)
    }

    /// A header module declares signatures only; no function/method may
    /// carry a body (`SPEC_FULL.md §2`).
    pub fn create_header_module(&self, name: &str, namespace: &str, loc: Span) -> Option<Rc<Module>> {
        self.create_module_impl(name, namespace, true, loc)
    }

    pub fn create_import(
        &self,
        module: &Rc<Module>,
        target_namespace: &str,
        alias: Option<&str>,
        loc: Span,
    ) -> Rc<Import> {
        self.clear_comment_buffer();
        let import = Rc::new(Import {
            target_namespace: self.interner.intern(target_namespace),
            alias: alias.map(|a| self.interner.intern(a)),
            loc,
            resolved: Cell::new(false),
        });
        module.imports.borrow_mut().push(import.clone());
        import
    }

    // ---- Globals / functions ----------------------------------------

    /// The type-appropriate default: `Value::Zero` for every primitive/array
    /// type; `None` for identity types, which need an explicit constructor
    /// call the builder cannot synthesize from a bare `Type`
    /// (`spec.md §4.1` Defaulting).
    #[must_use]
    pub fn create_default_value(&self, ty: &Type) -> Option<Value> {
        ty.default_is_zero_like().then_some(Value::Zero)
    }

    pub fn create_global_var(
        &self,
        module: &Rc<Module>,
        ty: Type,
        name: &str,
        scopes: Scopes,
        init: Option<Value>,
        loc: Span,
    ) -> Option<Rc<GlobalVar>> {
        let comment = self.take_comment();
        if name.is_empty() {
            self.emit_error(ErrorCode::IDENTIFIER_EMPTY, "global name is empty", loc);
            return None;
        }
        let interned = self.interner.intern(name);
        let init = init.or_else(|| self.create_default_value(&ty));
        let global = Rc::new(GlobalVar {
            name: interned,
            ty,
            loc,
            scopes,
            comment,
            init: RefCell::new(init),
        });
        match self.registry.insert_global(module.namespace, global.clone()) {
            Ok(()) => {
                module.globals.borrow_mut().push(global.clone());
                Some(global)
            }
            Err(DuplicateGlobal) => {
                self.emit_error(
                    ErrorCode::DUPLICATE_GLOBAL,
                    format!("global '{name}' already declared in this namespace"),
                    loc,
                );
                None
            }
        }
    }

    pub fn create_param(&self, ty: Type, name: &str, scopes: Scopes, default: Option<Value>, loc: Span) -> Rc<Parameter> {
        Rc::new(Parameter {
            name: self.interner.intern(name),
            ty,
            default,
            loc,
            scopes,
            is_error_handler: false,
        })
    }

    /// The synthesized leading `%error*` parameter every non-`main` function
    /// receives (`spec.md §4.9`).
    #[must_use]
    pub fn create_error_handler_param(&self) -> Rc<Parameter> {
        Parameter::error_handler(self.interner.intern("$error"))
    }

    fn check_duplicate_params(&self, params: &[Rc<Parameter>], loc: Span) -> bool {
        let mut seen = FxHashSet::default();
        for p in params {
            if !seen.insert(p.name) {
                self.emit_error(
                    ErrorCode::DUPLICATE_PARAM,
                    "duplicate parameter name",
                    loc,
                );
                return false;
            }
        }
        true
    }

    pub fn create_function(
        &self,
        module: &Rc<Module>,
        return_ty: Type,
        name: &str,
        scopes: Scopes,
        mut params: Vec<Rc<Parameter>>,
        body: Option<Rc<Block>>,
        loc: Span,
    ) -> Option<Rc<Function>> {
        let comment = self.take_comment();
        if name.is_empty() {
            self.emit_error(ErrorCode::IDENTIFIER_EMPTY, "function name is empty", loc);
            return None;
        }
        if !self.check_duplicate_params(&params, loc) {
            return None;
        }
        if name != MAIN_FN {
            params.insert(0, self.create_error_handler_param());
        }
        let function = Rc::new(Function {
            name: self.interner.intern(name),
            return_ty,
            params,
            body: RefCell::new(body),
            loc,
            scopes,
            comment,
            locals: RefCell::new(Vec::new()),
        });
        match self.registry.insert_function(module.namespace, function.clone()) {
            Ok(()) => {
                module.functions.borrow_mut().push(function.clone());
                Some(function)
            }
            Err(DuplicateOverload) => {
                self.emit_error(
                    ErrorCode::DUPLICATE_FUNCTION,
                    format!("function '{name}' duplicates an existing overload"),
                    loc,
                );
                None
            }
        }
    }

    // ---- Classes / structs -------------------------------------------

    pub fn create_class(
        &self,
        module: &Rc<Module>,
        kind: ClassKind,
        name: &str,
        scopes: Scopes,
        supers: Vec<IdentityRef>,
        loc: Span,
    ) -> Option<Rc<ClassDecl>> {
        let comment = self.take_comment();
        if name.is_empty() {
            self.emit_error(ErrorCode::IDENTIFIER_EMPTY, "class name is empty", loc);
            return None;
        }
        let interned = self.interner.intern(name);
        let class = Rc::new(ClassDecl {
            name: interned,
            kind,
            loc,
            scopes,
            comment,
            supers,
            attributes: RefCell::new(Vec::new()),
            constructors: RefCell::new(Vec::new()),
            methods: RefCell::new(Vec::new()),
        });
        // Every class starts with a synthesized zero-arg constructor; a
        // user-declared zero-arg constructor replaces it rather than
        // duplicating it (`spec.md §3` invariants, Open Question ii).
        let auto_ctor = Rc::new(ClassMethod {
            name: interned,
            return_ty: Type::Identity(IdentityRef::new(
                if class.is_struct() {
                    IdentityKind::Struct
                } else {
                    IdentityKind::Class
                },
                interned,
                loc,
            )),
            // Every constructor call lowers to `T_T(%error*, %T*, args...)`
            // regardless of class/struct (`spec.md §4.7` Object creation,
            // `§8` S2) — only non-constructor struct methods drop the
            // receiver, never the error pointer.
            params: vec![self.create_error_handler_param()],
            body: RefCell::new(None),
            loc,
            scopes: Scopes::public(),
            kind: MethodKind::Constructor,
            locals: RefCell::new(Vec::new()),
            vtable_slot: None,
        });
        class.constructors.borrow_mut().push(auto_ctor);
        match self
            .registry
            .insert_identity(module.namespace, interned, IdentityDef::Class(class.clone()))
        {
            Ok(()) => {
                module.classes.borrow_mut().push(class.clone());
                Some(class)
            }
            Err(DuplicateIdentity) => {
                self.emit_error(
                    ErrorCode::MODULE_DUPLICATED,
                    format!("type '{name}' already declared in this namespace"),
                    loc,
                );
                None
            }
        }
    }

    pub fn create_class_attribute(
        &self,
        class: &Rc<ClassDecl>,
        ty: Type,
        name: &str,
        scopes: Scopes,
        default: Option<Value>,
        loc: Span,
    ) -> Option<Rc<ClassAttribute>> {
        let interned = self.interner.intern(name);
        let mut attrs = class.attributes.borrow_mut();
        if attrs.iter().any(|a| a.name == interned) {
            self.emit_error(
                ErrorCode::CLASS_FIELD_REDECLARE,
                format!("field '{name}' already declared"),
                loc,
            );
            return None;
        }
        let field_index = u32::try_from(attrs.len()).unwrap_or_else(|_| panic!("more fields than u32::MAX"));
        let attr = Rc::new(ClassAttribute {
            name: interned,
            ty,
            loc,
            scopes,
            default,
            field_index,
        });
        attrs.push(attr.clone());
        Some(attr)
    }

    /// A user-declared constructor. A zero-arg user constructor replaces the
    /// synthesized auto-default one rather than sitting alongside it as a
    /// duplicate (Open Question ii).
    pub fn create_class_constructor(
        &self,
        class: &Rc<ClassDecl>,
        scopes: Scopes,
        mut params: Vec<Rc<Parameter>>,
        body: Option<Rc<Block>>,
        loc: Span,
    ) -> Option<Rc<ClassMethod>> {
        if !self.check_duplicate_params(&params, loc) {
            return None;
        }
        params.insert(0, self.create_error_handler_param());
        let arity = params.iter().filter(|p| !p.is_error_handler).count();
        let ctor = Rc::new(ClassMethod {
            name: class.name,
            return_ty: Type::Identity(IdentityRef::new(
                if class.is_struct() {
                    IdentityKind::Struct
                } else {
                    IdentityKind::Class
                },
                class.name,
                loc,
            )),
            params,
            body: RefCell::new(body),
            loc,
            scopes,
            kind: MethodKind::Constructor,
            locals: RefCell::new(Vec::new()),
            vtable_slot: None,
        });
        let mut ctors = class.constructors.borrow_mut();
        if arity == 0 {
            // Drop the synthesized auto-default (zero user params, no body)
            // rather than let the user's own zero-arg constructor sit beside
            // it as a duplicate (Open Question ii).
            ctors.retain(|c| c.user_params().count() != 0 || c.body.borrow().is_some());
        } else if ctors
            .iter()
            .any(|c| c.user_params().count() == arity && types_match(c, &ctor))
        {
            self.emit_error(
                ErrorCode::CLASS_METHOD_REDECLARE,
                "constructor duplicates an existing overload",
                loc,
            );
            return None;
        }
        ctors.push(ctor.clone());
        Some(ctor)
    }

    pub fn create_class_method(
        &self,
        class: &Rc<ClassDecl>,
        return_ty: Type,
        name: &str,
        scopes: Scopes,
        mut params: Vec<Rc<Parameter>>,
        body: Option<Rc<Block>>,
        loc: Span,
    ) -> Option<Rc<ClassMethod>> {
        if !self.check_duplicate_params(&params, loc) {
            return None;
        }
        // Every function gets the leading error pointer (`spec.md §8` "every
        // function in the emitted IR has `%error*` as its first parameter
        // except `main`"); only the implicit receiver is struct-conditional
        // (`spec.md §4.6`: struct methods are static free functions).
        params.insert(0, self.create_error_handler_param());
        let kind = if class.is_struct() {
            MethodKind::Static
        } else {
            MethodKind::Instance
        };
        let interned = self.interner.intern(name);
        let mut methods = class.methods.borrow_mut();
        let arity = params.iter().filter(|p| !p.is_error_handler).count();
        if methods
            .iter()
            .any(|m| m.name == interned && m.user_params().count() == arity)
        {
            self.emit_error(
                ErrorCode::CLASS_METHOD_REDECLARE,
                format!("method '{name}' duplicates an existing overload"),
                loc,
            );
            return None;
        }
        let vtable_slot = (!class.is_struct())
            .then(|| u32::try_from(methods.len()).unwrap_or_else(|_| panic!("more methods than u32::MAX")));
        let method = Rc::new(ClassMethod {
            name: interned,
            return_ty,
            params,
            body: RefCell::new(body),
            loc,
            scopes,
            kind,
            locals: RefCell::new(Vec::new()),
            vtable_slot,
        });
        methods.push(method.clone());
        Some(method)
    }

    // ---- Enums --------------------------------------------------------

    pub fn create_enum(&self, module: &Rc<Module>, name: &str, scopes: Scopes, loc: Span) -> Option<Rc<EnumDecl>> {
        let comment = self.take_comment();
        let interned = self.interner.intern(name);
        let decl = Rc::new(EnumDecl {
            name: interned,
            loc,
            scopes,
            comment,
            entries: RefCell::new(Vec::new()),
        });
        match self
            .registry
            .insert_identity(module.namespace, interned, IdentityDef::Enum(decl.clone()))
        {
            Ok(()) => {
                module.enums.borrow_mut().push(decl.clone());
                Some(decl)
            }
            Err(DuplicateIdentity) => {
                self.emit_error(
                    ErrorCode::MODULE_DUPLICATED,
                    format!("type '{name}' already declared in this namespace"),
                    loc,
                );
                None
            }
        }
    }

    /// Entries are numbered in declaration order starting at 1
    /// (Open Question iii).
    pub fn create_enum_entry(&self, decl: &Rc<EnumDecl>, name: &str, scopes: Scopes, loc: Span) -> Option<Rc<EnumEntry>> {
        let interned = self.interner.intern(name);
        let mut entries = decl.entries.borrow_mut();
        if entries.iter().any(|e| e.name == interned) {
            self.emit_error(
                ErrorCode::ENUM_VAR,
                format!("enum entry '{name}' already declared"),
                loc,
            );
            return None;
        }
        let ordinal = u32::try_from(entries.len()).unwrap_or_else(|_| panic!("more entries than u32::MAX")) + 1;
        let entry = Rc::new(EnumEntry {
            name: interned,
            loc,
            scopes,
            ordinal,
        });
        entries.push(entry.clone());
        Some(entry)
    }

    // ---- Locals / blocks ------------------------------------------------

    #[must_use]
    pub fn create_block(&self, parent: Option<&Rc<Block>>, loc: Span) -> Rc<Block> {
        self.clear_comment_buffer();
        Block::new(loc, parent)
    }

    pub fn create_local_var(
        &self,
        block: &Rc<Block>,
        ty: Type,
        name: &str,
        scopes: Scopes,
        loc: Span,
    ) -> Option<Rc<LocalVar>> {
        let interned = self.interner.intern(name);
        if block.locals.borrow().contains_key(&interned) {
            self.emit_error(
                ErrorCode::DUPLICATE_LOCAL,
                format!("local '{name}' already declared in this block"),
                loc,
            );
            return None;
        }
        let local = Rc::new(LocalVar {
            name: interned,
            ty,
            loc,
            scopes,
        });
        block.locals.borrow_mut().insert(interned, local.clone());
        Some(local)
    }

    // ---- References -----------------------------------------------------

    #[must_use]
    pub fn create_ref(&self, name: &str, parent: Option<Box<Ref>>, loc: Span) -> Rc<Ref> {
        Rc::new(Ref::new(self.interner.intern(name), loc, parent))
    }

    // ---- Expressions ------------------------------------------------------

    #[must_use]
    pub fn create_value_expr(&self, value: Value, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(ExprKind::Value(value), loc)
    }

    #[must_use]
    pub fn create_var_ref_expr(&self, r: Rc<Ref>, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(ExprKind::VarRef(r), loc)
    }

    #[must_use]
    pub fn create_call_expr(&self, callee: Rc<Ref>, args: Vec<Expr>, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(ExprKind::Call { callee, args }, loc)
    }

    #[must_use]
    pub fn create_unary_op_expr(&self, op: UnaryOp, operand: Expr, fixity: Fixity, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
                fixity,
            },
            loc,
        )
    }

    #[must_use]
    pub fn create_binary_op_expr(&self, op: BinaryOp, lhs: Expr, rhs: Expr, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            loc,
        )
    }

    #[must_use]
    pub fn create_ternary_op_expr(&self, cond: Expr, then_branch: Expr, else_branch: Expr, loc: Span) -> Expr {
        self.clear_comment_buffer();
        Expr::new(
            ExprKind::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            loc,
        )
    }

    // ---- Simple statements ------------------------------------------------

    #[must_use]
    pub fn create_assignment_stmt(
        &self,
        parent: &Rc<Block>,
        target: Rc<Ref>,
        op: AssignOp,
        loc: Span,
    ) -> AssignmentBuilder {
        self.clear_comment_buffer();
        AssignmentBuilder::new(parent.clone(), loc, target, op)
    }

    #[must_use]
    pub fn create_return_stmt(&self, parent: &Rc<Block>, loc: Span) -> ReturnBuilder {
        self.clear_comment_buffer();
        ReturnBuilder::new(parent.clone(), loc)
    }

    #[must_use]
    pub fn create_fail_stmt(&self, parent: &Rc<Block>, loc: Span) -> FailBuilder {
        self.clear_comment_buffer();
        FailBuilder::new(parent.clone(), loc)
    }

    #[must_use]
    pub fn create_expr_stmt(&self, parent: &Rc<Block>, loc: Span) -> ExprStmtBuilder {
        self.clear_comment_buffer();
        ExprStmtBuilder::new(parent.clone(), loc)
    }

    pub fn create_break_stmt(&self, parent: &Rc<Block>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Break,
            loc,
        });
    }

    pub fn create_continue_stmt(&self, parent: &Rc<Block>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Continue,
            loc,
        });
    }

    pub fn create_delete_stmt(&self, parent: &Rc<Block>, target: Rc<Ref>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Delete(target),
            loc,
        });
    }

    pub fn create_var_decl_stmt(&self, parent: &Rc<Block>, local: Rc<LocalVar>, init: Option<Expr>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::VarDecl { local, init },
            loc,
        });
    }

    pub fn create_block_stmt(&self, parent: &Rc<Block>, child: Rc<Block>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Block(child),
            loc,
        });
    }

    pub fn create_loop_in_stmt(
        &self,
        parent: &Rc<Block>,
        var: Rc<LocalVar>,
        iterable: Expr,
        body: Rc<Block>,
        loc: Span,
    ) {
        self.clear_comment_buffer();
        stmt::push_loop_in(parent, loc, LoopInStmt { var, iterable, body });
    }

    pub fn create_handle_stmt(&self, parent: &Rc<Block>, error_var: Option<Rc<LocalVar>>, body: Rc<Block>, loc: Span) {
        self.clear_comment_buffer();
        parent.stmts.borrow_mut().push(Stmt {
            kind: StmtKind::Handle(fly_ir::HandleStmt { error_var, body }),
            loc,
        });
    }

    // ---- Compound control flow ---------------------------------------------

    #[must_use]
    pub fn create_if_builder(&self, parent: &Rc<Block>, loc: Span) -> IfBuilder {
        self.clear_comment_buffer();
        IfBuilder::new(parent.clone(), loc)
    }

    #[must_use]
    pub fn create_switch_builder(&self, parent: &Rc<Block>, scrutinee: Expr, loc: Span) -> SwitchBuilder {
        self.clear_comment_buffer();
        SwitchBuilder::new(parent.clone(), loc, scrutinee)
    }

    #[must_use]
    pub fn create_loop_builder(&self, parent: &Rc<Block>, loc: Span) -> LoopBuilder {
        self.clear_comment_buffer();
        LoopBuilder::new(parent.clone(), loc)
    }
}

fn types_match(existing: &ClassMethod, new: &ClassMethod) -> bool {
    let existing_types: Vec<_> = existing.user_params().map(|p| p.ty.clone()).collect();
    let new_types: Vec<_> = new.user_params().map(|p| p.ty.clone()).collect();
    existing_types == new_types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_builder() -> Builder {
        Builder::new(Rc::new(Interner::new()), Rc::new(GlobalRegistry::new()))
    }

    #[test]
    fn duplicate_module_name_is_rejected() {
        let b = new_builder();
        assert!(b.create_module("m", "ns", Span::DUMMY).is_some());
        assert!(b.create_module("m", "ns", Span::DUMMY).is_none());
        assert!(b.has_errors());
    }

    #[test]
    fn function_gains_implicit_error_param_except_main() {
        let b = new_builder();
        let module = b.create_module("m", "ns", Span::DUMMY).unwrap();
        let f = b
            .create_function(&module, Type::Void, "f", Scopes::public(), vec![], None, Span::DUMMY)
            .unwrap();
        assert_eq!(f.params.len(), 1);
        assert!(f.params[0].is_error_handler);

        let main = b
            .create_function(
                &module,
                Type::Int {
                    bits: fly_ir::IntBits::B32,
                    signed: true,
                },
                "main",
                Scopes::public(),
                vec![],
                None,
                Span::DUMMY,
            )
            .unwrap();
        assert!(main.params.is_empty());
    }

    #[test]
    fn class_starts_with_auto_default_constructor() {
        let b = new_builder();
        let module = b.create_module("m", "ns", Span::DUMMY).unwrap();
        let class = b
            .create_class(&module, ClassKind::Class, "Point", Scopes::public(), vec![], Span::DUMMY)
            .unwrap();
        assert_eq!(class.constructors.borrow().len(), 1);
    }

    #[test]
    fn user_zero_arg_constructor_replaces_auto_default() {
        let b = new_builder();
        let module = b.create_module("m", "ns", Span::DUMMY).unwrap();
        let class = b
            .create_class(&module, ClassKind::Class, "Point", Scopes::public(), vec![], Span::DUMMY)
            .unwrap();
        b.create_class_constructor(&class, Scopes::public(), vec![], Some(Block::new(Span::DUMMY, None)), Span::DUMMY)
            .unwrap();
        assert_eq!(class.constructors.borrow().len(), 1);
        assert!(class.constructors.borrow()[0].body.borrow().is_some());
    }

    #[test]
    fn enum_entries_are_numbered_from_one() {
        let b = new_builder();
        let module = b.create_module("m", "ns", Span::DUMMY).unwrap();
        let e = b.create_enum(&module, "Color", Scopes::public(), Span::DUMMY).unwrap();
        let red = b.create_enum_entry(&e, "RED", Scopes::public(), Span::DUMMY).unwrap();
        let green = b.create_enum_entry(&e, "GREEN", Scopes::public(), Span::DUMMY).unwrap();
        assert_eq!(red.ordinal, 1);
        assert_eq!(green.ordinal, 2);
    }
}
