//! Statements (`spec.md §3` Statements).

use crate::decl::LocalVar;
use crate::expr::Expr;
use crate::name::Name;
use crate::refs::Ref;
use crate::span::{Span, Spanned};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
}

impl AssignOp {
    #[must_use]
    pub fn is_compound(self) -> bool {
        !matches!(self, AssignOp::Assign)
    }
}

/// A lexical block. Owns its own statement list and local-variable map;
/// lookups walk `parent` upward (`spec.md §3` invariants: "Every `Block`
/// records its `locals` map; lookups walk up the `parent` chain").
pub struct Block {
    pub loc: Span,
    pub stmts: RefCell<Vec<Stmt>>,
    pub locals: RefCell<FxHashMap<Name, Rc<LocalVar>>>,
    pub parent: Option<Weak<Block>>,
}

impl Block {
    #[must_use]
    pub fn new(loc: Span, parent: Option<&Rc<Block>>) -> Rc<Block> {
        Rc::new(Block {
            loc,
            stmts: RefCell::new(Vec::new()),
            locals: RefCell::new(FxHashMap::default()),
            parent: parent.map(Rc::downgrade),
        })
    }

    /// Look up a local by name in this block or any enclosing block.
    #[must_use]
    pub fn find_local(self: &Rc<Self>, name: Name) -> Option<Rc<LocalVar>> {
        if let Some(local) = self.locals.borrow().get(&name) {
            return Some(local.clone());
        }
        self.parent.as_ref()?.upgrade()?.find_local(name)
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.loc
    }
}

pub struct IfArm {
    pub cond: Expr,
    pub then: Rc<Block>,
}

pub struct IfStmt {
    pub arms: Vec<IfArm>,
    pub else_block: Option<Rc<Block>>,
}

pub struct SwitchCase {
    pub value: Expr,
    pub body: Rc<Block>,
}

pub struct SwitchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Rc<Block>>,
}

/// Covers both `while` (no init/post) and C-style `for` (`spec.md §3`).
pub struct LoopStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Rc<Block>,
}

pub struct LoopInStmt {
    pub var: Rc<LocalVar>,
    pub iterable: Expr,
    pub body: Rc<Block>,
}

pub struct HandleStmt {
    pub error_var: Option<Rc<LocalVar>>,
    pub body: Rc<Block>,
}

pub enum StmtKind {
    Block(Rc<Block>),
    Expr(Expr),
    VarDecl {
        local: Rc<LocalVar>,
        init: Option<Expr>,
    },
    Assignment {
        target: Rc<Ref>,
        op: AssignOp,
        value: Expr,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    If(IfStmt),
    Switch(SwitchStmt),
    Loop(LoopStmt),
    LoopIn(LoopInStmt),
    Handle(HandleStmt),
    Fail(Option<Expr>),
    Delete(Rc<Ref>),
}

pub struct Stmt {
    pub kind: StmtKind,
    pub loc: Span,
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.loc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Interner;
    use crate::scope::Scopes;
    use crate::types::Type;

    #[test]
    fn find_local_walks_up_parent_chain() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let root = Block::new(Span::DUMMY, None);
        root.locals.borrow_mut().insert(
            x,
            Rc::new(LocalVar {
                name: x,
                ty: Type::Bool,
                loc: Span::DUMMY,
                scopes: Scopes::default(),
            }),
        );
        let child = Block::new(Span::DUMMY, Some(&root));
        assert!(child.find_local(x).is_some());
        assert!(root.find_local(interner.intern("y")).is_none());
    }
}
