//! Expressions (`spec.md §3` Expressions).

use crate::refs::Ref;
use crate::span::{Span, Spanned};
use crate::types::Type;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
    /// `++`/`--`; `fixity` on the node says prefix vs. postfix.
    Incr,
    Decr,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Fixity {
    Prefix,
    Postfix,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Short-circuiting binary operators lower to a two-block diamond with a
    /// `phi` (`spec.md §4.7`).
    #[must_use]
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

pub enum ExprKind {
    Value(Value),
    VarRef(Rc<Ref>),
    Call {
        callee: Rc<Ref>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        fixity: Fixity,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

/// An expression. `ty` is the "fill-after" field the resolver's bottom-up
/// typing walk populates (`spec.md §4.4` Expression typing); every other
/// field is set once by the builder and never mutated again.
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Span,
    ty: RefCell<Option<Type>>,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, loc: Span) -> Self {
        Expr {
            kind,
            loc,
            ty: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn ty(&self) -> Type {
        self.ty
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("Expr::ty() called before resolution"))
    }

    #[must_use]
    pub fn has_ty(&self) -> bool {
        self.ty.borrow().is_some()
    }

    /// Set (or rewrite, for an implicit widening promotion — `spec.md
    /// §4.4` "their result type is rewritten, which tells the lowering to
    /// insert a widening convert") this expression's resolved type.
    pub fn set_ty(&self, ty: Type) {
        *self.ty.borrow_mut() = Some(ty);
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.loc
    }
}
