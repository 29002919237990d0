//! Typestate statement builders (`spec.md §4.1`, grounded on
//! `SemaBuilderStmt`/`SemaBuilderIfStmt`/`SemaBuilderSwitchStmt`/
//! `SemaBuilderLoopStmt`, recovered from `original_source`'s
//! `SemaBuilderStmt.h` family).
//!
//! A statement that needs exactly one follow-up call (the value for a
//! `return`, the arms of an `if`) is modeled as a builder consumed by that
//! call, so the parser cannot forget the follow-up or supply it twice — the
//! compiler enforces it instead of a runtime check.

use fly_ir::{
    AssignOp, Block, Expr, IfArm, IfStmt, LoopInStmt, LoopStmt, Ref, Stmt, StmtKind, SwitchCase,
    SwitchStmt, Span,
};
use std::rc::Rc;

fn push(parent: &Rc<Block>, kind: StmtKind, loc: Span) {
    parent.stmts.borrow_mut().push(Stmt { kind, loc });
}

/// A `return` statement awaiting its (optional) value.
pub struct ReturnBuilder {
    parent: Rc<Block>,
    loc: Span,
}

impl ReturnBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span) -> Self {
        ReturnBuilder { parent, loc }
    }

    pub fn with_expr(self, expr: Expr) {
        push(&self.parent, StmtKind::Return(Some(expr)), self.loc);
    }

    pub fn without_expr(self) {
        push(&self.parent, StmtKind::Return(None), self.loc);
    }
}

/// A `fail` statement awaiting its (optional) error value.
pub struct FailBuilder {
    parent: Rc<Block>,
    loc: Span,
}

impl FailBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span) -> Self {
        FailBuilder { parent, loc }
    }

    pub fn with_expr(self, expr: Expr) {
        push(&self.parent, StmtKind::Fail(Some(expr)), self.loc);
    }

    pub fn without_expr(self) {
        push(&self.parent, StmtKind::Fail(None), self.loc);
    }
}

/// An expression statement awaiting its (mandatory) expression.
pub struct ExprStmtBuilder {
    parent: Rc<Block>,
    loc: Span,
}

impl ExprStmtBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span) -> Self {
        ExprStmtBuilder { parent, loc }
    }

    pub fn set_expr(self, expr: Expr) {
        push(&self.parent, StmtKind::Expr(expr), self.loc);
    }
}

/// An assignment statement awaiting its right-hand value.
pub struct AssignmentBuilder {
    parent: Rc<Block>,
    loc: Span,
    target: Rc<Ref>,
    op: AssignOp,
}

impl AssignmentBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span, target: Rc<Ref>, op: AssignOp) -> Self {
        AssignmentBuilder {
            parent,
            loc,
            target,
            op,
        }
    }

    pub fn set_value(self, value: Expr) {
        push(
            &self.parent,
            StmtKind::Assignment {
                target: self.target,
                op: self.op,
                value,
            },
            self.loc,
        );
    }
}

pub struct EmptyIf;

/// An `if`/`elif`/`else` chain. Arms accumulate in source order; at least
/// one arm is required (`spec.md §3`: an `IfStmt` always has ≥1 arm).
pub struct IfBuilder {
    parent: Rc<Block>,
    loc: Span,
    arms: Vec<IfArm>,
    else_block: Option<Rc<Block>>,
}

impl IfBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span) -> Self {
        IfBuilder {
            parent,
            loc,
            arms: Vec::new(),
            else_block: None,
        }
    }

    #[must_use]
    pub fn arm(mut self, cond: Expr, then: Rc<Block>) -> Self {
        self.arms.push(IfArm { cond, then });
        self
    }

    #[must_use]
    pub fn else_block(mut self, block: Rc<Block>) -> Self {
        self.else_block = Some(block);
        self
    }

    pub fn finish(self) -> Result<(), EmptyIf> {
        if self.arms.is_empty() {
            return Err(EmptyIf);
        }
        push(
            &self.parent,
            StmtKind::If(IfStmt {
                arms: self.arms,
                else_block: self.else_block,
            }),
            self.loc,
        );
        Ok(())
    }
}

/// A `switch` statement. The scrutinee is fixed at construction; cases and
/// an optional default accumulate afterward.
pub struct SwitchBuilder {
    parent: Rc<Block>,
    loc: Span,
    scrutinee: Expr,
    cases: Vec<SwitchCase>,
    default: Option<Rc<Block>>,
}

impl SwitchBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span, scrutinee: Expr) -> Self {
        SwitchBuilder {
            parent,
            loc,
            scrutinee,
            cases: Vec::new(),
            default: None,
        }
    }

    #[must_use]
    pub fn case(mut self, value: Expr, body: Rc<Block>) -> Self {
        self.cases.push(SwitchCase { value, body });
        self
    }

    #[must_use]
    pub fn default_block(mut self, body: Rc<Block>) -> Self {
        self.default = Some(body);
        self
    }

    pub fn finish(self) {
        push(
            &self.parent,
            StmtKind::Switch(SwitchStmt {
                scrutinee: self.scrutinee,
                cases: self.cases,
                default: self.default,
            }),
            self.loc,
        );
    }
}

pub struct MissingLoopBody;

/// A `while`/C-style `for` loop (`spec.md §3`: `LoopStmt` covers both —
/// `while` simply omits `init`/`post`).
pub struct LoopBuilder {
    parent: Rc<Block>,
    loc: Span,
    init: Option<Box<Stmt>>,
    cond: Option<Expr>,
    post: Option<Box<Stmt>>,
    body: Option<Rc<Block>>,
}

impl LoopBuilder {
    pub(crate) fn new(parent: Rc<Block>, loc: Span) -> Self {
        LoopBuilder {
            parent,
            loc,
            init: None,
            cond: None,
            post: None,
            body: None,
        }
    }

    #[must_use]
    pub fn init(mut self, stmt: Stmt) -> Self {
        self.init = Some(Box::new(stmt));
        self
    }

    #[must_use]
    pub fn cond(mut self, expr: Expr) -> Self {
        self.cond = Some(expr);
        self
    }

    #[must_use]
    pub fn post(mut self, stmt: Stmt) -> Self {
        self.post = Some(Box::new(stmt));
        self
    }

    #[must_use]
    pub fn body(mut self, block: Rc<Block>) -> Self {
        self.body = Some(block);
        self
    }

    pub fn finish(self) -> Result<(), MissingLoopBody> {
        let Some(body) = self.body else {
            return Err(MissingLoopBody);
        };
        push(
            &self.parent,
            StmtKind::Loop(LoopStmt {
                init: self.init,
                cond: self.cond,
                post: self.post,
                body,
            }),
            self.loc,
        );
        Ok(())
    }
}

pub(crate) fn push_loop_in(parent: &Rc<Block>, loc: Span, loop_in: LoopInStmt) {
    push(parent, StmtKind::LoopIn(loop_in), loc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_builder_rejects_zero_arms() {
        let block = Block::new(Span::DUMMY, None);
        let result = IfBuilder::new(block, Span::DUMMY).finish();
        assert!(result.is_err());
    }

    #[test]
    fn loop_builder_rejects_missing_body() {
        let block = Block::new(Span::DUMMY, None);
        let result = LoopBuilder::new(block, Span::DUMMY).finish();
        assert!(result.is_err());
    }
}
