//! Generic traversal over the AST.
//!
//! Mutable walks visit children before their parent, so a callback that
//! replaces a node sees already-rewritten arguments.

use crate::ast::{
    ExecutionPart, Expr, ExprKind, Index, Program, ProgramUnit, Stmt, StmtKind, VarDecl,
};
use crate::Result;

pub fn walk_program_exprs_mut<F>(program: &mut Program, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    for unit in &mut program.units {
        walk_unit_exprs_mut(unit, f)?;
    }
    Ok(())
}

pub fn walk_unit_exprs_mut<F>(unit: &mut ProgramUnit, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    for decl in &mut unit.specification {
        walk_decl_exprs_mut(decl, f)?;
    }
    walk_block_exprs_mut(&mut unit.execution, f)?;
    for child in &mut unit.contains {
        walk_unit_exprs_mut(child, f)?;
    }
    Ok(())
}

fn walk_decl_exprs_mut<F>(decl: &mut VarDecl, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    for dim in &mut decl.dims {
        if let Some(lower) = dim.lower.as_mut() {
            walk_expr_mut(lower, f)?;
        }
        walk_expr_mut(&mut dim.upper, f)?;
    }
    if let Some(init) = decl.init.as_mut() {
        walk_expr_mut(init, f)?;
    }
    Ok(())
}

pub fn walk_block_exprs_mut<F>(block: &mut ExecutionPart, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    for stmt in &mut block.stmts {
        walk_stmt_exprs_mut(stmt, f)?;
    }
    Ok(())
}

pub fn walk_stmt_exprs_mut<F>(stmt: &mut Stmt, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    match &mut stmt.kind {
        StmtKind::Assign(assign) => {
            walk_expr_mut(&mut assign.target, f)?;
            walk_expr_mut(&mut assign.value, f)?;
        }
        StmtKind::Decl(decl) => {
            for var in &mut decl.vars {
                walk_decl_exprs_mut(var, f)?;
            }
        }
        StmtKind::If(stmt_if) => {
            walk_expr_mut(&mut stmt_if.cond, f)?;
            walk_block_exprs_mut(&mut stmt_if.then, f)?;
            walk_block_exprs_mut(&mut stmt_if.elze, f)?;
        }
        StmtKind::Loop(stmt_loop) => {
            walk_expr_mut(&mut stmt_loop.init.target, f)?;
            walk_expr_mut(&mut stmt_loop.init.value, f)?;
            walk_expr_mut(&mut stmt_loop.cond, f)?;
            walk_expr_mut(&mut stmt_loop.iter.target, f)?;
            walk_expr_mut(&mut stmt_loop.iter.value, f)?;
            walk_block_exprs_mut(&mut stmt_loop.body, f)?;
        }
        StmtKind::Block(block) => walk_block_exprs_mut(block, f)?,
    }
    Ok(())
}

pub fn walk_expr_mut<F>(expr: &mut Expr, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Expr) -> Result<()>,
{
    match &mut expr.kind {
        ExprKind::Name(_) | ExprKind::Value(_) => {}
        ExprKind::ArraySubscript(subscript) => {
            for index in &mut subscript.indices {
                match index {
                    Index::Element(expr) => walk_expr_mut(expr, f)?,
                    Index::Range(range) => {
                        walk_expr_mut(&mut range.start, f)?;
                        walk_expr_mut(&mut range.end, f)?;
                    }
                    Index::All => {}
                }
            }
        }
        ExprKind::BinOp(binop) => {
            walk_expr_mut(binop.lhs.as_mut(), f)?;
            walk_expr_mut(binop.rhs.as_mut(), f)?;
        }
        ExprKind::UnOp(unop) => walk_expr_mut(unop.val.as_mut(), f)?,
        ExprKind::IntrinsicCall(call) => {
            for arg in &mut call.args {
                walk_expr_mut(arg, f)?;
            }
        }
        ExprKind::Call(call) => {
            for arg in &mut call.args {
                walk_expr_mut(arg, f)?;
            }
        }
    }
    f(expr)
}

impl Expr {
    /// Pre-order, read-only iteration over this expression and its children.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr),
    {
        f(self);
        match &self.kind {
            ExprKind::Name(_) | ExprKind::Value(_) => {}
            ExprKind::ArraySubscript(subscript) => {
                for index in &subscript.indices {
                    match index {
                        Index::Element(expr) => expr.walk(f),
                        Index::Range(range) => {
                            range.start.walk(f);
                            range.end.walk(f);
                        }
                        Index::All => {}
                    }
                }
            }
            ExprKind::BinOp(binop) => {
                binop.lhs.walk(f);
                binop.rhs.walk(f);
            }
            ExprKind::UnOp(unop) => unop.val.walk(f),
            ExprKind::IntrinsicCall(call) => call.args.iter().for_each(|arg| arg.walk(f)),
            ExprKind::Call(call) => call.args.iter().for_each(|arg| arg.walk(f)),
        }
    }
}

/// Read-only iteration over every expression directly owned by `stmt`,
/// recursing into nested blocks.
pub fn for_each_stmt_expr<'a, F>(stmt: &'a Stmt, f: &mut F)
where
    F: FnMut(&'a Expr),
{
    match &stmt.kind {
        StmtKind::Assign(assign) => {
            assign.target.walk(f);
            assign.value.walk(f);
        }
        StmtKind::Decl(decl) => {
            for var in &decl.vars {
                if let Some(init) = &var.init {
                    init.walk(f);
                }
            }
        }
        StmtKind::If(stmt_if) => {
            stmt_if.cond.walk(f);
            stmt_if
                .then
                .stmts
                .iter()
                .chain(stmt_if.elze.stmts.iter())
                .for_each(|stmt| for_each_stmt_expr(stmt, f));
        }
        StmtKind::Loop(stmt_loop) => {
            stmt_loop.init.value.walk(f);
            stmt_loop.cond.walk(f);
            stmt_loop.iter.value.walk(f);
            stmt_loop
                .body
                .stmts
                .iter()
                .for_each(|stmt| for_each_stmt_expr(stmt, f));
        }
        StmtKind::Block(block) => block
            .stmts
            .iter()
            .for_each(|stmt| for_each_stmt_expr(stmt, f)),
    }
}

/// Read-only iteration over every statement of a block, nested ones included.
pub fn for_each_stmt<'a, F>(block: &'a ExecutionPart, f: &mut F)
where
    F: FnMut(&'a Stmt),
{
    for stmt in &block.stmts {
        f(stmt);
        match &stmt.kind {
            StmtKind::If(stmt_if) => {
                for_each_stmt(&stmt_if.then, f);
                for_each_stmt(&stmt_if.elze, f);
            }
            StmtKind::Loop(stmt_loop) => for_each_stmt(&stmt_loop.body, f),
            StmtKind::Block(inner) => for_each_stmt(inner, f),
            StmtKind::Assign(_) | StmtKind::Decl(_) => {}
        }
    }
}
