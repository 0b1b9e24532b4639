//! Fortran-flavoured rendering of the AST.
//!
//! Expressions render inline through `Display`; statements and program units
//! implement `PrettyPrintable` so nested blocks are indented.

use std::fmt::{self, Formatter};

use itertools::Itertools;

use crate::ast::{
    Dimension, ExecutionPart, Expr, ExprArraySubscript, ExprKind, Index, Literal, Program,
    ProgramUnit, Stmt, StmtKind, UnOpKind, UnitKind, VarDecl,
};
use crate::pretty::{PrettyCtx, PrettyOptions, PrettyPrintable};

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Real(value) => write!(f, "{:?}", value),
            Literal::Logical(true) => f.write_str(".TRUE."),
            Literal::Logical(false) => f.write_str(".FALSE."),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Index::Element(expr) => write!(f, "{}", expr),
            Index::Range(range) => write!(f, "{}:{}", range.start, range.end),
            Index::All => f.write_str(":"),
        }
    }
}

impl fmt::Display for ExprArraySubscript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.indices.iter().join(", "))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&render_expr(self, false))
    }
}

/// Render an expression on one line, optionally suffixing resolved calls with
/// their result type.
pub fn render_expr(expr: &Expr, show_types: bool) -> String {
    match &expr.kind {
        ExprKind::Name(name) => name.name.to_string(),
        ExprKind::Value(literal) => literal.to_string(),
        ExprKind::ArraySubscript(subscript) => subscript.to_string(),
        ExprKind::BinOp(binop) => {
            let prec = binop.op.precedence();
            let lhs = render_operand(&binop.lhs, prec, false, show_types);
            let rhs = render_operand(&binop.rhs, prec, true, show_types);
            format!("{} {} {}", lhs, binop.op.symbol(), rhs)
        }
        ExprKind::UnOp(unop) => {
            let operand = match unop.val.kind {
                ExprKind::BinOp(_) => format!("({})", render_expr(&unop.val, show_types)),
                _ => render_expr(&unop.val, show_types),
            };
            match unop.op {
                UnOpKind::Neg => format!("-{}", operand),
                UnOpKind::Not => format!(".NOT. {}", operand),
            }
        }
        ExprKind::IntrinsicCall(call) => format!(
            "{}({})",
            call.name,
            call.args
                .iter()
                .map(|arg| render_expr(arg, show_types))
                .join(", ")
        ),
        ExprKind::Call(call) => {
            let rendered = format!(
                "{}({})",
                call.name,
                call.args
                    .iter()
                    .map(|arg| render_expr(arg, show_types))
                    .join(", ")
            );
            match (show_types, expr.ty) {
                (true, Some(ty)) => format!("{} : {}", rendered, ty),
                _ => rendered,
            }
        }
    }
}

fn render_operand(expr: &Expr, parent_prec: u8, is_rhs: bool, show_types: bool) -> String {
    let rendered = render_expr(expr, show_types);
    match &expr.kind {
        ExprKind::BinOp(child) => {
            let prec = child.op.precedence();
            if prec < parent_prec || (is_rhs && prec == parent_prec) {
                format!("({})", rendered)
            } else {
                rendered
            }
        }
        _ => rendered,
    }
}

fn render_dimension(dim: &Dimension) -> String {
    match &dim.lower {
        Some(lower) => format!("{}:{}", lower, dim.upper),
        None => dim.upper.to_string(),
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.ty, self.name)?;
        if !self.dims.is_empty() {
            write!(f, "({})", self.dims.iter().map(render_dimension).join(", "))?;
        }
        if let Some(init) = &self.init {
            write!(f, " = {}", init)?;
        }
        Ok(())
    }
}

fn line_prefix(stmt: &Stmt, ctx: &PrettyCtx<'_>) -> String {
    match (ctx.options.show_lines, stmt.line) {
        (true, Some(line)) => format!("[{}] ", line),
        _ => String::new(),
    }
}

impl PrettyPrintable for Stmt {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        let prefix = line_prefix(self, ctx);
        let show_types = ctx.options.show_types;
        match &self.kind {
            StmtKind::Assign(assign) => ctx.writeln(
                f,
                format!(
                    "{}{} = {}",
                    prefix,
                    render_expr(&assign.target, show_types),
                    render_expr(&assign.value, show_types)
                ),
            ),
            StmtKind::Decl(decl) => {
                for var in &decl.vars {
                    ctx.writeln(f, format!("{}{}", prefix, var))?;
                }
                Ok(())
            }
            StmtKind::If(stmt_if) => {
                ctx.writeln(
                    f,
                    format!(
                        "{}IF ({}) THEN",
                        prefix,
                        render_expr(&stmt_if.cond, show_types)
                    ),
                )?;
                ctx.with_indent(|ctx| stmt_if.then.fmt_pretty(f, ctx))?;
                if !stmt_if.elze.is_empty() {
                    ctx.writeln(f, "ELSE")?;
                    ctx.with_indent(|ctx| stmt_if.elze.fmt_pretty(f, ctx))?;
                }
                ctx.writeln(f, "END IF")
            }
            StmtKind::Loop(stmt_loop) => {
                ctx.writeln(
                    f,
                    format!(
                        "{}FOR {} = {}; {}; {} = {}",
                        prefix,
                        stmt_loop.init.target,
                        render_expr(&stmt_loop.init.value, show_types),
                        render_expr(&stmt_loop.cond, show_types),
                        stmt_loop.iter.target,
                        render_expr(&stmt_loop.iter.value, show_types)
                    ),
                )?;
                ctx.with_indent(|ctx| stmt_loop.body.fmt_pretty(f, ctx))?;
                ctx.writeln(f, "END FOR")
            }
            StmtKind::Block(block) => {
                ctx.writeln(f, format!("{}BLOCK", prefix))?;
                ctx.with_indent(|ctx| block.fmt_pretty(f, ctx))?;
                ctx.writeln(f, "END BLOCK")
            }
        }
    }
}

impl PrettyPrintable for ExecutionPart {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            stmt.fmt_pretty(f, ctx)?;
        }
        Ok(())
    }
}

impl PrettyPrintable for ProgramUnit {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        let keyword = match self.kind {
            UnitKind::Program => "PROGRAM",
            UnitKind::Subroutine => "SUBROUTINE",
            UnitKind::Function => "FUNCTION",
        };
        ctx.writeln(f, format!("{} {}", keyword, self.name))?;
        ctx.with_indent(|ctx| {
            for decl in &self.specification {
                ctx.writeln(f, decl.to_string())?;
            }
            self.execution.fmt_pretty(f, ctx)
        })?;
        if !self.contains.is_empty() {
            ctx.writeln(f, "CONTAINS")?;
            ctx.with_indent(|ctx| {
                for unit in &self.contains {
                    unit.fmt_pretty(f, ctx)?;
                }
                Ok(())
            })?;
        }
        ctx.writeln(f, format!("END {} {}", keyword, self.name))
    }
}

impl PrettyPrintable for Program {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        for unit in &self.units {
            unit.fmt_pretty(f, ctx)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered = crate::pretty::pretty(self, PrettyOptions::default()).to_string();
        f.write_str(rendered.trim_end())
    }
}
