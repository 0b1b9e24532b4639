//! Loop lowering for whole-array intrinsics.
//!
//! `s = SUM(a)` and `f = ANY(a == b)` are replaced by an accumulator
//! initialisation followed by one counted loop per sliced dimension. Each
//! statement is lowered by a pure function from the original assignment to
//! its replacement statements; the only state crossing statements is the
//! loop-variable counter, passed in and handed back by value.

mod any;
mod locate;
mod sum;

pub use any::comparison;
pub use locate::find_call_sites;

use ff_core::ast::{
    ExecutionPart, Expr, ExprArraySubscript, ExprKind, Ident, Program, ProgramUnit, Stmt,
    StmtAssign, StmtDecl, StmtKind, StmtLoop,
};
use ff_core::error::Result;
use ff_core::intrinsics::LoopIntrinsic;
use ff_core::ranges::{full_slice, SliceRanges};
use ff_core::scope::{ScopeId, ScopeVars};
use ff_core::LoweringOptions;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::statement_error;
use any::AnyPlan;
use sum::SumPlan;

/// Source of fresh loop-variable numbers.
///
/// Numbers handed out by one counter are never handed out again, so every
/// generated loop variable of a run has a distinct name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LoopVarCounter {
    next: usize,
}

impl LoopVarCounter {
    pub fn new(start: usize) -> Self {
        Self { next: start }
    }

    pub fn value(self) -> usize {
        self.next
    }

    /// Reserve `levels` consecutive numbers, returning the first one and the
    /// counter to continue with.
    pub fn reserve(self, levels: usize) -> (usize, LoopVarCounter) {
        (self.next, LoopVarCounter::new(self.next + levels))
    }
}

/// What one loop-lowering pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub counter: LoopVarCounter,
    pub statements: usize,
    pub loop_levels: usize,
}

/// Rewrite every lowerable call to `intrinsic` in `program`.
pub fn lower_loop_intrinsic(
    program: &mut Program,
    intrinsic: LoopIntrinsic,
    vars: &ScopeVars,
    options: &LoweringOptions,
    counter: LoopVarCounter,
) -> Result<PassReport> {
    let ctx = LowerCtx {
        intrinsic,
        vars,
        options,
    };
    let mut report = PassReport {
        counter,
        ..PassReport::default()
    };
    for unit in &mut program.units {
        report = lower_unit(unit, None, &ctx, report)?;
    }
    info!(
        intrinsic = %intrinsic,
        statements = report.statements,
        loop_levels = report.loop_levels,
        "lowered loop intrinsic"
    );
    Ok(report)
}

struct LowerCtx<'a> {
    intrinsic: LoopIntrinsic,
    vars: &'a ScopeVars,
    options: &'a LoweringOptions,
}

fn lower_unit(
    unit: &mut ProgramUnit,
    parent: Option<&ScopeId>,
    ctx: &LowerCtx<'_>,
    report: PassReport,
) -> Result<PassReport> {
    let scope = match parent {
        Some(parent) => parent.child(&unit.name),
        None => ScopeId::root(&unit.name),
    };
    let mut report = lower_block(&mut unit.execution, &scope, ctx, report)?;
    for child in &mut unit.contains {
        report = lower_unit(child, Some(&scope), ctx, report)?;
    }
    Ok(report)
}

fn lower_block(
    block: &mut ExecutionPart,
    scope: &ScopeId,
    ctx: &LowerCtx<'_>,
    mut report: PassReport,
) -> Result<PassReport> {
    let internal_name = ctx.intrinsic.internal_name();
    let mut out = Vec::with_capacity(block.len());
    for mut stmt in std::mem::take(&mut block.stmts) {
        let sites = find_call_sites(&stmt, internal_name);
        if sites.is_empty() {
            report = lower_nested(&mut stmt, scope, ctx, report)?;
            out.push(stmt);
            continue;
        }
        for site in sites {
            let (lowered, levels, counter) =
                lower_statement(&stmt, site, scope, ctx, report.counter)
                    .map_err(|err| statement_error(ctx.intrinsic, &stmt, err))?;
            out.extend(lowered);
            report.counter = counter;
            report.statements += 1;
            report.loop_levels += levels;
        }
    }
    block.stmts = out;
    Ok(report)
}

fn lower_nested(
    stmt: &mut Stmt,
    scope: &ScopeId,
    ctx: &LowerCtx<'_>,
    report: PassReport,
) -> Result<PassReport> {
    match &mut stmt.kind {
        StmtKind::If(stmt_if) => {
            let report = lower_block(&mut stmt_if.then, scope, ctx, report)?;
            lower_block(&mut stmt_if.elze, scope, ctx, report)
        }
        StmtKind::Loop(stmt_loop) => lower_block(&mut stmt_loop.body, scope, ctx, report),
        StmtKind::Block(block) => lower_block(block, scope, ctx, report),
        StmtKind::Assign(_) | StmtKind::Decl(_) => Ok(report),
    }
}

/// Replacement statements for one call site, the number of loop levels they
/// use, and the advanced counter.
fn lower_statement(
    stmt: &Stmt,
    site: &StmtAssign,
    scope: &ScopeId,
    ctx: &LowerCtx<'_>,
    counter: LoopVarCounter,
) -> Result<(Vec<Stmt>, usize, LoopVarCounter)> {
    let args = site
        .value
        .as_call()
        .map(|call| call.args.as_slice())
        .unwrap_or_default();
    let plan = Plan::build(ctx.intrinsic, args, scope, ctx.vars)?;

    let levels = plan.ranges().depth();
    let (first, counter) = counter.reserve(levels);
    let loop_vars: Vec<Ident> = (first..first + levels)
        .map(|n| Ident::new(ctx.options.loop_var_name(n)))
        .collect();
    let indices: Vec<Expr> = loop_vars.iter().cloned().map(Expr::name).collect();

    let mut out = Vec::with_capacity(levels + 2);
    if ctx.options.declare_loop_vars {
        out.extend(
            loop_vars
                .iter()
                .map(|var| Stmt::from(StmtDecl::loop_var(var.clone())).at_line(stmt.line)),
        );
    }
    out.push(Stmt::assign(site.target.clone(), plan.identity()).at_line(stmt.line));

    let body = plan.body(&site.target, &indices, stmt.line);
    out.push(wrap_in_loops(body, plan.ranges(), &loop_vars, stmt.line));

    debug!(
        intrinsic = %ctx.intrinsic,
        line = ?stmt.line,
        levels,
        first_var = ?loop_vars.first().map(Ident::as_str),
        "lowered statement"
    );
    Ok((out, levels, counter))
}

/// Nest `body` in one counted loop per range, the first range outermost.
fn wrap_in_loops(body: Stmt, ranges: &SliceRanges, vars: &[Ident], line: Option<u32>) -> Stmt {
    ranges
        .ranges
        .iter()
        .zip(vars)
        .rev()
        .fold(body, |inner, (range, var)| {
            Stmt::from(StmtLoop::counted(
                var,
                range.start.clone(),
                range.end.clone(),
                ExecutionPart::new_stmts(vec![inner]),
            ))
            .at_line(line)
        })
}

/// A loop-intrinsic argument with bare array names expanded to full slices.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Array(ExprArraySubscript),
    Scalar(Expr),
}

impl Operand {
    /// A subscript counts as an array when at least one position is sliced.
    fn classify(expr: &Expr, scope: &ScopeId, vars: &ScopeVars) -> Result<Operand> {
        let operand = match expr.kind() {
            ExprKind::Name(name) => match full_slice(&name.name, scope, vars)? {
                Some(slice) => Operand::Array(slice),
                None => Operand::Scalar(expr.clone()),
            },
            ExprKind::ArraySubscript(subscript)
                if subscript.indices.iter().any(|index| index.is_slice()) =>
            {
                Operand::Array(subscript.clone())
            }
            _ => Operand::Scalar(expr.clone()),
        };
        Ok(operand)
    }
}

/// Per-statement lowering state, built fresh for every call site.
enum Plan {
    Sum(SumPlan),
    Any(AnyPlan),
}

impl Plan {
    fn build(
        intrinsic: LoopIntrinsic,
        args: &[Expr],
        scope: &ScopeId,
        vars: &ScopeVars,
    ) -> Result<Plan> {
        match intrinsic {
            LoopIntrinsic::Sum => SumPlan::build(args, scope, vars).map(Plan::Sum),
            LoopIntrinsic::Any => AnyPlan::build(args, scope, vars).map(Plan::Any),
        }
    }

    fn ranges(&self) -> &SliceRanges {
        match self {
            Plan::Sum(plan) => &plan.ranges,
            Plan::Any(plan) => &plan.ranges,
        }
    }

    /// Value the accumulator starts from.
    fn identity(&self) -> Expr {
        match self {
            Plan::Sum(_) => Expr::int(0),
            Plan::Any(_) => Expr::int(0),
        }
    }

    fn body(&self, target: &Expr, indices: &[Expr], line: Option<u32>) -> Stmt {
        match self {
            Plan::Sum(plan) => plan.body(target, indices, line),
            Plan::Any(plan) => plan.body(target, indices, line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_reservations_are_disjoint() {
        let counter = LoopVarCounter::new(3);
        let (first, counter) = counter.reserve(2);
        assert_eq!(first, 3);
        let (second, counter) = counter.reserve(0);
        assert_eq!(second, 5);
        let (third, counter) = counter.reserve(1);
        assert_eq!(third, 5);
        assert_eq!(counter.value(), 6);
    }
}
