use ff_core::ast::visit::for_each_stmt_expr;
use ff_core::ast::{Expr, Program, ProgramUnit};
use ff_core::error::Result;
use ff_core::intrinsics::{lookup_internal, LoopIntrinsic};
use ff_core::scope::ScopeVars;
use ff_core::LoweringOptions;
use serde::Serialize;
use tracing::{info, warn};

use crate::passes::{
    lower_loop_intrinsic, resolve_intrinsics, LoopVarCounter, PassReport, PendingLowerings,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LoweringStats {
    pub total_statements: usize,
    pub total_loop_levels: usize,
    pub per_pass: Vec<(LoopIntrinsic, PassReport)>,
    /// Loop-intrinsic calls left in place because they were not the whole
    /// right-hand side of an assignment.
    pub residual_calls: usize,
}

/// Result of lowering one program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoweringOutcome {
    pub program: Program,
    pub pending: PendingLowerings,
    pub counter: LoopVarCounter,
    pub stats: LoweringStats,
}

/// Resolve intrinsic names, then run every scheduled loop-lowering pass.
///
/// Passes run in `LoopIntrinsic` order with one counter threaded through all
/// of them. The first failure aborts the run.
pub fn lower_program(program: Program, options: &LoweringOptions) -> Result<LoweringOutcome> {
    let mut program = program;
    let pending = resolve_intrinsics(&mut program)?;
    let vars = ScopeVars::collect(&program)?;

    let mut counter = LoopVarCounter::new(options.start_counter);
    let mut stats = LoweringStats::default();
    for intrinsic in pending.iter() {
        let report = lower_loop_intrinsic(&mut program, intrinsic, &vars, options, counter)?;
        counter = report.counter;
        stats.total_statements += report.statements;
        stats.total_loop_levels += report.loop_levels;
        stats.per_pass.push((intrinsic, report));
    }
    stats.residual_calls = report_residual_calls(&program);

    info!(
        passes = pending.len(),
        statements = stats.total_statements,
        loop_levels = stats.total_loop_levels,
        "lowering finished"
    );
    Ok(LoweringOutcome {
        program,
        pending,
        counter,
        stats,
    })
}

fn report_residual_calls(program: &Program) -> usize {
    program.units.iter().map(residual_calls_in_unit).sum()
}

fn residual_calls_in_unit(unit: &ProgramUnit) -> usize {
    let mut count = 0;
    let mut check = |expr: &Expr, line: Option<u32>| {
        let Some(call) = expr.as_call() else {
            return;
        };
        if let Some(intrinsic) = lookup_internal(call.name.as_str()).and_then(|s| s.loop_pass()) {
            warn!(
                unit = %unit.name,
                line = ?line,
                intrinsic = %intrinsic,
                "call is not the whole right-hand side of an assignment; left unlowered"
            );
            count += 1;
        }
    };

    for decl in &unit.specification {
        let bounds = decl
            .dims
            .iter()
            .flat_map(|dim| dim.lower.iter().chain(std::iter::once(&dim.upper)));
        for expr in bounds.chain(decl.init.iter()) {
            expr.walk(&mut |expr| check(expr, None));
        }
    }
    for stmt in &unit.execution.stmts {
        for_each_stmt_expr(stmt, &mut |expr| check(expr, stmt.line));
    }
    count + unit.contains.iter().map(residual_calls_in_unit).sum::<usize>()
}
