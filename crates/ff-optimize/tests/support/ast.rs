use ff_core::ast::visit::for_each_stmt;
use ff_core::ast::{
    Dimension, ExecutionPart, Expr, Index, Program, ProgramUnit, Stmt, StmtKind, StmtLoop, Ty,
    VarDecl,
};

/// `DOUBLE :: name(lo:hi, ...)`; a lower bound of 1 is left implicit.
pub fn real_array(name: &str, bounds: &[(i64, i64)]) -> VarDecl {
    let dims = bounds
        .iter()
        .map(|&(lo, hi)| match lo {
            1 => Dimension::new(Expr::int(hi)),
            _ => Dimension::bounded(Expr::int(lo), Expr::int(hi)),
        })
        .collect();
    VarDecl::array(name, Ty::Double, dims)
}

pub fn real_scalar(name: &str) -> VarDecl {
    VarDecl::scalar(name, Ty::Double)
}

/// `name(lo:hi, ...)`
pub fn section(name: &str, bounds: &[(i64, i64)]) -> Expr {
    Expr::subscript(
        name,
        bounds
            .iter()
            .map(|&(lo, hi)| Index::range(Expr::int(lo), Expr::int(hi)))
            .collect(),
    )
}

pub fn sum_of(arg: Expr) -> Expr {
    Expr::intrinsic("SUM", vec![arg])
}

pub fn any_of(arg: Expr) -> Expr {
    Expr::intrinsic("ANY", vec![arg])
}

pub fn assign_at(line: u32, target: &str, value: Expr) -> Stmt {
    Stmt::assign(Expr::name(target), value).at_line(Some(line))
}

pub fn main_program(decls: Vec<VarDecl>, stmts: Vec<Stmt>) -> Program {
    Program::single(
        ProgramUnit::program("main")
            .with_decls(decls)
            .with_stmts(stmts),
    )
}

pub fn main_unit(program: &Program) -> &ProgramUnit {
    &program.units[0]
}

/// Every counted loop of `block`, outer loops before the loops they contain.
pub fn loops_in(block: &ExecutionPart) -> Vec<&StmtLoop> {
    let mut loops = Vec::new();
    for_each_stmt(block, &mut |stmt| {
        if let StmtKind::Loop(stmt_loop) = stmt.kind() {
            loops.push(stmt_loop);
        }
    });
    loops
}

/// Loop-variable names of every unit of `program`, contained units included.
pub fn loop_vars_in(program: &Program) -> Vec<String> {
    fn collect(unit: &ProgramUnit, out: &mut Vec<String>) {
        for stmt_loop in loops_in(&unit.execution) {
            if let Some(var) = stmt_loop.var() {
                out.push(var.to_string());
            }
        }
        for child in &unit.contains {
            collect(child, out);
        }
    }
    let mut out = Vec::new();
    for unit in &program.units {
        collect(unit, &mut out);
    }
    out
}
