//! A reference interpreter for lowered programs.
//!
//! Values are `f64`; logical results are `1.0` / `0.0`. Arrays are stored
//! column-major with their declared bounds. Anything a lowered program should
//! no longer contain (slices, intrinsic calls) is an error.

use std::collections::HashMap;

use ff_core::ast::{
    BinOpKind, ExecutionPart, Expr, ExprArraySubscript, ExprKind, Index, Literal, ProgramUnit,
    Stmt, StmtKind, UnOpKind, VarDecl,
};
use ff_core::Result;

const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub bounds: Vec<(i64, i64)>,
    pub data: Vec<f64>,
}

impl ArrayValue {
    fn offset(&self, name: &str, index: &[i64]) -> Result<usize> {
        if index.len() != self.bounds.len() {
            return Err(format!("`{}` indexed with rank {}", name, index.len()).into());
        }
        let mut offset = 0usize;
        let mut stride = 1usize;
        for (&i, &(lo, hi)) in index.iter().zip(&self.bounds) {
            if i < lo || i > hi {
                return Err(format!("`{}` index {} outside {}:{}", name, i, lo, hi).into());
            }
            offset += (i - lo) as usize * stride;
            stride *= (hi - lo + 1) as usize;
        }
        Ok(offset)
    }
}

#[derive(Debug, Default)]
pub struct Interp {
    scalars: HashMap<String, f64>,
    arrays: HashMap<String, ArrayValue>,
    steps: usize,
}

impl Interp {
    /// Allocate the declarations of `unit`, arrays zero-filled.
    pub fn for_unit(unit: &ProgramUnit) -> Result<Self> {
        let mut interp = Interp::default();
        for decl in &unit.specification {
            interp.declare(decl)?;
        }
        Ok(interp)
    }

    fn declare(&mut self, decl: &VarDecl) -> Result<()> {
        let key = decl.name.key();
        if decl.dims.is_empty() {
            let value = match &decl.init {
                Some(init) => self.eval(init)?,
                None => 0.0,
            };
            self.scalars.entry(key).or_insert(value);
            return Ok(());
        }
        let mut bounds = Vec::with_capacity(decl.dims.len());
        for dim in &decl.dims {
            let lo = self.eval(&dim.lower_bound())? as i64;
            let hi = self.eval(&dim.upper)? as i64;
            bounds.push((lo, hi));
        }
        let len = bounds.iter().map(|(lo, hi)| (hi - lo + 1).max(0) as usize).product();
        self.arrays.insert(
            key,
            ArrayValue {
                bounds,
                data: vec![0.0; len],
            },
        );
        Ok(())
    }

    /// Fill `name` in storage order.
    pub fn set_array(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let array = self
            .arrays
            .get_mut(&name.to_ascii_lowercase())
            .ok_or_else(|| format!("no array `{}`", name))?;
        if array.data.len() != values.len() {
            return Err(format!(
                "`{}` holds {} elements, got {}",
                name,
                array.data.len(),
                values.len()
            )
            .into());
        }
        array.data.copy_from_slice(values);
        Ok(())
    }

    pub fn set_scalar(&mut self, name: &str, value: f64) {
        self.scalars.insert(name.to_ascii_lowercase(), value);
    }

    pub fn scalar(&self, name: &str) -> Result<f64> {
        self.scalars
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| format!("no scalar `{}`", name).into())
    }

    pub fn run(&mut self, block: &ExecutionPart) -> Result<()> {
        for stmt in &block.stmts {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<()> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err("step limit exceeded".to_string().into());
        }
        match stmt.kind() {
            StmtKind::Assign(assign) => {
                let value = self.eval(&assign.value)?;
                self.store(&assign.target, value)
            }
            StmtKind::Decl(decl) => {
                for var in &decl.vars {
                    self.declare(var)?;
                }
                Ok(())
            }
            StmtKind::If(stmt_if) => {
                if self.eval(&stmt_if.cond)? != 0.0 {
                    self.run(&stmt_if.then)
                } else {
                    self.run(&stmt_if.elze)
                }
            }
            StmtKind::Loop(stmt_loop) => {
                let init = self.eval(&stmt_loop.init.value)?;
                self.store(&stmt_loop.init.target, init)?;
                while self.eval(&stmt_loop.cond)? != 0.0 {
                    self.run(&stmt_loop.body)?;
                    let next = self.eval(&stmt_loop.iter.value)?;
                    self.store(&stmt_loop.iter.target, next)?;
                    self.steps += 1;
                    if self.steps > STEP_LIMIT {
                        return Err("step limit exceeded".to_string().into());
                    }
                }
                Ok(())
            }
            StmtKind::Block(block) => self.run(block),
        }
    }

    fn store(&mut self, target: &Expr, value: f64) -> Result<()> {
        match target.kind() {
            ExprKind::Name(name) => {
                self.scalars.insert(name.name.key(), value);
                Ok(())
            }
            ExprKind::ArraySubscript(subscript) => {
                let index = self.element_index(subscript)?;
                let array = self
                    .arrays
                    .get_mut(&subscript.name.key())
                    .ok_or_else(|| format!("no array `{}`", subscript.name))?;
                let offset = array.offset(subscript.name.as_str(), &index)?;
                array.data[offset] = value;
                Ok(())
            }
            _ => Err(format!("cannot assign to `{}`", target).into()),
        }
    }

    fn element_index(&self, subscript: &ExprArraySubscript) -> Result<Vec<i64>> {
        subscript
            .indices
            .iter()
            .map(|index| -> Result<i64> {
                match index {
                    Index::Element(expr) => Ok(self.eval(expr)? as i64),
                    Index::Range(_) | Index::All => {
                        Err(format!("unlowered slice in `{}`", subscript).into())
                    }
                }
            })
            .collect()
    }

    pub fn eval(&self, expr: &Expr) -> Result<f64> {
        match expr.kind() {
            ExprKind::Value(Literal::Int(value)) => Ok(*value as f64),
            ExprKind::Value(Literal::Real(value)) => Ok(*value),
            ExprKind::Value(Literal::Logical(value)) => Ok(truth(*value)),
            ExprKind::Name(name) => self.scalar(name.name.as_str()),
            ExprKind::ArraySubscript(subscript) => {
                let index = self.element_index(subscript)?;
                let array = self
                    .arrays
                    .get(&subscript.name.key())
                    .ok_or_else(|| format!("no array `{}`", subscript.name))?;
                Ok(array.data[array.offset(subscript.name.as_str(), &index)?])
            }
            ExprKind::BinOp(binop) => {
                let lhs = self.eval(&binop.lhs)?;
                let rhs = self.eval(&binop.rhs)?;
                Ok(match binop.op {
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Pow => lhs.powf(rhs),
                    BinOpKind::Eq => truth(lhs == rhs),
                    BinOpKind::Ne => truth(lhs != rhs),
                    BinOpKind::Lt => truth(lhs < rhs),
                    BinOpKind::Le => truth(lhs <= rhs),
                    BinOpKind::Gt => truth(lhs > rhs),
                    BinOpKind::Ge => truth(lhs >= rhs),
                    BinOpKind::And => truth(lhs != 0.0 && rhs != 0.0),
                    BinOpKind::Or => truth(lhs != 0.0 || rhs != 0.0),
                })
            }
            ExprKind::UnOp(unop) => {
                let value = self.eval(&unop.val)?;
                Ok(match unop.op {
                    UnOpKind::Neg => -value,
                    UnOpKind::Not => truth(value == 0.0),
                })
            }
            ExprKind::IntrinsicCall(_) | ExprKind::Call(_) => {
                Err(format!("unlowered call `{}`", expr).into())
            }
        }
    }
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
