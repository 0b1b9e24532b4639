use ff_core::ast::{BinOpKind, Expr, ExprArraySubscript, Stmt};
use ff_core::error::{Result, UnsupportedFeature};
use ff_core::intrinsics::LoopIntrinsic;
use ff_core::ranges::{bind_loop_indices, extract_ranges, SliceRanges};
use ff_core::scope::{ScopeId, ScopeVars};
use itertools::Itertools;

use super::Operand;
use crate::opt_unsupported;

/// `acc = acc + array(i, j, ...)` over every element of one array operand.
pub(super) struct SumPlan {
    array: ExprArraySubscript,
    pub(super) ranges: SliceRanges,
}

impl SumPlan {
    pub(super) fn build(args: &[Expr], scope: &ScopeId, vars: &ScopeVars) -> Result<SumPlan> {
        let operands = args
            .iter()
            .map(|arg| Operand::classify(arg, scope, vars))
            .collect::<Result<Vec<_>>>()?;

        let mut arrays = operands.iter().filter_map(|operand| match operand {
            Operand::Array(array) => Some(array),
            Operand::Scalar(_) => None,
        });
        let array_count = arrays.clone().count();
        let array = match (arrays.next(), array_count) {
            (Some(array), 1) => array.clone(),
            (Some(_), count) => {
                opt_unsupported!(LoopIntrinsic::Sum, UnsupportedFeature::MultipleArrays(count))
            }
            (None, _) => opt_unsupported!(
                LoopIntrinsic::Sum,
                UnsupportedFeature::ArgumentForm(describe(args))
            ),
        };
        if operands.len() > 1 {
            opt_unsupported!(LoopIntrinsic::Sum, UnsupportedFeature::AxisArgument);
        }

        let ranges = extract_ranges(&array, scope, vars)?;
        Ok(SumPlan { array, ranges })
    }

    pub(super) fn body(&self, target: &Expr, indices: &[Expr], line: Option<u32>) -> Stmt {
        let element = bind_loop_indices(&self.array, &self.ranges.positions, indices);
        Stmt::assign(
            target.clone(),
            Expr::binop(target.clone(), BinOpKind::Add, element),
        )
        .at_line(line)
    }
}

fn describe(args: &[Expr]) -> String {
    args.iter().join(", ")
}
