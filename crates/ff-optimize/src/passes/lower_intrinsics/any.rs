use ff_core::ast::{BinOpKind, ExecutionPart, Expr, ExprArraySubscript, Stmt, StmtIf};
use ff_core::error::{Result, ShapeMismatch, UnsupportedFeature};
use ff_core::intrinsics::LoopIntrinsic;
use ff_core::ranges::{bind_loop_indices, extract_ranges, SliceRanges};
use ff_core::scope::{ScopeId, ScopeVars};

use super::Operand;
use crate::{opt_ensure_shape, opt_unsupported};

/// `lhs op rhs`, built from operands the caller already owns.
pub fn comparison(lhs: Expr, op: BinOpKind, rhs: Expr) -> Expr {
    Expr::binop(lhs, op, rhs)
}

/// `IF (cond) acc = 1` over every element addressed by the argument.
///
/// The loops always run to completion; there is no early exit once the
/// accumulator is set.
pub(super) struct AnyPlan {
    cond: Condition,
    pub(super) ranges: SliceRanges,
}

enum Condition {
    /// `ANY(a)`
    Truthy(ExprArraySubscript),
    /// `ANY(a > x)` or `ANY(x > a)`
    Scalar {
        array: ExprArraySubscript,
        op: BinOpKind,
        scalar: Expr,
        array_on_left: bool,
    },
    /// `ANY(a(2:5) == b(4:7))`, iterating over the left operand's ranges.
    Pair {
        left: ExprArraySubscript,
        op: BinOpKind,
        right: ExprArraySubscript,
        right_positions: Vec<usize>,
        shifts: Vec<Shift>,
    },
}

/// Offset added to a loop index so it addresses the right operand.
#[derive(Debug, Clone, PartialEq)]
enum Shift {
    Zero,
    Literal(i64),
    /// `right_start - left_start` when the starts are not both literals or
    /// their difference does not fit in an `i64`.
    Symbolic(Expr),
}

impl Shift {
    fn between(left_start: &Expr, right_start: &Expr) -> Shift {
        match (left_start.as_int(), right_start.as_int()) {
            (Some(left), Some(right)) if left == right => Shift::Zero,
            (Some(left), Some(right)) => match right.checked_sub(left) {
                Some(delta) => Shift::Literal(delta),
                None => Shift::symbolic(left_start, right_start),
            },
            _ if left_start == right_start => Shift::Zero,
            _ => Shift::symbolic(left_start, right_start),
        }
    }

    fn symbolic(left_start: &Expr, right_start: &Expr) -> Shift {
        Shift::Symbolic(Expr::binop(
            right_start.clone(),
            BinOpKind::Sub,
            left_start.clone(),
        ))
    }

    fn apply(&self, index: &Expr) -> Expr {
        match self {
            Shift::Zero => index.clone(),
            Shift::Literal(delta) => match delta.checked_neg() {
                Some(magnitude) if *delta < 0 => {
                    Expr::binop(index.clone(), BinOpKind::Sub, Expr::int(magnitude))
                }
                _ => Expr::binop(index.clone(), BinOpKind::Add, Expr::int(*delta)),
            },
            Shift::Symbolic(delta) => Expr::binop(index.clone(), BinOpKind::Add, delta.clone()),
        }
    }
}

impl AnyPlan {
    pub(super) fn build(args: &[Expr], scope: &ScopeId, vars: &ScopeVars) -> Result<AnyPlan> {
        let arg = match args {
            [arg] => arg,
            [] => opt_unsupported!(
                LoopIntrinsic::Any,
                UnsupportedFeature::ArgumentForm("no arguments".to_string())
            ),
            _ => opt_unsupported!(LoopIntrinsic::Any, UnsupportedFeature::AxisArgument),
        };

        if let Operand::Array(array) = Operand::classify(arg, scope, vars)? {
            let ranges = extract_ranges(&array, scope, vars)?;
            return Ok(AnyPlan {
                cond: Condition::Truthy(array),
                ranges,
            });
        }

        let Some(binop) = arg.as_binop().filter(|binop| binop.op.is_comparison()) else {
            opt_unsupported!(
                LoopIntrinsic::Any,
                UnsupportedFeature::ArgumentForm(arg.to_string())
            );
        };
        let lhs = Operand::classify(&binop.lhs, scope, vars)?;
        let rhs = Operand::classify(&binop.rhs, scope, vars)?;
        match (lhs, rhs) {
            (Operand::Array(array), Operand::Scalar(scalar)) => {
                Self::scalar(array, binop.op, scalar, true, scope, vars)
            }
            (Operand::Scalar(scalar), Operand::Array(array)) => {
                Self::scalar(array, binop.op, scalar, false, scope, vars)
            }
            (Operand::Array(left), Operand::Array(right)) => {
                Self::pair(left, binop.op, right, scope, vars)
            }
            (Operand::Scalar(_), Operand::Scalar(_)) => opt_unsupported!(
                LoopIntrinsic::Any,
                UnsupportedFeature::ArgumentForm(arg.to_string())
            ),
        }
    }

    fn scalar(
        array: ExprArraySubscript,
        op: BinOpKind,
        scalar: Expr,
        array_on_left: bool,
        scope: &ScopeId,
        vars: &ScopeVars,
    ) -> Result<AnyPlan> {
        let ranges = extract_ranges(&array, scope, vars)?;
        Ok(AnyPlan {
            cond: Condition::Scalar {
                array,
                op,
                scalar,
                array_on_left,
            },
            ranges,
        })
    }

    fn pair(
        left: ExprArraySubscript,
        op: BinOpKind,
        right: ExprArraySubscript,
        scope: &ScopeId,
        vars: &ScopeVars,
    ) -> Result<AnyPlan> {
        opt_ensure_shape!(
            left.rank() == right.rank(),
            LoopIntrinsic::Any,
            ShapeMismatch::Rank {
                left: left.rank(),
                right: right.rank(),
            }
        );
        for (dim, (l, r)) in left.indices.iter().zip(&right.indices).enumerate() {
            opt_ensure_shape!(
                l.kind() == r.kind(),
                LoopIntrinsic::Any,
                ShapeMismatch::IndexKind {
                    dim: dim + 1,
                    left: l.kind(),
                    right: r.kind(),
                }
            );
        }

        let left_ranges = extract_ranges(&left, scope, vars)?;
        let right_ranges = extract_ranges(&right, scope, vars)?;
        for (level, &position) in left_ranges.positions.iter().enumerate() {
            if let (Some(l), Some(r)) = (left_ranges.extents[level], right_ranges.extents[level]) {
                opt_ensure_shape!(
                    l == r,
                    LoopIntrinsic::Any,
                    ShapeMismatch::Extent {
                        dim: position + 1,
                        left: l,
                        right: r,
                    }
                );
            }
        }

        let shifts = left_ranges
            .ranges
            .iter()
            .zip(&right_ranges.ranges)
            .map(|(l, r)| Shift::between(&l.start, &r.start))
            .collect();
        Ok(AnyPlan {
            cond: Condition::Pair {
                left,
                op,
                right,
                right_positions: right_ranges.positions,
                shifts,
            },
            ranges: left_ranges,
        })
    }

    fn condition(&self, indices: &[Expr]) -> Expr {
        let positions = &self.ranges.positions;
        match &self.cond {
            Condition::Truthy(array) => comparison(
                bind_loop_indices(array, positions, indices).into(),
                BinOpKind::Eq,
                Expr::int(1),
            ),
            Condition::Scalar {
                array,
                op,
                scalar,
                array_on_left,
            } => {
                let element: Expr = bind_loop_indices(array, positions, indices).into();
                if *array_on_left {
                    comparison(element, *op, scalar.clone())
                } else {
                    comparison(scalar.clone(), *op, element)
                }
            }
            Condition::Pair {
                left,
                op,
                right,
                right_positions,
                shifts,
            } => {
                let shifted: Vec<Expr> = indices
                    .iter()
                    .zip(shifts)
                    .map(|(index, shift)| shift.apply(index))
                    .collect();
                comparison(
                    bind_loop_indices(left, positions, indices).into(),
                    *op,
                    bind_loop_indices(right, right_positions, &shifted).into(),
                )
            }
        }
    }

    pub(super) fn body(&self, target: &Expr, indices: &[Expr], line: Option<u32>) -> Stmt {
        Stmt::from(StmtIf {
            cond: self.condition(indices),
            then: ExecutionPart::new_stmts(vec![
                Stmt::assign(target.clone(), Expr::int(1)).at_line(line)
            ]),
            elze: ExecutionPart::new(),
        })
        .at_line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_starts_fold_to_literal_shifts() {
        assert_eq!(Shift::between(&Expr::int(2), &Expr::int(4)), Shift::Literal(2));
        assert_eq!(Shift::between(&Expr::int(3), &Expr::int(3)), Shift::Zero);
        assert_eq!(
            Shift::Literal(-1).apply(&Expr::name("i")).to_string(),
            "i - 1"
        );
    }

    #[test]
    fn symbolic_starts_keep_the_difference() {
        let n = Expr::name("n");
        assert_eq!(Shift::between(&n, &n), Shift::Zero);

        let shift = Shift::between(&Expr::int(1), &n);
        assert_eq!(shift.apply(&Expr::name("i")).to_string(), "i + (n - 1)");
    }

    #[test]
    fn overflowing_literal_starts_fall_back_to_symbolic_shifts() {
        let low = Expr::int(-5);
        let high = Expr::int(i64::MAX - 4);
        assert_eq!(
            Shift::between(&low, &high),
            Shift::Symbolic(Expr::binop(high.clone(), BinOpKind::Sub, low.clone()))
        );

        let shift = Shift::Literal(i64::MIN);
        assert_eq!(
            shift.apply(&Expr::name("i")),
            Expr::binop(Expr::name("i"), BinOpKind::Add, Expr::int(i64::MIN))
        );
    }
}
