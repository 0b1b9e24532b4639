use std::collections::BTreeSet;

use ff_core::ast::visit::walk_program_exprs_mut;
use ff_core::ast::{Expr, ExprKind, Program};
use ff_core::error::Result;
use ff_core::intrinsics::fold::fold_call;
use ff_core::intrinsics::{lookup_source, IntrinsicKind, LoopIntrinsic};
use serde::Serialize;
use tracing::{debug, trace};

/// Loop-lowering passes scheduled by name resolution.
///
/// Iteration follows the order the passes have to run in, independent of the
/// order call sites were met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PendingLowerings {
    passes: BTreeSet<LoopIntrinsic>,
}

impl PendingLowerings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `intrinsic`; returns `false` if it already was.
    pub fn insert(&mut self, intrinsic: LoopIntrinsic) -> bool {
        self.passes.insert(intrinsic)
    }

    pub fn contains(&self, intrinsic: LoopIntrinsic) -> bool {
        self.passes.contains(&intrinsic)
    }

    pub fn iter(&self) -> impl Iterator<Item = LoopIntrinsic> + '_ {
        self.passes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Replace every source-level intrinsic call of `program`.
///
/// Kind-selection queries become integer literals, everything else becomes a
/// typed call to the internal name. Loop intrinsics are returned as the set of
/// passes left to run.
pub fn resolve_intrinsics(program: &mut Program) -> Result<PendingLowerings> {
    let mut pending = PendingLowerings::new();
    walk_program_exprs_mut(program, &mut |expr| resolve_expr(expr, &mut pending))?;
    Ok(pending)
}

fn resolve_expr(expr: &mut Expr, pending: &mut PendingLowerings) -> Result<()> {
    let ExprKind::IntrinsicCall(call) = expr.kind_mut() else {
        return Ok(());
    };
    let spec = lookup_source(call.name.as_str())?;

    let replacement = match spec.kind {
        IntrinsicKind::Fold(intrinsic) => fold_call(intrinsic, &call.args)?,
        IntrinsicKind::Loop(intrinsic) => {
            if pending.insert(intrinsic) {
                debug!(intrinsic = %intrinsic, "scheduled loop lowering");
            }
            Expr::call(
                spec.internal_name,
                std::mem::take(&mut call.args),
                Some(spec.result_ty),
            )
        }
        IntrinsicKind::Elemental(_) => Expr::call(
            spec.internal_name,
            std::mem::take(&mut call.args),
            Some(spec.result_ty),
        ),
    };
    trace!(from = %call.name, to = %replacement, "resolved intrinsic call");
    *expr = replacement;
    Ok(())
}
