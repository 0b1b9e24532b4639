//! Turning array sections into loop bounds.
//!
//! Every sliced subscript position (`a(2:5)` or `a(:)`) becomes one loop
//! level, in subscript order. Element positions (`a(i)`) stay fixed.

use crate::ast::{Expr, ExprArraySubscript, Ident, Index};
use crate::scope::{ScopeId, ScopeVars};
use crate::Result;

/// Inclusive bounds driving one loop level.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRange {
    pub start: Expr,
    pub end: Expr,
}

impl LoopRange {
    /// Number of iterations when both bounds are integer literals and the
    /// count fits in an `i64`.
    pub fn extent(&self) -> Option<i64> {
        self.end
            .as_int()?
            .checked_sub(self.start.as_int()?)?
            .checked_add(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceRanges {
    pub ranges: Vec<LoopRange>,
    /// Subscript position each loop level iterates over.
    pub positions: Vec<usize>,
    pub extents: Vec<Option<i64>>,
}

impl SliceRanges {
    pub fn depth(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn push(&mut self, position: usize, range: LoopRange) {
        self.extents.push(range.extent());
        self.positions.push(position);
        self.ranges.push(range);
    }
}

/// Collect one loop range per sliced position of `subscript`.
///
/// Whole-dimension markers take their bounds from the declaration visible in
/// `scope`.
pub fn extract_ranges(
    subscript: &ExprArraySubscript,
    scope: &ScopeId,
    vars: &ScopeVars,
) -> Result<SliceRanges> {
    let mut out = SliceRanges::default();
    for (position, index) in subscript.indices.iter().enumerate() {
        match index {
            Index::Element(_) => {}
            Index::Range(range) => out.push(
                position,
                LoopRange {
                    start: range.start.clone(),
                    end: range.end.clone(),
                },
            ),
            Index::All => {
                let dims = vars.declared_shape(scope, subscript.name.as_str())?;
                let Some(dim) = dims.get(position) else {
                    bail!(
                        "`{}` is subscripted in dimension {} but declared with {} dimensions",
                        subscript.name,
                        position + 1,
                        dims.len()
                    );
                };
                out.push(
                    position,
                    LoopRange {
                        start: dim.lower_bound(),
                        end: dim.upper.clone(),
                    },
                );
            }
        }
    }
    Ok(out)
}

/// `name(:, :, ...)` for a declared array, `None` for a scalar.
pub fn full_slice(
    name: &Ident,
    scope: &ScopeId,
    vars: &ScopeVars,
) -> Result<Option<ExprArraySubscript>> {
    let dims = vars.declared_shape(scope, name.as_str())?;
    if dims.is_empty() {
        return Ok(None);
    }
    Ok(Some(ExprArraySubscript::new(
        name.clone(),
        vec![Index::All; dims.len()],
    )))
}

/// Replace each sliced position with the matching per-level index expression.
pub fn bind_loop_indices(
    subscript: &ExprArraySubscript,
    positions: &[usize],
    indices: &[Expr],
) -> ExprArraySubscript {
    let mut bound = subscript.clone();
    for (&position, index) in positions.iter().zip(indices) {
        if let Some(slot) = bound.indices.get_mut(position) {
            *slot = Index::Element(index.clone());
        }
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Dimension, Program, ProgramUnit, Ty, VarDecl};
    use pretty_assertions::assert_eq;

    fn scope() -> Result<(ScopeId, ScopeVars)> {
        let program = Program::single(ProgramUnit::program("main").with_decls([
            VarDecl::array(
                "a",
                Ty::Double,
                vec![
                    Dimension::new(Expr::int(10)),
                    Dimension::bounded(Expr::int(0), Expr::int(4)),
                ],
            ),
            VarDecl::array("b", Ty::Double, vec![Dimension::new(Expr::name("n"))]),
            VarDecl::scalar("s", Ty::Double),
        ]));
        Ok((ScopeId::root(&"main".into()), ScopeVars::collect(&program)?))
    }

    #[test]
    fn whole_dimensions_use_declared_bounds() -> Result<()> {
        let (scope, vars) = scope()?;
        let subscript = ExprArraySubscript::new("a", vec![Index::All, Index::All]);
        let ranges = extract_ranges(&subscript, &scope, &vars)?;

        assert_eq!(ranges.positions, vec![0, 1]);
        assert_eq!(ranges.extents, vec![Some(10), Some(5)]);
        assert_eq!(ranges.ranges[1].start, Expr::int(0));
        Ok(())
    }

    #[test]
    fn element_positions_do_not_become_levels() -> Result<()> {
        let (scope, vars) = scope()?;
        let subscript = ExprArraySubscript::new(
            "a",
            vec![Index::element(Expr::int(3)), Index::range(Expr::int(1), Expr::int(2))],
        );
        let ranges = extract_ranges(&subscript, &scope, &vars)?;

        assert_eq!(ranges.depth(), 1);
        assert_eq!(ranges.positions, vec![1]);
        assert_eq!(ranges.extents, vec![Some(2)]);
        Ok(())
    }

    #[test]
    fn symbolic_bounds_have_unknown_extent() -> Result<()> {
        let (scope, vars) = scope()?;
        let slice = full_slice(&"b".into(), &scope, &vars)?;
        let ranges = match slice {
            Some(slice) => extract_ranges(&slice, &scope, &vars)?,
            None => panic!("b is an array"),
        };
        assert_eq!(ranges.extents, vec![None]);
        assert_eq!(ranges.ranges[0].end, Expr::name("n"));
        Ok(())
    }

    #[test]
    fn overflowing_extents_are_unknown() {
        let wide = LoopRange {
            start: Expr::int(-2),
            end: Expr::int(i64::MAX),
        };
        assert_eq!(wide.extent(), None);

        let full = LoopRange {
            start: Expr::int(i64::MIN),
            end: Expr::int(-1),
        };
        assert_eq!(full.extent(), None);

        let top = LoopRange {
            start: Expr::int(i64::MAX - 4),
            end: Expr::int(i64::MAX),
        };
        assert_eq!(top.extent(), Some(5));
    }

    #[test]
    fn scalars_have_no_full_slice() -> Result<()> {
        let (scope, vars) = scope()?;
        assert_eq!(full_slice(&"s".into(), &scope, &vars)?, None);
        assert!(full_slice(&"nope".into(), &scope, &vars).is_err());
        Ok(())
    }

    #[test]
    fn binding_rewrites_only_sliced_positions() {
        let subscript = ExprArraySubscript::new(
            "a",
            vec![Index::All, Index::element(Expr::int(2)), Index::All],
        );
        let bound = bind_loop_indices(
            &subscript,
            &[0, 2],
            &[Expr::name("i"), Expr::name("j")],
        );
        assert_eq!(bound.to_string(), "a(i, 2, j)");
    }
}
