//! Compile-time folds for the kind-selection queries.

use std::f64::consts::LOG2_10;

use super::FoldIntrinsic;
use crate::ast::Expr;
use crate::error::{Error, UnsupportedFeature};
use crate::Result;

/// Smallest byte width holding a signed integer of `digits` decimal digits.
pub fn selected_int_kind(digits: i64) -> i64 {
    ((digits as f64 * LOG2_10 + 1.0) / 8.0).ceil() as i64
}

/// Storage class of a real with `precision` decimal digits and exponent
/// range `range`.
pub fn selected_real_kind(precision: i64, range: i64) -> i64 {
    if precision >= 9 || range > 126 {
        8
    } else if precision >= 3 || range > 14 {
        4
    } else {
        2
    }
}

/// Fold a call to `intrinsic` into an integer literal.
pub fn fold_call(intrinsic: FoldIntrinsic, args: &[Expr]) -> Result<Expr> {
    let value = match intrinsic {
        FoldIntrinsic::SelectedIntKind => {
            reject_extra_args(intrinsic, args, 1)?;
            selected_int_kind(literal_arg(intrinsic, args, 1)?)
        }
        FoldIntrinsic::SelectedRealKind => {
            reject_extra_args(intrinsic, args, 2)?;
            let precision = literal_arg(intrinsic, args, 1)?;
            let range = match args.get(1) {
                Some(_) => literal_arg(intrinsic, args, 2)?,
                None => 0,
            };
            selected_real_kind(precision, range)
        }
    };
    Ok(Expr::int(value))
}

/// Integer literal at 1-based `position`.
fn literal_arg(intrinsic: FoldIntrinsic, args: &[Expr], position: usize) -> Result<i64> {
    let arg = args.get(position - 1);
    arg.and_then(Expr::as_int)
        .ok_or_else(|| Error::MalformedLiteral {
            intrinsic: intrinsic.source_name().to_string(),
            position,
            found: arg.map_or_else(|| "<missing>".to_string(), |arg| arg.to_string()),
        })
}

fn reject_extra_args(intrinsic: FoldIntrinsic, args: &[Expr], max: usize) -> Result<()> {
    if args.len() > max {
        return Err(Error::not_implemented(
            intrinsic.source_name(),
            UnsupportedFeature::ArgumentForm(format!("{} arguments", args.len())),
        ));
    }
    Ok(())
}
