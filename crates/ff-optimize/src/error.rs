use ff_core::ast::Stmt;
use ff_core::error::{Error, ShapeMismatch, UnsupportedFeature};
use ff_core::intrinsics::LoopIntrinsic;

/// Wrap a failure with the statement it was raised for.
pub fn statement_error(intrinsic: LoopIntrinsic, stmt: &Stmt, source: Error) -> Error {
    Error::Statement {
        intrinsic: intrinsic.source_name().to_string(),
        line: stmt.line,
        statement: stmt.to_string(),
        source: Box::new(source),
    }
}

pub fn unsupported(intrinsic: LoopIntrinsic, feature: UnsupportedFeature) -> Error {
    Error::not_implemented(intrinsic.source_name(), feature)
}

pub fn shape_error(intrinsic: LoopIntrinsic, mismatch: ShapeMismatch) -> Error {
    Error::shape_mismatch(intrinsic.source_name(), mismatch)
}

// Convenience macros for generating lowering errors

/// Macro to return early with an unsupported-feature error
#[macro_export]
macro_rules! opt_unsupported {
    ($intrinsic:expr, $feature:expr) => {
        return Err($crate::error::unsupported($intrinsic, $feature))
    };
}

/// Macro to ensure two operands agree, or return a shape-mismatch error
#[macro_export]
macro_rules! opt_ensure_shape {
    ($cond:expr, $intrinsic:expr, $mismatch:expr) => {
        if !($cond) {
            return Err($crate::error::shape_error($intrinsic, $mismatch));
        }
    };
}
