use crate::ast::IndexKind;
use std::fmt;
use std::result;
use thiserror::Error;

/// Intrinsic features the lowering pass recognises but does not implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// The `DIM` (reduction axis) argument.
    AxisArgument,
    /// A reduction over anything other than exactly one array operand.
    MultipleArrays(usize),
    /// An argument shape outside the forms the intrinsic accepts.
    ArgumentForm(String),
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedFeature::AxisArgument => write!(f, "the DIM argument"),
            UnsupportedFeature::MultipleArrays(count) => {
                write!(f, "reduction over {} array operands", count)
            }
            UnsupportedFeature::ArgumentForm(form) => write!(f, "argument form `{}`", form),
        }
    }
}

/// Disagreement between two array operands that are compared element-wise.
///
/// Dimensions are reported 1-based, as they appear in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    Rank { left: usize, right: usize },
    IndexKind { dim: usize, left: IndexKind, right: IndexKind },
    Extent { dim: usize, left: i64, right: i64 },
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeMismatch::Rank { left, right } => {
                write!(f, "rank {} does not match rank {}", left, right)
            }
            ShapeMismatch::IndexKind { dim, left, right } => write!(
                f,
                "dimension {}: {} subscript does not match {} subscript",
                dim, left, right
            ),
            ShapeMismatch::Extent { dim, left, right } => write!(
                f,
                "dimension {}: extent {} does not match extent {}",
                dim, left, right
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported intrinsic `{0}`")]
    UnsupportedIntrinsic(String),
    #[error("{intrinsic}: {feature} is not implemented")]
    NotImplemented {
        intrinsic: String,
        feature: UnsupportedFeature,
    },
    #[error("{intrinsic}: incompatible array shapes: {mismatch}")]
    ShapeMismatch {
        intrinsic: String,
        mismatch: ShapeMismatch,
    },
    #[error("{intrinsic}: argument #{position} must be a resolved integer literal, found `{found}`")]
    MalformedLiteral {
        intrinsic: String,
        position: usize,
        found: String,
    },
    #[error("`{name}` is not declared in scope `{scope}`")]
    UndeclaredVariable { name: String, scope: String },
    #[error("while lowering {intrinsic} {}: `{statement}`: {source}", render_line(.line))]
    Statement {
        intrinsic: String,
        line: Option<u32>,
        statement: String,
        #[source]
        source: Box<Error>,
    },
    #[error("Generic error: {0}")]
    Generic(String),
}

fn render_line(line: &Option<u32>) -> String {
    match line {
        Some(line) => format!("at line {}", line),
        None => "at unknown line".to_string(),
    }
}

impl Error {
    pub fn not_implemented(intrinsic: impl Into<String>, feature: UnsupportedFeature) -> Self {
        Error::NotImplemented {
            intrinsic: intrinsic.into(),
            feature,
        }
    }

    pub fn shape_mismatch(intrinsic: impl Into<String>, mismatch: ShapeMismatch) -> Self {
        Error::ShapeMismatch {
            intrinsic: intrinsic.into(),
            mismatch,
        }
    }

    /// The innermost error, with statement context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::Statement { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
