use std::collections::HashMap;
use std::sync::LazyLock;

use super::{ElementalIntrinsic, FoldIntrinsic, IntrinsicKind, LoopIntrinsic};
use crate::ast::Ty;
use crate::error::Error;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicSpec {
    pub kind: IntrinsicKind,
    /// Upper-case name as written in source.
    pub source_name: &'static str,
    /// Name of the call node that replaces the source call.
    pub internal_name: &'static str,
    /// Type tagged onto the replacement call.
    pub result_ty: Ty,
}

impl IntrinsicSpec {
    /// The lowering pass this intrinsic schedules, if any.
    pub fn loop_pass(&self) -> Option<LoopIntrinsic> {
        match self.kind {
            IntrinsicKind::Loop(intrinsic) => Some(intrinsic),
            IntrinsicKind::Fold(_) | IntrinsicKind::Elemental(_) => None,
        }
    }
}

const fn spec(
    kind: IntrinsicKind,
    source_name: &'static str,
    internal_name: &'static str,
    result_ty: Ty,
) -> IntrinsicSpec {
    IntrinsicSpec {
        kind,
        source_name,
        internal_name,
        result_ty,
    }
}

const fn elemental(
    intrinsic: ElementalIntrinsic,
    source_name: &'static str,
    internal_name: &'static str,
    result_ty: Ty,
) -> IntrinsicSpec {
    spec(
        IntrinsicKind::Elemental(intrinsic),
        source_name,
        internal_name,
        result_ty,
    )
}

const SELECTED_INT_KIND: IntrinsicSpec = spec(
    IntrinsicKind::Fold(FoldIntrinsic::SelectedIntKind),
    "SELECTED_INT_KIND",
    "__ff_selected_int_kind",
    Ty::Integer,
);
const SELECTED_REAL_KIND: IntrinsicSpec = spec(
    IntrinsicKind::Fold(FoldIntrinsic::SelectedRealKind),
    "SELECTED_REAL_KIND",
    "__ff_selected_real_kind",
    Ty::Integer,
);

// Loop intrinsics are tagged DOUBLE regardless of the element type.
const SUM: IntrinsicSpec = spec(
    IntrinsicKind::Loop(LoopIntrinsic::Sum),
    "SUM",
    "__ff_sum",
    Ty::Double,
);
const ANY: IntrinsicSpec = spec(
    IntrinsicKind::Loop(LoopIntrinsic::Any),
    "ANY",
    "__ff_any",
    Ty::Double,
);

const INT: IntrinsicSpec = elemental(ElementalIntrinsic::Int, "INT", "__ff_int", Ty::Integer);
const DBLE: IntrinsicSpec = elemental(ElementalIntrinsic::Dble, "DBLE", "__ff_dble", Ty::Double);
const SQRT: IntrinsicSpec = elemental(ElementalIntrinsic::Sqrt, "SQRT", "sqrt", Ty::Double);
const COSH: IntrinsicSpec = elemental(ElementalIntrinsic::Cosh, "COSH", "cosh", Ty::Double);
const ABS: IntrinsicSpec = elemental(ElementalIntrinsic::Abs, "ABS", "abs", Ty::Double);
const MIN: IntrinsicSpec = elemental(ElementalIntrinsic::Min, "MIN", "min", Ty::Double);
const MAX: IntrinsicSpec = elemental(ElementalIntrinsic::Max, "MAX", "max", Ty::Double);
const EXP: IntrinsicSpec = elemental(ElementalIntrinsic::Exp, "EXP", "exp", Ty::Double);
const EPSILON: IntrinsicSpec = elemental(
    ElementalIntrinsic::Epsilon,
    "EPSILON",
    "__ff_epsilon",
    Ty::Double,
);
const TANH: IntrinsicSpec = elemental(ElementalIntrinsic::Tanh, "TANH", "tanh", Ty::Double);
const SIGN: IntrinsicSpec = elemental(ElementalIntrinsic::Sign, "SIGN", "__ff_sign", Ty::Double);

const INTRINSIC_SPECS: &[IntrinsicSpec] = &[
    SELECTED_INT_KIND,
    SELECTED_REAL_KIND,
    SUM,
    ANY,
    INT,
    DBLE,
    SQRT,
    COSH,
    ABS,
    MIN,
    MAX,
    EXP,
    EPSILON,
    TANH,
    SIGN,
];

static LOOKUP_BY_SOURCE: LazyLock<HashMap<&'static str, &'static IntrinsicSpec>> =
    LazyLock::new(|| {
        INTRINSIC_SPECS
            .iter()
            .map(|spec| (spec.source_name, spec))
            .collect()
    });

static LOOKUP_BY_INTERNAL: LazyLock<HashMap<&'static str, &'static IntrinsicSpec>> =
    LazyLock::new(|| {
        INTRINSIC_SPECS
            .iter()
            .map(|spec| (spec.internal_name, spec))
            .collect()
    });

pub fn all_specs() -> &'static [IntrinsicSpec] {
    INTRINSIC_SPECS
}

/// Resolve a source-level intrinsic name, ignoring case.
pub fn lookup_source(name: &str) -> Result<&'static IntrinsicSpec> {
    LOOKUP_BY_SOURCE
        .get(name.to_ascii_uppercase().as_str())
        .copied()
        .ok_or_else(|| Error::UnsupportedIntrinsic(name.to_string()))
}

pub fn lookup_internal(name: &str) -> Option<&'static IntrinsicSpec> {
    LOOKUP_BY_INTERNAL.get(name).copied()
}

pub(super) fn spec_of(kind: IntrinsicKind) -> &'static IntrinsicSpec {
    match kind {
        IntrinsicKind::Fold(FoldIntrinsic::SelectedIntKind) => &SELECTED_INT_KIND,
        IntrinsicKind::Fold(FoldIntrinsic::SelectedRealKind) => &SELECTED_REAL_KIND,
        IntrinsicKind::Loop(LoopIntrinsic::Sum) => &SUM,
        IntrinsicKind::Loop(LoopIntrinsic::Any) => &ANY,
        IntrinsicKind::Elemental(intrinsic) => match intrinsic {
            ElementalIntrinsic::Int => &INT,
            ElementalIntrinsic::Dble => &DBLE,
            ElementalIntrinsic::Sqrt => &SQRT,
            ElementalIntrinsic::Cosh => &COSH,
            ElementalIntrinsic::Abs => &ABS,
            ElementalIntrinsic::Min => &MIN,
            ElementalIntrinsic::Max => &MAX,
            ElementalIntrinsic::Exp => &EXP,
            ElementalIntrinsic::Epsilon => &EPSILON,
            ElementalIntrinsic::Tanh => &TANH,
            ElementalIntrinsic::Sign => &SIGN,
        },
    }
}
