//! Intrinsic vocabulary shared by name resolution and the lowering passes.
//!
//! Every recognised intrinsic is one variant of a closed enum. Kind-selection
//! queries fold to literals on the spot, whole-array intrinsics schedule a
//! loop-lowering pass, and scalar helpers are renamed in place.

mod catalog;
pub mod fold;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use catalog::{all_specs as intrinsic_specs, lookup_internal, lookup_source, IntrinsicSpec};

/// Prefix that keeps internal names out of the user identifier space.
pub const INTERNAL_PREFIX: &str = "__ff_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldIntrinsic {
    SelectedIntKind,
    SelectedRealKind,
}

/// Intrinsics lowered into loop nests. The derived ordering is the order the
/// passes run in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LoopIntrinsic {
    Sum,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementalIntrinsic {
    Int,
    Dble,
    Sqrt,
    Cosh,
    Abs,
    Min,
    Max,
    Exp,
    Epsilon,
    Tanh,
    Sign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Fold(FoldIntrinsic),
    Loop(LoopIntrinsic),
    Elemental(ElementalIntrinsic),
}

impl LoopIntrinsic {
    pub const ALL: [LoopIntrinsic; 2] = [LoopIntrinsic::Sum, LoopIntrinsic::Any];

    pub fn spec(self) -> &'static IntrinsicSpec {
        catalog::spec_of(IntrinsicKind::Loop(self))
    }

    pub fn source_name(self) -> &'static str {
        self.spec().source_name
    }

    pub fn internal_name(self) -> &'static str {
        self.spec().internal_name
    }
}

impl fmt::Display for LoopIntrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}

impl FoldIntrinsic {
    pub fn source_name(self) -> &'static str {
        catalog::spec_of(IntrinsicKind::Fold(self)).source_name
    }
}
