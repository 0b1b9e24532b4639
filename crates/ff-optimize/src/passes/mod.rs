// Passes - the intrinsic resolution pass and one loop-lowering pass per
// loop intrinsic

pub mod lower_intrinsics;
pub mod resolve_intrinsics;

pub use lower_intrinsics::*;
pub use resolve_intrinsics::*;
