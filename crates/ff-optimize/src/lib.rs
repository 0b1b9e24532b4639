// ff-optimize: lowering passes for array intrinsics
//
// Architecture:
// - passes: intrinsic name resolution and the loop-lowering engine
// - pipeline: runs the passes in order over one program
// - error: helpers attaching statement context to pass failures

pub mod error;
pub mod passes;
pub mod pipeline;

// Re-export key types for convenience
pub use passes::*;
pub use pipeline::*;
