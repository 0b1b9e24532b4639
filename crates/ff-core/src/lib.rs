#[macro_use]
pub mod macros;

pub mod ast;
pub mod config;
pub mod error;
pub mod intrinsics;
pub mod pretty;
pub mod ranges;
pub mod scope;

// Re-export commonly used items for convenience
pub use tracing;

pub use config::LoweringOptions;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
