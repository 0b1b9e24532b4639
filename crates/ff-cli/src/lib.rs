//! FerroFort CLI Library
//!
//! Command implementations behind the `ff` binary: read a program in its JSON
//! form, run the intrinsic lowering pipeline and print the result.

pub mod commands;

pub use ff_core::*;
pub use ff_optimize::*;

// CLI-specific error handling
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("Lowering error: {0}")]
        Lowering(#[from] ff_core::Error),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
