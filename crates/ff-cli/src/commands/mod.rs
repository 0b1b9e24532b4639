//! Command implementations for the FerroFort CLI

pub mod lower;

pub use lower::lower_command;
