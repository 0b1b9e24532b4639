//! Shared test fixtures for ff-optimize lowering tests.
#![allow(dead_code)]

pub mod ast;
pub mod interp;
