//! Core definitions shared by all memview-* crates: the error taxonomy and
//! the size and alignment checks every view projection goes through.

pub mod error;
pub mod result;

pub use result::Result;
