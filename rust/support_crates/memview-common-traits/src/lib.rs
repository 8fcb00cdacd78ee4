//! Traits and definitions used throughout the memview crates.
//!
//! # Modules
//!
//! - [`memory_owner`]: Traits for values that expose their backing storage
//!   for in-place borrowing

pub mod memory_owner;
