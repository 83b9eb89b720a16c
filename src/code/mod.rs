//! Lowers typed HIR to t-code subroutines.

pub mod tcode;
pub mod tcode_build;

mod main;

pub use main::*;
