//! Data models

pub mod prediction;

pub use prediction::*;
