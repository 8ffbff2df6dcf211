//! Statistical utilities: per-channel z-score normalization.

pub mod normalize;

pub use normalize::*;
