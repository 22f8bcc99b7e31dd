//! Shared helpers used by several feature slices.

pub mod text;
