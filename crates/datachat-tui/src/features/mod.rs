//! Feature slices: each owns its state, key handling, and rendering.

pub mod input;
pub mod transcript;
