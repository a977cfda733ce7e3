//! Asset loading: the card mesh and WGSL shaders read from disk.

pub mod mesh;
pub mod shader;
