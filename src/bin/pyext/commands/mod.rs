//! Command implementations

pub mod build_ext;
pub mod clean;
pub mod install_lib;
pub mod sdist;
