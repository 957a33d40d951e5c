//! pyext - build orchestration for CMake-built Python extension modules
//!
//! This crate probes the target interpreter, drives an out-of-process CMake
//! build that writes the compiled module straight into the packaging layout,
//! and provides the `clean`, `sdist` and `install_lib` lifecycle commands.

pub mod builder;
pub mod core;
pub mod error;
pub mod ops;
pub mod util;

pub use crate::core::{ExtensionDescriptor, HostOs, Package, PackageMetadata};
pub use builder::{BuildConfig, BuildDriver, BuildTool, BuildType, InterpreterInfo};
pub use error::BuildError;
pub use ops::{Command, LifecycleCommand};
pub use util::Config;
