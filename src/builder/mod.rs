//! Native build orchestration.
//!
//! Probes the target interpreter, assembles CMake arguments from what it
//! reports, and drives CMake through configure and build.

pub mod cmake;
pub mod config;
pub mod driver;
pub mod probe;

pub use cmake::CMakeTool;
pub use config::{assemble_args, BuildConfig, BuildType, DependencySearchPaths, HintOrigin};
pub use driver::{BuildDriver, BuildTool, DriverState};
pub use probe::InterpreterInfo;
