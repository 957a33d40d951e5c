//! Shared utilities

pub mod config;
pub mod cwd;
pub mod diagnostic;
pub mod fs;
pub mod process;

pub use config::Config;
pub use cwd::WorkingDirGuard;
pub use diagnostic::Diagnostic;
