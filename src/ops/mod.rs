//! Lifecycle commands.
//!
//! Each command is a small, independent procedure over a loaded [`Package`].
//! The set is closed: [`Command`] names every command and dispatches to it.

pub mod build_ext;
pub mod clean;
pub mod install_lib;
pub mod sdist;

use std::path::PathBuf;

use crate::core::Package;
use crate::error::BuildError;
use crate::util::diagnostic::suggestions;
use crate::util::process::find_python;

pub use build_ext::{BuildExt, BuildResult, PlacedArtifact};
pub use clean::Clean;
pub use install_lib::InstallLib;
pub use sdist::Sdist;

/// A packaging action that can be run against a package.
pub trait LifecycleCommand {
    fn run(&self, pkg: &Package) -> Result<(), BuildError>;
}

/// Every lifecycle command this crate implements.
#[derive(Debug, Clone)]
pub enum Command {
    BuildExt(BuildExt),
    Clean(Clean),
    Sdist(Sdist),
    InstallLib(InstallLib),
}

impl Command {
    /// Name as the packaging tool spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Command::BuildExt(_) => "build_ext",
            Command::Clean(_) => "clean",
            Command::Sdist(_) => "sdist",
            Command::InstallLib(_) => "install_lib",
        }
    }

    /// Run the selected command.
    pub fn run(&self, pkg: &Package) -> Result<(), BuildError> {
        tracing::debug!("running {} for {}", self.name(), pkg.name());
        match self {
            Command::BuildExt(cmd) => cmd.run(pkg),
            Command::Clean(cmd) => cmd.run(pkg),
            Command::Sdist(cmd) => cmd.run(pkg),
            Command::InstallLib(cmd) => cmd.run(pkg),
        }
    }
}

/// Pick the interpreter to build for: explicit flag, then `pyext.toml`, then
/// `PYTHON`, then `python3` / `python` on PATH.
pub(crate) fn resolve_python(
    explicit: Option<&PathBuf>,
    pkg: &Package,
) -> Result<PathBuf, BuildError> {
    if let Some(python) = explicit.or(pkg.config().build.python.as_ref()) {
        return Ok(python.clone());
    }

    find_python().ok_or_else(|| BuildError::EnvironmentUnresolved {
        variable: "python".to_string(),
        reason: format!("no interpreter found. {}", suggestions::NO_PYTHON),
    })
}
