//! Build driver: configure then build in a scratch directory.
//!
//! ```text
//! Idle -> DirectoryPrepared -> Configured -> Built -> Done
//!              |                   |           |
//!              +-------------------+-----------+--> Failed
//! ```
//!
//! The working directory is switched into the build directory for the
//! duration of the run and restored on every exit path.

use std::path::{Path, PathBuf};

use crate::builder::config::{assemble_args, BuildConfig};
use crate::error::{BuildError, ToolOutput};
use crate::util::fs::ensure_dir;
use crate::util::WorkingDirGuard;

/// The two entry points of an out-of-process build tool.
///
/// Both calls run with the build directory as the current directory and
/// block until the tool exits.
pub trait BuildTool {
    /// Generate the build tree for `source_dir`.
    fn configure(&self, source_dir: &Path, args: &[String]) -> Result<ToolOutput, BuildError>;

    /// Build `target` in the configuration `config_name`.
    fn build(&self, config_name: &str, jobs: usize, target: &str)
        -> Result<ToolOutput, BuildError>;
}

/// Progress of a [`BuildDriver`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    DirectoryPrepared,
    Configured,
    Built,
    Done,
    Failed,
}

/// Drives one configure + build of a CMake target.
pub struct BuildDriver<'a, T: BuildTool> {
    tool: &'a T,
    config: &'a BuildConfig,
    build_dir: PathBuf,
    source_dir: PathBuf,
    target: String,
    jobs: usize,
    state: DriverState,
}

impl<'a, T: BuildTool> BuildDriver<'a, T> {
    /// Create a driver for `target`. `jobs` is clamped to at least one.
    pub fn new(
        tool: &'a T,
        config: &'a BuildConfig,
        build_dir: PathBuf,
        source_dir: PathBuf,
        target: impl Into<String>,
        jobs: usize,
    ) -> Self {
        BuildDriver {
            tool,
            config,
            build_dir,
            source_dir,
            target: target.into(),
            jobs: jobs.max(1),
            state: DriverState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Build directory used as the working directory during the run.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Run to completion.
    ///
    /// With `dry_run` the build step is skipped and the run ends in
    /// [`DriverState::Configured`]. On error the state is
    /// [`DriverState::Failed`] and the working directory has been restored.
    pub fn run(&mut self, dry_run: bool) -> Result<DriverState, BuildError> {
        match self.run_inner(dry_run) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::debug!("build driver failed in state {:?}", self.state);
                self.state = DriverState::Failed;
                Err(e)
            }
        }
    }

    fn run_inner(&mut self, dry_run: bool) -> Result<DriverState, BuildError> {
        ensure_dir(&self.build_dir)?;
        let cwd = WorkingDirGuard::enter(&self.build_dir)?;
        self.state = DriverState::DirectoryPrepared;

        tracing::info!(
            "Configuring {} ({})",
            self.target,
            self.config.build_type()
        );
        let args = assemble_args(self.config);
        let output = self.tool.configure(&self.source_dir, &args)?;
        if !output.success() {
            return Err(BuildError::ConfigureFailed {
                code: output.code,
                output: output.combined(),
            });
        }
        self.state = DriverState::Configured;

        if dry_run {
            tracing::info!("Dry run: skipping build of {}", self.target);
            return Ok(self.state);
        }

        tracing::info!("Building {} with {} jobs", self.target, self.jobs);
        let output =
            self.tool
                .build(self.config.build_type().as_str(), self.jobs, &self.target)?;
        if !output.success() {
            return Err(BuildError::BuildFailed {
                code: output.code,
                output: output.combined(),
            });
        }
        self.state = DriverState::Built;

        drop(cwd);
        self.state = DriverState::Done;
        Ok(self.state)
    }
}
