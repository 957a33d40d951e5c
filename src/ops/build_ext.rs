//! Implementation of `build_ext`.
//!
//! For every extension: compute where the packaging layout expects the
//! compiled module, create its parent directory, then configure and build
//! with CMake writing straight into that directory.

use std::path::PathBuf;

use crate::builder::cmake::is_cmake_project;
use crate::builder::{
    BuildConfig, BuildDriver, BuildTool, BuildType, CMakeTool, DependencySearchPaths,
    DriverState, InterpreterInfo,
};
use crate::core::{ExtensionDescriptor, Package};
use crate::error::BuildError;
use crate::ops::{resolve_python, LifecycleCommand};
use crate::util::fs::ensure_dir;

/// Options for `build_ext`.
#[derive(Debug, Clone, Default)]
pub struct BuildExt {
    /// Build the Debug configuration instead of Release
    pub debug: bool,

    /// Configure only, skip the build step
    pub dry_run: bool,

    /// Parallelism hint (defaults to the config value, then 8)
    pub jobs: Option<usize>,

    /// Interpreter to build for
    pub python: Option<PathBuf>,
}

/// A compiled module at the location the packaging layout expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedArtifact {
    pub extension: String,
    pub path: PathBuf,
}

/// Result of a `build_ext` run.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    /// Modules built and verified on disk (empty for a dry run)
    pub artifacts: Vec<PlacedArtifact>,
}

impl BuildExt {
    /// Build every extension of `pkg` for the interpreter described by `info`.
    pub fn build_with<T: BuildTool>(
        &self,
        pkg: &Package,
        info: &InterpreterInfo,
        tool: &T,
    ) -> Result<BuildResult, BuildError> {
        let settings = &pkg.config().build;
        let build_type = BuildType::from_debug(self.debug);
        let jobs = self.jobs.unwrap_or_else(|| pkg.config().jobs());
        let plat = info.plat_specifier();
        let build_lib = pkg.build_lib_dir(&plat);
        let build_temp = pkg.build_temp_dir(&plat);
        let source_dir = pkg.cmake_source_dir();

        if !is_cmake_project(&source_dir) {
            tracing::warn!("no CMakeLists.txt in {}", source_dir.display());
        }

        let hints = DependencySearchPaths::resolve(
            info,
            settings.boost_library_dir.as_deref(),
            settings.boost_include_dir.as_deref(),
        )?;

        let mut result = BuildResult::default();

        for ext in pkg.extensions() {
            let module_path = place_artifact(ext, &build_lib, &info.ext_suffix)?;
            let output_dir = module_path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| build_lib.clone());

            let config = BuildConfig::new(
                &output_dir,
                build_type,
                info,
                hints.clone(),
                pkg.root(),
                settings.cmake_args.clone(),
            )?;

            let target = settings
                .target
                .clone()
                .unwrap_or_else(|| ext.name().rsplit('.').next().unwrap_or_default().to_string());

            let mut driver = BuildDriver::new(
                tool,
                &config,
                build_temp.clone(),
                source_dir.clone(),
                target,
                jobs,
            );

            if driver.run(self.dry_run)? != DriverState::Done {
                continue;
            }

            let placed = ext
                .find_module(&build_lib, &info.extension_suffixes)
                .ok_or(BuildError::ArtifactNotPlaced { path: module_path })?;

            tracing::info!("Finished `{}` -> {}", ext.name(), placed.display());
            result.artifacts.push(PlacedArtifact {
                extension: ext.name().to_string(),
                path: placed,
            });
        }

        Ok(result)
    }

    /// Probe the interpreter, find CMake, and build.
    pub fn build(&self, pkg: &Package) -> Result<BuildResult, BuildError> {
        let python = resolve_python(self.python.as_ref(), pkg)?;
        let info = InterpreterInfo::probe(&python)?;
        let tool = CMakeTool::find()?;
        self.build_with(pkg, &info, &tool)
    }
}

impl LifecycleCommand for BuildExt {
    fn run(&self, pkg: &Package) -> Result<(), BuildError> {
        self.build(pkg).map(|_| ())
    }
}

/// Compute the expected module path and make sure its parent exists.
///
/// Runs before configure: CMake is handed this directory and some generators
/// check it at configure time.
fn place_artifact(
    ext: &ExtensionDescriptor,
    build_lib: &std::path::Path,
    ext_suffix: &str,
) -> Result<PathBuf, BuildError> {
    let module_path = ext.fullpath(build_lib, ext_suffix);
    if let Some(parent) = module_path.parent() {
        ensure_dir(parent)?;
    }
    Ok(module_path)
}
