//! CMake invocation for the build driver.

use std::path::{Path, PathBuf};

use crate::builder::driver::BuildTool;
use crate::error::{BuildError, ToolOutput};
use crate::util::diagnostic::suggestions;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Runs `cmake` as an external process in the current directory.
#[derive(Debug, Clone)]
pub struct CMakeTool {
    cmake: PathBuf,
}

impl CMakeTool {
    /// Locate CMake on PATH (or via the `CMAKE` environment variable).
    pub fn find() -> Result<Self, BuildError> {
        match find_cmake() {
            Some(cmake) => Ok(CMakeTool { cmake }),
            None => Err(BuildError::ConfigureFailed {
                code: None,
                output: format!(
                    "CMake not found\n\
                     \n\
                     CMake is required to build the extension module.\n\
                     {}",
                    suggestions::NO_CMAKE
                ),
            }),
        }
    }

    /// Use a specific CMake executable.
    pub fn with_path(cmake: impl Into<PathBuf>) -> Self {
        CMakeTool {
            cmake: cmake.into(),
        }
    }

    fn run(
        &self,
        cmd: ProcessBuilder,
        on_spawn_error: fn(String) -> BuildError,
    ) -> Result<ToolOutput, BuildError> {
        let output = cmd.exec().map_err(|e| on_spawn_error(format!("{:#}", e)))?;
        Ok(ToolOutput::from(output))
    }

    pub(crate) fn configure_command(&self, source_dir: &Path, args: &[String]) -> ProcessBuilder {
        ProcessBuilder::new(&self.cmake).arg(source_dir).args(args)
    }

    pub(crate) fn build_command(
        &self,
        config_name: &str,
        jobs: usize,
        target: &str,
    ) -> ProcessBuilder {
        ProcessBuilder::new(&self.cmake)
            .args(["--build", "."])
            // Multi-config generators (Visual Studio, Xcode) pick the configuration here
            .arg("--config")
            .arg(config_name)
            .arg("--parallel")
            .arg(jobs.to_string())
            .arg("--target")
            .arg(target)
    }
}

impl BuildTool for CMakeTool {
    fn configure(&self, source_dir: &Path, args: &[String]) -> Result<ToolOutput, BuildError> {
        let cmd = self.configure_command(source_dir, args);
        tracing::debug!("{}", cmd.display_command());
        self.run(cmd, |output| BuildError::ConfigureFailed { code: None, output })
    }

    fn build(
        &self,
        config_name: &str,
        jobs: usize,
        target: &str,
    ) -> Result<ToolOutput, BuildError> {
        let cmd = self.build_command(config_name, jobs, target);
        tracing::debug!("{}", cmd.display_command());
        self.run(cmd, |output| BuildError::BuildFailed { code: None, output })
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cmake_project() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();

        // Not a CMake project initially
        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(
            tmp.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.10)",
        )
        .unwrap();

        assert!(is_cmake_project(tmp.path()));
    }

    #[test]
    fn test_configure_command() {
        let tool = CMakeTool::with_path("cmake");
        let cmd = tool.configure_command(
            Path::new("/src/vw"),
            &["-DCMAKE_BUILD_TYPE=Release".to_string(), "-DBUILD_PYTHON=ON".to_string()],
        );

        assert_eq!(
            cmd.display_command(),
            "cmake /src/vw -DCMAKE_BUILD_TYPE=Release -DBUILD_PYTHON=ON"
        );
    }

    #[test]
    fn test_build_command() {
        let tool = CMakeTool::with_path("cmake");
        let cmd = tool.build_command("Debug", 8, "pylibvw");

        assert_eq!(
            cmd.get_args(),
            ["--build", ".", "--config", "Debug", "--parallel", "8", "--target", "pylibvw"]
        );
    }

    #[test]
    fn test_spawn_failure_is_configure_failed() {
        let tool = CMakeTool::with_path("/nonexistent/cmake");
        let err = tool.configure(Path::new("/src"), &[]).unwrap_err();
        assert!(matches!(err, BuildError::ConfigureFailed { code: None, .. }));
    }
}
