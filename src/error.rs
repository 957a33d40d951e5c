//! Error types for extension builds.
//!
//! Every variant is fatal. None of these conditions are transient, so nothing
//! in the crate retries; errors propagate straight to the invoking user.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic as Report};

/// Captured output of an external tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Combined output for diagnostics, stderr last.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => String::new(),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

impl From<std::process::Output> for ToolOutput {
    fn from(output: std::process::Output) -> Self {
        ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}

/// Errors raised while building, cleaning, packaging or installing.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("cannot resolve interpreter configuration: {variable} ({reason})")]
    #[diagnostic(
        code(pyext::probe::unresolved),
        help("Point --python at a standard CPython build that exposes sysconfig paths")
    )]
    EnvironmentUnresolved { variable: String, reason: String },

    #[error("failed to create directory `{}`", .path.display())]
    #[diagnostic(code(pyext::fs::create_dir))]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CMake configuration failed (exit code {})\n{}", exit_code(.code), .output)]
    #[diagnostic(
        code(pyext::build::configure_failed),
        help("Check that CMake and a C++ toolchain are installed and that the project's dependencies are available")
    )]
    ConfigureFailed { code: Option<i32>, output: String },

    #[error("CMake build failed (exit code {})\n{}", exit_code(.code), .output)]
    #[diagnostic(code(pyext::build::build_failed), help("Run `pyext --verbose build_ext` for the full command lines"))]
    BuildFailed { code: Option<i32>, output: String },

    #[error("build finished but the extension module is missing at `{}`", .path.display())]
    #[diagnostic(
        code(pyext::build::artifact_not_placed),
        help("The CMake target must honour CMAKE_LIBRARY_OUTPUT_DIRECTORY and the interpreter's extension suffix")
    )]
    ArtifactNotPlaced { path: PathBuf },

    #[error("required runtime library not found at `{}`", .path.display())]
    #[diagnostic(code(pyext::install::missing_runtime_asset))]
    MissingRuntimeAsset { path: PathBuf },

    #[error("required input file not found: `{}`", .path.display())]
    #[diagnostic(code(pyext::package::missing_input))]
    MissingInputFile { path: PathBuf },

    #[error("invalid configuration in `{}`: {message}", .path.display())]
    #[diagnostic(code(pyext::config::invalid))]
    Config { path: PathBuf, message: String },

    #[error("{context}")]
    #[diagnostic(code(pyext::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }

    /// Convert to a user-facing diagnostic report.
    pub fn to_report(&self) -> Report {
        let (headline, detail) = match self {
            BuildError::ConfigureFailed { code, output } => (
                format!("CMake configuration failed (exit code {})", exit_code(code)),
                Some(output.as_str()),
            ),
            BuildError::BuildFailed { code, output } => (
                format!("CMake build failed (exit code {})", exit_code(code)),
                Some(output.as_str()),
            ),
            other => (other.to_string(), None),
        };

        let mut report = Report::error(headline);
        if let Some(output) = detail.filter(|o| !o.is_empty()) {
            for line in output.lines() {
                report = report.with_context(line);
            }
        }

        match self {
            BuildError::DirectoryCreateError { path, source } => {
                report = report.with_context(source.to_string()).at(path.clone());
            }
            BuildError::Io { source, .. } => {
                report = report.with_context(source.to_string());
            }
            BuildError::MissingInputFile { path } | BuildError::MissingRuntimeAsset { path } => {
                report = report.at(path.clone());
            }
            _ => {}
        }

        if let Some(help) = self.help() {
            report = report.with_suggestion(help.to_string());
        }
        if let BuildError::MissingInputFile { .. } = self {
            report = report.with_suggestion(suggestions::MISSING_INPUT);
        }

        report
    }
}
