//! Configuration file support.
//!
//! An optional `pyext.toml` at the package root overrides the built-in
//! defaults. A missing file means "use the defaults"; a malformed file is an
//! error. Command-line flags take precedence over anything set here.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BuildError;

/// Name of the configuration file at the package root.
pub const CONFIG_FILE: &str = "pyext.toml";

/// Default parallelism hint passed to the build tool.
pub const DEFAULT_JOBS: usize = 8;

/// CMake variables derived from `--debug` and the probed interpreter.
const MANAGED_CMAKE_VARIABLES: &[&str] = &["CMAKE_BUILD_TYPE", "PY_VERSION"];

/// Project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package metadata settings
    pub package: PackageConfig,

    /// Native build settings
    pub build: BuildSettings,

    /// Install settings
    pub install: InstallConfig,
}

/// Package metadata settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageConfig {
    /// Distribution name
    pub name: String,

    /// File whose first line is the version, relative to the package root
    pub version_file: PathBuf,

    /// Long description file, relative to the package root
    pub readme: PathBuf,

    /// One-line summary
    pub summary: String,

    /// Project URL
    pub url: Option<String>,

    /// License name
    pub license: Option<String>,

    /// Extension modules built by CMake
    pub extensions: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: "vowpalwabbit".to_string(),
            version_file: PathBuf::from("../version.txt"),
            readme: PathBuf::from("README.rst"),
            summary: "Vowpal Wabbit Python package".to_string(),
            url: Some("https://github.com/VowpalWabbit/vowpal_wabbit".to_string()),
            license: Some("BSD 3-Clause License".to_string()),
            extensions: vec!["pylibvw".to_string()],
        }
    }
}

/// Native build settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSettings {
    /// Interpreter to probe (defaults to PYTHON, then python3/python on PATH)
    pub python: Option<PathBuf>,

    /// CMake project directory, relative to the package root
    pub cmake_source_dir: PathBuf,

    /// Parallelism hint for the build step
    pub jobs: Option<usize>,

    /// CMake target to build (defaults to the extension name)
    pub target: Option<String>,

    /// Extra arguments appended to the configure step
    pub cmake_args: Vec<String>,

    /// Library directory hint for the numerics dependency
    pub boost_library_dir: Option<PathBuf>,

    /// Include directory hint for the numerics dependency
    pub boost_include_dir: Option<PathBuf>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            python: None,
            cmake_source_dir: PathBuf::from(".."),
            jobs: None,
            target: None,
            cmake_args: Vec::new(),
            boost_library_dir: None,
            boost_include_dir: None,
        }
    }
}

impl BuildSettings {
    /// First managed variable that `cmake_args` tries to define, if any.
    ///
    /// Understands `-DNAME=value`, `-DNAME:TYPE=value` and `-D NAME=value`.
    fn redefined_variable(&self) -> Option<&'static str> {
        let mut args = self.cmake_args.iter().map(String::as_str);
        while let Some(arg) = args.next() {
            let definition = match arg.strip_prefix("-D") {
                Some("") => args.next().unwrap_or_default(),
                Some(rest) => rest,
                None => continue,
            };
            let name = definition.split(['=', ':']).next().unwrap_or_default().trim();
            if let Some(managed) = MANAGED_CMAKE_VARIABLES.iter().copied().find(|v| *v == name) {
                return Some(managed);
            }
        }
        None
    }
}

/// Install settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstallConfig {
    /// Runtime shared library bundled on Windows, relative to the package root
    pub runtime_asset: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        InstallConfig {
            runtime_asset: PathBuf::from("bin").join("zlib.dll"),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BuildError::io(format!("failed to read config: {}", path.display()), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        if let Some(variable) = config.build.redefined_variable() {
            return Err(BuildError::Config {
                path: path.to_path_buf(),
                message: format!(
                    "cmake-args must not define {} (set by pyext from --debug and the interpreter)",
                    variable
                ),
            });
        }

        Ok(config)
    }

    /// Load `pyext.toml` from the package root, or defaults if it doesn't exist.
    pub fn load_or_default(root: &Path) -> Result<Self, BuildError> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parallelism hint, never below one.
    pub fn jobs(&self) -> usize {
        self.build.jobs.unwrap_or(DEFAULT_JOBS).max(1)
    }
}
