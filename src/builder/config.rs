//! Build configuration and CMake argument assembly.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::probe::InterpreterInfo;
use crate::error::BuildError;

/// CMake configuration name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    /// Select the configuration from a debug flag.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            BuildType::Debug
        } else {
            BuildType::Release
        }
    }

    /// Name passed to `CMAKE_BUILD_TYPE` and `--config`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the dependency search hints came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOrigin {
    /// Set explicitly in `pyext.toml`
    Override,
    /// Borrowed from the interpreter's own library and include directories.
    ///
    /// This assumes the numerics dependency was installed under the same
    /// prefix as the interpreter. Nothing checks that it was.
    InterpreterDefault,
}

/// Search hints for the third-party numerics dependency (Boost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySearchPaths {
    pub library_dir: PathBuf,
    pub include_dir: PathBuf,
    pub origin: HintOrigin,
}

impl DependencySearchPaths {
    /// Use the configured directories, falling back per directory to the
    /// interpreter's `LIBDIR` / `INCLUDEDIR`.
    pub fn resolve(
        info: &InterpreterInfo,
        library_override: Option<&Path>,
        include_override: Option<&Path>,
    ) -> Result<Self, BuildError> {
        let origin = if library_override.is_some() && include_override.is_some() {
            HintOrigin::Override
        } else {
            HintOrigin::InterpreterDefault
        };

        let library_dir = match library_override {
            Some(dir) => dir.to_path_buf(),
            None => info.library_dir.clone(),
        };

        let include_dir = match include_override {
            Some(dir) => dir.to_path_buf(),
            None => info
                .include_root
                .clone()
                .ok_or_else(|| BuildError::EnvironmentUnresolved {
                    variable: "INCLUDEDIR".to_string(),
                    reason: "needed for the boost include hint; set boost-include-dir in pyext.toml"
                        .to_string(),
                })?,
        };

        if origin == HintOrigin::InterpreterDefault {
            tracing::warn!(
                "assuming Boost lives beside the interpreter (lib: {}, include: {}); \
                 set boost-library-dir / boost-include-dir in pyext.toml if it does not",
                library_dir.display(),
                include_dir.display()
            );
        }

        Ok(DependencySearchPaths {
            library_dir,
            include_dir,
            origin,
        })
    }
}

/// Immutable inputs to one configure + build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    output_directory: PathBuf,
    build_type: BuildType,
    interpreter_version: (u32, u32),
    interpreter_include_dir: PathBuf,
    interpreter_library_path: PathBuf,
    extra_search_paths: DependencySearchPaths,
    module_path: PathBuf,
    extra_args: Vec<String>,
}

impl BuildConfig {
    /// Assemble a configuration from probed interpreter facts.
    ///
    /// `output_directory` is made absolute here, because the build driver
    /// changes the working directory before CMake sees it.
    pub fn new(
        output_directory: &Path,
        build_type: BuildType,
        info: &InterpreterInfo,
        extra_search_paths: DependencySearchPaths,
        module_path: &Path,
        extra_args: Vec<String>,
    ) -> Result<Self, BuildError> {
        let output_directory = std::path::absolute(output_directory).map_err(|e| {
            BuildError::io(
                format!("failed to resolve path: {}", output_directory.display()),
                e,
            )
        })?;

        Ok(BuildConfig {
            output_directory,
            build_type,
            interpreter_version: info.version,
            interpreter_include_dir: info.include_dir.clone(),
            interpreter_library_path: info.library_path(),
            extra_search_paths,
            module_path: module_path.to_path_buf(),
            extra_args,
        })
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }
}

/// CMake configure arguments for `config`, in a fixed order.
///
/// Path-search variables are order-sensitive for some generators, so the
/// order here must not change between runs.
pub fn assemble_args(config: &BuildConfig) -> Vec<String> {
    let (major, minor) = config.interpreter_version;
    let hints = &config.extra_search_paths;

    let mut args = vec![
        format!(
            "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}",
            config.output_directory.display()
        ),
        format!(
            "-DCMAKE_MODULE_PATH={};${{CMAKE_MODULE_PATH}}",
            config.module_path.display()
        ),
        format!("-DCMAKE_BUILD_TYPE={}", config.build_type),
        format!("-DPY_VERSION={}.{}", major, minor),
        "-DBUILD_PYTHON=ON".to_string(),
        "-DWARNINGS=OFF".to_string(),
        format!(
            "-DPYTHON_INCLUDE_DIR={}",
            config.interpreter_include_dir.display()
        ),
        format!(
            "-DPYTHON_LIBRARY={}",
            config.interpreter_library_path.display()
        ),
        "-DBoost_NO_SYSTEM_PATHS=ON".to_string(),
        format!("-DBOOST_LIBRARYDIR={}", hints.library_dir.display()),
        format!("-DBOOST_INCLUDEDIR={}", hints.include_dir.display()),
    ];

    args.extend(config.extra_args.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::probe::tests::LINUX_PROBE;

    fn info() -> InterpreterInfo {
        InterpreterInfo::from_json(LINUX_PROBE).unwrap()
    }

    fn config(build_type: BuildType, version: (u32, u32)) -> BuildConfig {
        let mut info = info();
        info.version = version;
        let hints = DependencySearchPaths::resolve(&info, None, None).unwrap();
        BuildConfig::new(
            Path::new("/pkg/build/lib.linux-x86_64-3.11"),
            build_type,
            &info,
            hints,
            Path::new("/pkg"),
            Vec::new(),
        )
        .unwrap()
    }

    fn count_prefix(args: &[String], prefix: &str) -> usize {
        args.iter().filter(|a| a.starts_with(prefix)).count()
    }

    #[test]
    fn test_from_debug() {
        assert_eq!(BuildType::from_debug(true), BuildType::Debug);
        assert_eq!(BuildType::from_debug(false), BuildType::Release);
        assert_eq!(BuildType::Debug.as_str(), "Debug");
    }

    #[test]
    fn test_exactly_one_build_type_and_version_flag() {
        for build_type in [BuildType::Debug, BuildType::Release] {
            for version in [(2, 7), (3, 5), (3, 11), (3, 13)] {
                let args = assemble_args(&config(build_type, version));

                assert_eq!(count_prefix(&args, "-DCMAKE_BUILD_TYPE="), 1);
                assert_eq!(count_prefix(&args, "-DPY_VERSION="), 1);
                assert_eq!(args[2], format!("-DCMAKE_BUILD_TYPE={}", build_type));
                assert_eq!(args[3], format!("-DPY_VERSION={}.{}", version.0, version.1));
            }
        }
    }

    #[test]
    fn test_order_is_stable() {
        let cfg = config(BuildType::Release, (3, 11));
        assert_eq!(assemble_args(&cfg), assemble_args(&cfg));

        let args = assemble_args(&cfg);
        assert_eq!(
            args,
            vec![
                "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY=/pkg/build/lib.linux-x86_64-3.11",
                "-DCMAKE_MODULE_PATH=/pkg;${CMAKE_MODULE_PATH}",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DPY_VERSION=3.11",
                "-DBUILD_PYTHON=ON",
                "-DWARNINGS=OFF",
                "-DPYTHON_INCLUDE_DIR=/usr/include/python3.11",
                "-DPYTHON_LIBRARY=/usr/lib/x86_64-linux-gnu/libpython3.11.so.1.0",
                "-DBoost_NO_SYSTEM_PATHS=ON",
                "-DBOOST_LIBRARYDIR=/usr/lib/x86_64-linux-gnu",
                "-DBOOST_INCLUDEDIR=/usr/include",
            ]
        );
    }

    #[test]
    fn test_output_directory_made_absolute() {
        let info = info();
        let hints = DependencySearchPaths::resolve(&info, None, None).unwrap();
        let cfg = BuildConfig::new(
            Path::new("build/lib"),
            BuildType::Debug,
            &info,
            hints,
            Path::new("/pkg"),
            Vec::new(),
        )
        .unwrap();

        assert!(cfg.output_directory().is_absolute());
        assert!(assemble_args(&cfg)[0].ends_with("lib"));
    }

    #[test]
    fn test_extra_args_appended_last() {
        let info = info();
        let hints = DependencySearchPaths::resolve(&info, None, None).unwrap();
        let cfg = BuildConfig::new(
            Path::new("/out"),
            BuildType::Release,
            &info,
            hints,
            Path::new("/pkg"),
            vec!["-DSTATIC_LINK_VW=ON".to_string(), "-GNinja".to_string()],
        )
        .unwrap();

        let args = assemble_args(&cfg);
        assert_eq!(args.len(), 13);
        assert_eq!(&args[11..], ["-DSTATIC_LINK_VW=ON", "-GNinja"]);
    }

    // The interpreter-derived Boost hints are an unverified assumption: they
    // are only correct when Boost shares the interpreter's install prefix.
    #[test]
    fn test_dependency_hints_default_to_interpreter_dirs() {
        let info = info();
        let hints = DependencySearchPaths::resolve(&info, None, None).unwrap();

        assert_eq!(hints.origin, HintOrigin::InterpreterDefault);
        assert_eq!(hints.library_dir, info.library_dir);
        assert_eq!(hints.include_dir, PathBuf::from("/usr/include"));
    }

    #[test]
    fn test_dependency_hints_override() {
        let info = info();
        let hints = DependencySearchPaths::resolve(
            &info,
            Some(Path::new("/opt/boost/lib")),
            Some(Path::new("/opt/boost/include")),
        )
        .unwrap();

        assert_eq!(hints.origin, HintOrigin::Override);
        assert_eq!(hints.library_dir, PathBuf::from("/opt/boost/lib"));

        let partial =
            DependencySearchPaths::resolve(&info, Some(Path::new("/opt/boost/lib")), None).unwrap();
        assert_eq!(partial.origin, HintOrigin::InterpreterDefault);
        assert_eq!(partial.include_dir, PathBuf::from("/usr/include"));
    }

    #[test]
    fn test_missing_include_root_without_override() {
        let mut info = info();
        info.include_root = None;

        let err = DependencySearchPaths::resolve(&info, None, None).unwrap_err();
        assert!(matches!(err, BuildError::EnvironmentUnresolved { .. }));
    }
}
