//! Package - metadata, extensions and on-disk layout.
//!
//! A Package combines `pyext.toml` settings with the version and long
//! description read from sibling files. Both files are required; loading
//! fails if either is missing.

use std::path::{Path, PathBuf};

use crate::core::ExtensionDescriptor;
use crate::error::BuildError;
use crate::util::fs::{read_first_line, read_to_string};
use crate::util::Config;

/// Metadata written into distributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub summary: String,
    pub long_description: String,
    pub url: Option<String>,
    pub license: Option<String>,
}

/// A Python package whose native part is built by CMake.
#[derive(Debug, Clone)]
pub struct Package {
    /// Absolute package root
    root: PathBuf,

    metadata: PackageMetadata,

    extensions: Vec<ExtensionDescriptor>,

    config: Config,
}

impl Package {
    /// Load the package rooted at `root`, reading `pyext.toml` if present.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let root = absolute(root)?;
        let config = Config::load_or_default(&root)?;
        Self::with_config(&root, config)
    }

    /// Load the package with an explicit configuration.
    pub fn with_config(root: &Path, config: Config) -> Result<Self, BuildError> {
        let root = absolute(root)?;

        let version = read_first_line(&root.join(&config.package.version_file))?;
        let long_description = read_to_string(&root.join(&config.package.readme))?;

        let metadata = PackageMetadata {
            name: config.package.name.clone(),
            version,
            summary: config.package.summary.clone(),
            long_description,
            url: config.package.url.clone(),
            license: config.package.license.clone(),
        };

        let extensions = config
            .package
            .extensions
            .iter()
            .map(ExtensionDescriptor::cmake)
            .collect();

        tracing::debug!(
            "loaded package {} {} from {}",
            metadata.name,
            metadata.version,
            root.display()
        );

        Ok(Package {
            root,
            metadata,
            extensions,
            config,
        })
    }

    /// Get the package root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the package metadata.
    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get the package version.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Extension modules built by CMake.
    pub fn extensions(&self) -> &[ExtensionDescriptor] {
        &self.extensions
    }

    /// Get the configuration the package was loaded with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Top-level build directory.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Distribution output directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// Packaging metadata directory.
    pub fn egg_info_dir(&self) -> PathBuf {
        self.root
            .join(format!("{}.egg-info", self.metadata.name.replace('-', "_")))
    }

    /// Directory holding built modules, e.g. `build/lib.linux-x86_64-3.11`.
    pub fn build_lib_dir(&self, plat_specifier: &str) -> PathBuf {
        self.build_dir().join(format!("lib.{}", plat_specifier))
    }

    /// Build scratch directory, e.g. `build/temp.linux-x86_64-3.11`.
    pub fn build_temp_dir(&self, plat_specifier: &str) -> PathBuf {
        self.build_dir().join(format!("temp.{}", plat_specifier))
    }

    /// CMake project directory.
    pub fn cmake_source_dir(&self) -> PathBuf {
        self.root.join(&self.config.build.cmake_source_dir)
    }

    /// Runtime shared library bundled on platforms that need it.
    pub fn runtime_asset(&self) -> PathBuf {
        self.root.join(&self.config.install.runtime_asset)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path)
        .map_err(|e| BuildError::io(format!("failed to resolve path: {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("python");
        fs::create_dir_all(&root).unwrap();
        fs::write(tmp.path().join("version.txt"), "8.6.1\n").unwrap();
        fs::write(root.join("README.rst"), "Vowpal Wabbit\n=============\n").unwrap();
        (tmp, root)
    }

    #[test]
    fn test_load_reads_version_and_readme() {
        let (_tmp, root) = fixture();
        let pkg = Package::load(&root).unwrap();

        assert_eq!(pkg.version(), "8.6.1");
        assert_eq!(pkg.name(), "vowpalwabbit");
        assert_eq!(
            pkg.metadata().long_description,
            "Vowpal Wabbit\n=============\n"
        );
        assert_eq!(pkg.extensions().len(), 1);
        assert_eq!(pkg.extensions()[0].name(), "pylibvw");
        assert!(pkg.root().is_absolute());
    }

    #[test]
    fn test_missing_version_file() {
        let (tmp, root) = fixture();
        fs::remove_file(tmp.path().join("version.txt")).unwrap();

        let err = Package::load(&root).unwrap_err();
        match err {
            BuildError::MissingInputFile { path } => assert!(path.ends_with("version.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_readme() {
        let (_tmp, root) = fixture();
        fs::remove_file(root.join("README.rst")).unwrap();

        let err = Package::load(&root).unwrap_err();
        assert!(matches!(err, BuildError::MissingInputFile { .. }));
    }

    #[test]
    fn test_layout() {
        let (_tmp, root) = fixture();
        let pkg = Package::load(&root).unwrap();

        assert_eq!(pkg.build_dir(), pkg.root().join("build"));
        assert_eq!(pkg.dist_dir(), pkg.root().join("dist"));
        assert_eq!(pkg.egg_info_dir(), pkg.root().join("vowpalwabbit.egg-info"));
        assert_eq!(
            pkg.build_temp_dir("linux-x86_64-3.11"),
            pkg.root().join("build").join("temp.linux-x86_64-3.11")
        );
        assert_eq!(pkg.runtime_asset(), pkg.root().join("bin").join("zlib.dll"));
    }
}
