//! Native extension module descriptors.

use std::path::{Path, PathBuf};

/// A native module built by the external build tool.
///
/// Sources are owned by the CMake project, so the source list is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    name: String,
    sources: Vec<PathBuf>,
}

impl ExtensionDescriptor {
    /// Describe an extension built entirely by CMake.
    pub fn cmake(name: impl Into<String>) -> Self {
        ExtensionDescriptor {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    /// Dotted module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sources compiled by the orchestrator itself. Always empty.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Path of the compiled module inside `build_lib`.
    ///
    /// Dotted names map to nested directories: `pkg.mod` with suffix `.so`
    /// lands at `<build_lib>/pkg/mod.so`.
    pub fn fullpath(&self, build_lib: &Path, ext_suffix: &str) -> PathBuf {
        let (dir, base) = self.module_dir(build_lib);
        dir.join(format!("{}{}", base, ext_suffix))
    }

    /// Locate the compiled module under `build_lib`.
    ///
    /// The build tool picks the file name, so any `<base><suffix>` the
    /// interpreter can import counts. Suffixes are tried in order.
    pub fn find_module(&self, build_lib: &Path, suffixes: &[String]) -> Option<PathBuf> {
        let (dir, base) = self.module_dir(build_lib);
        suffixes
            .iter()
            .map(|suffix| dir.join(format!("{}{}", base, suffix)))
            .find(|path| path.is_file())
    }

    /// Directory holding the module and the module's base name.
    fn module_dir(&self, build_lib: &Path) -> (PathBuf, &str) {
        let mut parts: Vec<&str> = self.name.split('.').collect();
        let base = parts.pop().unwrap_or_default();

        let mut dir = build_lib.to_path_buf();
        for part in parts {
            dir.push(part);
        }
        (dir, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmake_extension_has_no_sources() {
        let ext = ExtensionDescriptor::cmake("pylibvw");
        assert_eq!(ext.name(), "pylibvw");
        assert!(ext.sources().is_empty());
    }

    #[test]
    fn test_fullpath() {
        let ext = ExtensionDescriptor::cmake("pylibvw");
        let path = ext.fullpath(
            Path::new("/pkg/build/lib.linux-x86_64-3.11"),
            ".cpython-311-x86_64-linux-gnu.so",
        );
        assert_eq!(
            path,
            Path::new("/pkg/build/lib.linux-x86_64-3.11/pylibvw.cpython-311-x86_64-linux-gnu.so")
        );
    }

    #[test]
    fn test_fullpath_dotted_name() {
        let ext = ExtensionDescriptor::cmake("vowpalwabbit.pylibvw");
        let path = ext.fullpath(Path::new("out"), ".pyd");
        assert_eq!(path, Path::new("out").join("vowpalwabbit").join("pylibvw.pyd"));
    }

    #[test]
    fn test_find_module_accepts_any_importable_suffix() {
        let tmp = tempfile::TempDir::new().unwrap();
        let build_lib = tmp.path().join("lib.linux-x86_64-3.11");
        std::fs::create_dir_all(build_lib.join("vowpalwabbit")).unwrap();
        let suffixes: Vec<String> = [".cpython-311-x86_64-linux-gnu.so", ".abi3.so", ".so"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let ext = ExtensionDescriptor::cmake("vowpalwabbit.pylibvw");
        assert_eq!(ext.find_module(&build_lib, &suffixes), None);

        let plain = build_lib.join("vowpalwabbit").join("pylibvw.so");
        std::fs::write(&plain, "elf").unwrap();
        assert_eq!(ext.find_module(&build_lib, &suffixes), Some(plain));

        let tagged = build_lib
            .join("vowpalwabbit")
            .join("pylibvw.cpython-311-x86_64-linux-gnu.so");
        std::fs::write(&tagged, "elf").unwrap();
        assert_eq!(ext.find_module(&build_lib, &suffixes), Some(tagged));
    }
}
