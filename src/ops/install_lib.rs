//! Implementation of `install_lib`.
//!
//! Copies the built library tree into the install directory. On platforms
//! that need it, the runtime shared library the module links against is
//! copied alongside.

use std::path::{Path, PathBuf};

use crate::builder::InterpreterInfo;
use crate::core::{HostOs, Package};
use crate::error::BuildError;
use crate::ops::{resolve_python, LifecycleCommand};
use crate::util::fs::{copy_dir_all, copy_file, ensure_dir};

/// Options for `install_lib`.
#[derive(Debug, Clone)]
pub struct InstallLib {
    /// Directory to install into
    pub install_dir: PathBuf,

    /// Built library tree (defaults to `build/lib.<plat>` for the interpreter)
    pub build_lib: Option<PathBuf>,

    /// Interpreter used to locate the default build tree
    pub python: Option<PathBuf>,
}

impl InstallLib {
    pub fn new(install_dir: &Path) -> Self {
        InstallLib {
            install_dir: install_dir.to_path_buf(),
            build_lib: None,
            python: None,
        }
    }

    /// Install `build_lib` into the install directory as `host` requires.
    pub fn install(
        &self,
        pkg: &Package,
        build_lib: &Path,
        host: &HostOs,
    ) -> Result<(), BuildError> {
        ensure_dir(&self.install_dir)?;

        if build_lib.is_dir() {
            let copied = copy_dir_all(build_lib, &self.install_dir)?;
            tracing::info!(
                "Installed {} files from {} to {}",
                copied,
                build_lib.display(),
                self.install_dir.display()
            );
        } else {
            tracing::warn!(
                "{} does not exist -- no modules to install",
                build_lib.display()
            );
        }

        if !host.requires_runtime_asset() {
            return Ok(());
        }

        let asset = pkg.runtime_asset();
        if !asset.is_file() {
            return Err(BuildError::MissingRuntimeAsset { path: asset });
        }

        let file_name = asset
            .file_name()
            .ok_or_else(|| BuildError::MissingRuntimeAsset { path: asset.clone() })?;
        let dest = self.install_dir.join(file_name);
        copy_file(&asset, &dest)?;
        tracing::info!("Copied runtime library {} for {}", dest.display(), host);

        Ok(())
    }
}

impl LifecycleCommand for InstallLib {
    fn run(&self, pkg: &Package) -> Result<(), BuildError> {
        match self.build_lib {
            Some(ref build_lib) => self.install(pkg, build_lib, &HostOs::current()),
            None => {
                let python = resolve_python(self.python.as_ref(), pkg)?;
                let info = InterpreterInfo::probe(&python)?;
                let build_lib = pkg.build_lib_dir(&info.plat_specifier());
                self.install(pkg, &build_lib, &info.host_os)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::ops::tests::package_fixture;

    fn built_lib(pkg: &Package) -> PathBuf {
        let build_lib = pkg.build_lib_dir("win-amd64-3.11");
        fs::create_dir_all(&build_lib).unwrap();
        fs::write(build_lib.join("pylibvw.cp311-win_amd64.pyd"), "MZ").unwrap();
        build_lib
    }

    #[test]
    fn test_install_copies_build_tree() {
        let (tmp, pkg) = package_fixture();
        let build_lib = built_lib(&pkg);
        let site = tmp.path().join("site-packages");

        InstallLib::new(&site)
            .install(&pkg, &build_lib, &HostOs::Linux)
            .unwrap();

        assert!(site.join("pylibvw.cp311-win_amd64.pyd").exists());
        assert!(!site.join("zlib.dll").exists());
    }

    #[test]
    fn test_windows_copies_runtime_library() {
        let (tmp, pkg) = package_fixture();
        let build_lib = built_lib(&pkg);
        fs::create_dir_all(pkg.root().join("bin")).unwrap();
        fs::write(pkg.runtime_asset(), "zlib").unwrap();
        let site = tmp.path().join("site-packages");

        InstallLib::new(&site)
            .install(&pkg, &build_lib, &HostOs::Windows)
            .unwrap();

        assert_eq!(fs::read_to_string(site.join("zlib.dll")).unwrap(), "zlib");
    }

    #[test]
    fn test_windows_missing_runtime_library() {
        let (tmp, pkg) = package_fixture();
        let build_lib = built_lib(&pkg);

        let err = InstallLib::new(&tmp.path().join("site-packages"))
            .install(&pkg, &build_lib, &HostOs::Windows)
            .unwrap_err();

        match err {
            BuildError::MissingRuntimeAsset { path } => assert_eq!(path, pkg.runtime_asset()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_platforms_ignore_missing_runtime_library() {
        let (tmp, pkg) = package_fixture();
        let build_lib = built_lib(&pkg);
        assert!(!pkg.runtime_asset().exists());

        for host in [HostOs::Linux, HostOs::MacOs, HostOs::Other("FreeBSD".into())] {
            let site = tmp.path().join(format!("site-{}", host));
            InstallLib::new(&site).install(&pkg, &build_lib, &host).unwrap();
            assert!(!site.join("zlib.dll").exists());
        }
    }

    #[test]
    fn test_run_with_explicit_build_lib() {
        let (tmp, pkg) = package_fixture();
        let build_lib = built_lib(&pkg);
        let site = tmp.path().join("site-packages");

        let cmd = InstallLib {
            build_lib: Some(build_lib),
            ..InstallLib::new(&site)
        };

        // The runtime library is only required on Windows hosts.
        if HostOs::current().requires_runtime_asset() {
            assert!(cmd.run(&pkg).is_err());
        } else {
            cmd.run(&pkg).unwrap();
            assert!(site.join("pylibvw.cp311-win_amd64.pyd").exists());
        }
    }
}
