//! Implementation of `clean`.

use crate::core::Package;
use crate::error::BuildError;
use crate::ops::LifecycleCommand;
use crate::util::fs::remove_dir_all_if_exists;

/// Removes the build, distribution and packaging-metadata directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clean;

impl LifecycleCommand for Clean {
    fn run(&self, pkg: &Package) -> Result<(), BuildError> {
        for dir in [pkg.dist_dir(), pkg.build_dir(), pkg.egg_info_dir()] {
            if remove_dir_all_if_exists(&dir)? {
                tracing::info!("Removed {}", dir.display());
            } else {
                tracing::debug!("{} does not exist, skipping", dir.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::ops::tests::package_fixture;

    #[test]
    fn test_clean_removes_generated_dirs() {
        let (_tmp, pkg) = package_fixture();
        fs::create_dir_all(pkg.build_dir().join("temp.linux-x86_64-3.11")).unwrap();
        fs::create_dir_all(pkg.dist_dir()).unwrap();
        fs::create_dir_all(pkg.egg_info_dir()).unwrap();
        fs::write(pkg.egg_info_dir().join("PKG-INFO"), "Name: vowpalwabbit\n").unwrap();

        Clean.run(&pkg).unwrap();

        assert!(!pkg.build_dir().exists());
        assert!(!pkg.dist_dir().exists());
        assert!(!pkg.egg_info_dir().exists());
        assert!(pkg.root().join("vowpalwabbit").join("__init__.py").exists());
    }

    #[test]
    fn test_clean_twice() {
        let (_tmp, pkg) = package_fixture();
        fs::create_dir_all(pkg.build_dir()).unwrap();

        Clean.run(&pkg).unwrap();
        Clean.run(&pkg).unwrap();
        assert!(!pkg.build_dir().exists());
    }
}
