//! `pyext sdist` command

use std::path::Path;

use anyhow::Result;

use crate::cli::SdistArgs;
use pyext::ops::Sdist;
use pyext::Package;

pub fn execute(args: SdistArgs, root: &Path) -> Result<()> {
    let pkg = Package::load(root)?;

    let archive = Sdist {
        dist_dir: args.dist_dir,
    }
    .create(&pkg)?;

    eprintln!("    Packaged {}", archive.display());
    Ok(())
}
