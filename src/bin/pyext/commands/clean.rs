//! `pyext clean` command

use std::path::Path;

use anyhow::Result;

use pyext::ops::Clean;
use pyext::{Command, Package};

pub fn execute(root: &Path) -> Result<()> {
    let pkg = Package::load(root)?;
    Command::Clean(Clean).run(&pkg)?;
    eprintln!("     Cleaned {}", pkg.root().display());
    Ok(())
}
