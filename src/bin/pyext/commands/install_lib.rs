//! `pyext install_lib` command

use std::path::Path;

use anyhow::Result;

use crate::cli::InstallLibArgs;
use pyext::ops::InstallLib;
use pyext::{Command, Package};

pub fn execute(args: InstallLibArgs, root: &Path) -> Result<()> {
    let pkg = Package::load(root)?;

    let cmd = InstallLib {
        install_dir: args.install_dir,
        build_lib: args.build_dir,
        python: args.python,
    };
    let install_dir = cmd.install_dir.clone();

    Command::InstallLib(cmd).run(&pkg)?;

    eprintln!("   Installed {}", install_dir.display());
    Ok(())
}
