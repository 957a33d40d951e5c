//! `pyext build_ext` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildExtArgs;
use pyext::ops::BuildExt;
use pyext::Package;

pub fn execute(args: BuildExtArgs, root: &Path) -> Result<()> {
    let pkg = Package::load(root)?;

    let cmd = BuildExt {
        debug: args.debug,
        dry_run: args.dry_run,
        jobs: args.jobs,
        python: args.python,
    };

    let result = cmd.build(&pkg)?;

    if args.dry_run {
        eprintln!("  Configured {} (dry run)", pkg.name());
    }
    for artifact in &result.artifacts {
        eprintln!(
            "    Finished `{}` -> {}",
            artifact.extension,
            artifact.path.display()
        );
    }

    Ok(())
}
