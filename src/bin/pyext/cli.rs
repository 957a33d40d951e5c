//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pyext - build, package and install a CMake-built Python extension
#[derive(Parser)]
#[command(name = "pyext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Package root (the directory holding README.rst and pyext.toml)
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    pub directory: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure and build the extension module with CMake
    #[command(name = "build_ext", alias = "build-ext")]
    BuildExt(BuildExtArgs),

    /// Remove build, dist and egg-info directories
    Clean,

    /// Create a source distribution archive
    Sdist(SdistArgs),

    /// Install the built library tree
    #[command(name = "install_lib", alias = "install-lib")]
    InstallLib(InstallLibArgs),
}

#[derive(Args)]
pub struct BuildExtArgs {
    /// Build the Debug configuration
    #[arg(short, long)]
    pub debug: bool,

    /// Configure only, don't build
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Number of parallel jobs passed to the build tool
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Python interpreter to build for
    #[arg(long, env = "PYTHON")]
    pub python: Option<PathBuf>,
}

#[derive(Args)]
pub struct SdistArgs {
    /// Directory to put the archive in (defaults to dist/)
    #[arg(short, long)]
    pub dist_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct InstallLibArgs {
    /// Directory to install into
    #[arg(short, long)]
    pub install_dir: PathBuf,

    /// Built library tree to install (defaults to build/lib.<platform>)
    #[arg(short, long)]
    pub build_dir: Option<PathBuf>,

    /// Python interpreter used to locate the default build tree
    #[arg(long, env = "PYTHON")]
    pub python: Option<PathBuf>,
}
