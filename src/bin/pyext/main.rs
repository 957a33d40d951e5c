//! pyext CLI - native extension build orchestrator

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pyext::util::diagnostic::emit;
use pyext::BuildError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<BuildError>() {
            Some(build_err) => emit(&build_err.to_report(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("pyext=debug")
    } else {
        EnvFilter::new("pyext=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::BuildExt(args) => commands::build_ext::execute(args, &cli.directory),
        Commands::Clean => commands::clean::execute(&cli.directory),
        Commands::Sdist(args) => commands::sdist::execute(args, &cli.directory),
        Commands::InstallLib(args) => commands::install_lib::execute(args, &cli.directory),
    }
}
