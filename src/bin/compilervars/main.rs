//! compilervars CLI - Intel compiler environment activation

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use compilervars::util::diagnostic::emit;
use compilervars::util::errors::ActivationError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.downcast_ref::<ActivationError>() {
                Some(activation) => emit(&activation.to_diagnostic(), color),
                None => eprintln!("error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("compilervars=debug")
    } else {
        EnvFilter::new("compilervars=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = commands::Context::load(&cli.identity, !cli.no_color)?;

    // Execute command
    match cli.command {
        Commands::Show => commands::show::execute(&ctx).map(|_| 0),
        Commands::Command => commands::command::execute(&ctx).map(|_| 0),
        Commands::Diff(args) => commands::diff::execute(&ctx, args).map(|_| 0),
        Commands::Run(args) => commands::run::execute(&ctx, args),
    }
}
