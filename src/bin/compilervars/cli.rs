//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

/// compilervars - Activate the Intel compiler environment
#[derive(Parser)]
#[command(name = "compilervars")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Toolchain identity overrides. Unset flags fall back to config files.
#[derive(Args, Debug, Clone, Default)]
pub struct IdentityArgs {
    /// Compiler family (e.g. intel)
    #[arg(long, global = true)]
    pub compiler: Option<String>,

    /// Base compiler ("gcc" or "Visual Studio")
    #[arg(long, global = true)]
    pub base: Option<String>,

    /// Base compiler version (e.g. 15 for Visual Studio 2017)
    #[arg(long, global = true)]
    pub base_version: Option<String>,

    /// Vendor compiler version (e.g. 19.1)
    #[arg(id = "toolchain_version", long = "toolchain-version", global = true)]
    pub version: Option<String>,

    /// Target architecture (x86 or x86_64)
    #[arg(long, global = true)]
    pub arch: Option<String>,

    /// Activate even if the environment is already set up
    #[arg(long, global = true)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the toolchain identity and where it is installed
    Show,

    /// Print the activation command line
    Command,

    /// Print the environment changes activation makes
    Diff(DiffArgs),

    /// Run a program inside the activated environment
    Run(RunArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Program and arguments to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
