//! `compilervars run` command

use anyhow::Result;

use compilervars::env::EnvironmentSnapshot;
use compilervars::util::process::ProcessBuilder;

use super::Context;
use crate::cli::RunArgs;

/// Run the program with the activated environment and return its exit code.
///
/// Only the child sees the changes; this process's environment is untouched.
pub fn execute(ctx: &Context, args: RunArgs) -> Result<i32> {
    let Some((program, rest)) = args.args.split_first() else {
        anyhow::bail!("no program given");
    };

    let platform = ctx.activator.platform();
    let before = EnvironmentSnapshot::capture();
    let diff = ctx
        .activator
        .compute_diff_with(&ctx.identity, &before, ctx.force)?;
    let vars = diff.resolve_against(&before, platform);

    tracing::debug!("Running {} with {} changed variables", program, vars.len());

    let status = ProcessBuilder::new(program).args(rest).envs(vars).status()?;

    Ok(status.code().unwrap_or(1))
}
