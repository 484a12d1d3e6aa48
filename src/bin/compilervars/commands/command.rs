//! `compilervars command` command

use anyhow::Result;

use compilervars::env::EnvironmentSnapshot;
use compilervars::util::diagnostic::{emit, Diagnostic};

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let env = EnvironmentSnapshot::capture();

    match ctx
        .activator
        .command_line_for(&ctx.identity, &env, ctx.force)?
    {
        Some(line) => println!("{}", line),
        None => emit(
            &Diagnostic::note(format!(
                "no activation applies to toolchain `{}`",
                ctx.identity
            )),
            ctx.color,
        ),
    }

    Ok(())
}
