//! `compilervars show` command

use anyhow::Result;

use compilervars::builder::SENTINEL_VAR;
use compilervars::env::EnvironmentSnapshot;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let id = &ctx.identity;
    let unset = "-";

    println!("Toolchain:");
    println!();
    println!(
        "  Compiler:     {}",
        if id.family.is_empty() { unset } else { id.family.as_str() }
    );
    println!("  Base:         {}", id.base().unwrap_or(unset));
    println!(
        "  Base version: {}",
        id.base_version.as_deref().unwrap_or(unset)
    );
    println!("  Version:      {}", id.version.as_deref().unwrap_or(unset));
    println!(
        "  Arch:         {}",
        id.architecture.as_deref().unwrap_or(unset)
    );
    println!();

    match ctx.activator.resolve(id) {
        Some(dir) => println!("  Installation: {}", dir.display()),
        None => println!("  Installation: not found"),
    }

    let env = EnvironmentSnapshot::capture();
    let active = env.contains(SENTINEL_VAR, ctx.activator.platform());
    println!(
        "  Active:       {}",
        if active { "yes" } else { "no" }
    );

    Ok(())
}
