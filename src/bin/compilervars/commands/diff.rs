//! `compilervars diff` command

use anyhow::{Context as _, Result};

use compilervars::env::{EnvChange, EnvironmentDiff};

use super::Context;
use crate::cli::DiffArgs;

pub fn execute(ctx: &Context, args: DiffArgs) -> Result<()> {
    let diff = ctx.activator.compute_diff_for(&ctx.identity, ctx.force)?;

    if args.json {
        let json = serde_json::to_string_pretty(&diff).context("failed to serialize diff")?;
        println!("{}", json);
    } else {
        let sep = ctx.activator.platform().path_separator();
        for line in format_diff(&diff, sep) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// `KEY=VALUE` for replacements, `KEY+=a<sep>b` for prepended segments.
fn format_diff(diff: &EnvironmentDiff, sep: char) -> Vec<String> {
    diff.iter()
        .map(|(name, change)| match change {
            EnvChange::Value(value) => format!("{}={}", name, value),
            EnvChange::PathList(segments) => {
                format!("{}+={}", name, segments.join(&sep.to_string()))
            }
        })
        .collect()
}
