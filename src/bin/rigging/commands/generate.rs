//! `rigging generate` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GenerateArgs;
use crate::commands::open_workspace;
use rigging::ops::{generate, GenerateOptions, Selection};
use rigging::GlobalContext;

pub fn execute(args: GenerateArgs, ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<()> {
    let ws = open_workspace(ctx, manifest_path)?;

    let opts = GenerateOptions {
        selection: Selection {
            solution: args.solution,
            projects: args.projects,
            filter: args.filter.to_filter(),
            jobs: args.jobs,
        },
        format: args.format,
        output: args.output,
    };

    let result = generate(&ws, &opts)?;

    if let Some(path) = result.output {
        eprintln!(
            "   Generated {} configuration(s) for {} project(s) ({}) -> {}",
            result.configurations,
            result.projects,
            result.format,
            path.display()
        );
    }

    Ok(())
}
