//! `rigging show` command
//!
//! Resolves one project (and, with `--target`, one target) and prints it.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::ShowArgs;
use crate::commands::open_workspace;
use rigging::core::target::TargetFilter;
use rigging::ops::{resolve_workspace, Selection};
use rigging::GlobalContext;

pub fn execute(args: ShowArgs, ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<()> {
    let ws = open_workspace(ctx, manifest_path)?;

    let filter = match args.target {
        Some(t) => TargetFilter::any()
            .with_platform([t.platform])
            .with_optimization([t.optimization])
            .with_mode([t.mode])
            .with_framework([t.framework]),
        None => TargetFilter::any(),
    };

    let selection = Selection {
        projects: vec![args.project.clone()],
        filter,
        ..Default::default()
    };
    let set = resolve_workspace(&ws, &selection)?;

    if set.is_empty() {
        eprintln!("`{}` supports none of the selected targets", args.project);
        return Ok(());
    }

    let stdout = io::stdout();
    args.format.emitter(stdout.lock()).emit(&set)?;

    Ok(())
}
