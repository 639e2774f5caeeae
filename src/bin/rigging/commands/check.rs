//! `rigging check` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::open_workspace;
use rigging::ops::check;
use rigging::GlobalContext;

pub fn execute(args: CheckArgs, ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<()> {
    let ws = open_workspace(ctx, manifest_path)?;
    let report = check(&ws, args.jobs)?;

    eprintln!(
        "    Checked {} project(s) ({} abstract), {} solution(s), {} target(s): {} configuration(s) resolved",
        report.projects,
        report.abstract_projects,
        report.solutions,
        report.targets,
        report.configurations
    );

    Ok(())
}
