//! `rigging matrix` command

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::cli::MatrixArgs;
use crate::commands::open_workspace;
use rigging::util::diagnostic::suggestions;
use rigging::GlobalContext;

pub fn execute(args: MatrixArgs, ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<()> {
    let ws = open_workspace(ctx, manifest_path)?;
    let matrix = ws.manifest().target_matrix()?.restrict(&args.filter.to_filter());

    let targets: Vec<_> = match args.project {
        Some(ref name) => {
            let registry = ws.manifest().registry()?;
            let project = registry.get(name).ok_or_else(|| {
                anyhow!(
                    "no project named `{}` in {}\n{}",
                    name,
                    ws.manifest_path().display(),
                    suggestions::PROJECT_NOT_FOUND
                )
            })?;
            matrix.applicable(project).copied().collect()
        }
        None => matrix.targets().to_vec(),
    };

    for target in &targets {
        println!("{:<32} {}", target.to_string(), target.name());
    }

    if ctx.is_verbose() {
        eprintln!("{} target(s)", targets.len());
    }

    Ok(())
}
