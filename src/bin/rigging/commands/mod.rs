//! Command implementations

use std::path::PathBuf;

use anyhow::Result;

use rigging::core::Workspace;
use rigging::util::diagnostic::suggestions;
use rigging::GlobalContext;

pub mod check;
pub mod completions;
pub mod generate;
pub mod init;
pub mod matrix;
pub mod show;
pub mod tree;

/// Load the workspace from `--manifest-path` or by searching upward.
pub fn open_workspace(ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<Workspace> {
    let manifest_path = match manifest_path {
        Some(path) => path,
        None => ctx
            .find_manifest()
            .map_err(|e| anyhow::anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))?,
    };

    Workspace::new(&manifest_path, ctx)
}
