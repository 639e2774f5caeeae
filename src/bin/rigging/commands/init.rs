//! `rigging init` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cli::InitArgs;
use rigging::ops::init_project;

/// Determines the project name from the arguments or directory.
pub fn determine_project_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

/// Validates a project name for use in placeholders and file names.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('.') {
        return Err("project name cannot start with a hyphen or dot");
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

pub fn execute(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let name = determine_project_name(&args.name, &path);

    if let Err(msg) = validate_project_name(&name) {
        bail!("invalid project name `{}`: {}", name, msg);
    }

    let manifest = init_project(&path, &name)?;
    eprintln!("     Created `{}` in {}", name, manifest.display());

    Ok(())
}
