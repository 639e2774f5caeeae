//! Implementation of `rigging init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::generate_default_manifest;
use crate::core::workspace::{MANIFEST_ALIAS, MANIFEST_NAME};

/// Write a starter `Rigging.toml` into `path`, creating the directory if
/// needed. Returns the path of the new file.
pub fn init_project(path: &Path, name: &str) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    for existing in [MANIFEST_NAME, MANIFEST_ALIAS] {
        if path.join(existing).exists() {
            bail!("`{}` already exists in `{}`", existing, path.display());
        }
    }

    let manifest_path = path.join(MANIFEST_NAME);
    fs::write(&manifest_path, generate_default_manifest(name))
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_project() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("Havana");

        let path = init_project(&dir, "Havana").unwrap();
        assert!(path.ends_with("Rigging.toml"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("name = \"Havana\""));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Rigging.toml"), "").unwrap();

        let err = init_project(tmp.path(), "Game").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
