//! Workspace - the loaded declarations plus tool configuration.
//!
//! A Workspace represents one declarations file and the directory it lives
//! in, providing centralized access to paths and settings.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::Manifest;
use crate::util::config::{load_config, project_config_path, Config};
use crate::util::GlobalContext;

/// Canonical declarations file name.
pub const MANIFEST_NAME: &str = "Rigging.toml";

/// Accepted alternative spelling.
pub const MANIFEST_ALIAS: &str = "rigging.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Rigging.toml` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },

    #[error(
        "both `{}` and `{}` exist; remove one of them",
        primary.display(),
        alias.display()
    )]
    AmbiguousManifest { primary: PathBuf, alias: PathBuf },
}

/// Find the declarations file in `dir` (not searching upward).
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let primary = dir.join(MANIFEST_NAME);
    let alias = dir.join(MANIFEST_ALIAS);

    // On case-insensitive filesystems both names resolve to the same file.
    let same_file = match (primary.canonicalize(), alias.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    match (primary.is_file(), alias.is_file()) {
        (true, true) if !same_file => Err(ManifestError::AmbiguousManifest { primary, alias }),
        (true, _) => Ok(primary),
        (false, true) => Ok(alias),
        (false, false) => Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        }),
    }
}

/// A loaded declarations file and its effective configuration.
#[derive(Debug)]
pub struct Workspace {
    manifest: Manifest,
    manifest_path: PathBuf,
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Load the declarations at `manifest_path`, merging the global and
    /// project-local tool configuration.
    pub fn new(manifest_path: &Path, ctx: &GlobalContext) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest.manifest_dir().to_path_buf();
        let config = load_config(&ctx.config_path(), &project_config_path(&root));

        tracing::debug!(
            "loaded {} ({} project(s))",
            manifest_path.display(),
            manifest.projects().len()
        );

        Ok(Workspace {
            manifest,
            manifest_path: manifest_path.to_path_buf(),
            root,
            config,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory holding the declarations file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The project-local `.rigging` directory.
    pub fn rigging_dir(&self) -> PathBuf {
        self.root.join(".rigging")
    }
}
