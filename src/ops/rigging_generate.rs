//! Implementation of `rigging generate`.
//!
//! Load declarations, build the target matrix, resolve every selected
//! (project, target) pair, then hand the set to an emitter. Nothing is
//! written if resolution or emission fails.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::Workspace;
use crate::emit::EmitFormat;
use crate::ops::resolve::{resolve_workspace, Selection};

/// Options for `rigging generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub selection: Selection,

    /// Output format (CLI > config > json).
    pub format: Option<EmitFormat>,

    /// Output file (CLI > config > stdout).
    pub output: Option<PathBuf>,
}

/// What a generate run produced.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub configurations: usize,
    pub projects: usize,
    pub format: EmitFormat,
    /// `None` when written to stdout.
    pub output: Option<PathBuf>,
}

pub fn generate(ws: &Workspace, opts: &GenerateOptions) -> Result<GenerateResult> {
    let config = ws.config();
    let format = opts.format.or_else(|| config.format()).unwrap_or_default();
    let output = opts.output.clone().or_else(|| {
        config.emit.output.as_ref().map(|p| {
            if p.is_relative() {
                ws.root().join(p)
            } else {
                p.clone()
            }
        })
    });

    let set = resolve_workspace(ws, &opts.selection)?;

    match output {
        Some(ref path) => {
            write_output(path, |buf| format.emitter(buf).emit(&set))?;
            tracing::info!("wrote {} configuration(s) to {}", set.len(), path.display());
        }
        None => {
            let mut buf = Vec::new();
            format.emitter(&mut buf).emit(&set)?;
            io::stdout()
                .lock()
                .write_all(&buf)
                .context("failed to write to stdout")?;
        }
    }

    Ok(GenerateResult {
        configurations: set.len(),
        projects: set.projects().len(),
        format,
        output,
    })
}

/// Render into memory first so a failing emitter leaves `path` untouched.
fn write_output(path: &Path, emit: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Result<()> {
    let mut buf = Vec::new();
    emit(&mut buf)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create output directory: {}", parent.display())
        })?;
    }
    fs::write(path, &buf).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_manifest, ENGINE_WORKSPACE};
    use crate::util::GlobalContext;
    use tempfile::TempDir;

    #[test]
    fn test_generate_writes_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(tmp.path(), ENGINE_WORKSPACE);
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        let ws = Workspace::new(&path, &ctx).unwrap();

        let out = tmp.path().join("out").join("configs.json");
        let result = generate(
            &ws,
            &GenerateOptions {
                output: Some(out.clone()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(result.format, EmitFormat::Json);
        assert_eq!(result.projects, 5);
        assert_eq!(result.configurations, 5 * 4);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["configurations"].as_array().unwrap().len(), 20);
    }

    #[test]
    fn test_failed_resolution_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(
            tmp.path(),
            r#"
[[project]]
name = "A"
[[project.dependency]]
name = "B"

[[project]]
name = "B"
[[project.dependency]]
name = "A"
"#,
        );
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        let ws = Workspace::new(&path, &ctx).unwrap();

        let out = tmp.path().join("configs.json");
        let err = generate(
            &ws,
            &GenerateOptions {
                output: Some(out.clone()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(err
            .downcast_ref::<crate::resolver::ResolveError>()
            .is_some());
        assert!(!out.exists());
    }

    #[test]
    fn test_failed_emit_keeps_previous_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("configs.json");
        fs::write(&out, "previous").unwrap();

        let err = write_output(&out, |buf| {
            buf.extend_from_slice(b"{\"version\": 1,");
            anyhow::bail!("emitter failed")
        })
        .unwrap_err();

        assert!(err.to_string().contains("emitter failed"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a").join("b").join("out.txt");

        write_output(&out, |buf| {
            buf.extend_from_slice(b"ok");
            Ok(())
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "ok");
    }
}
