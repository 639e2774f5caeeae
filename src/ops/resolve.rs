//! Workspace resolution operations.

use anyhow::{bail, Context, Result};

use crate::core::registry::ProjectRegistry;
use crate::core::target::{TargetFilter, TargetMatrix};
use crate::core::Workspace;
use crate::resolver::{ResolveOptions, ResolvedSet, Resolver};

/// Which projects and targets to resolve.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Restrict to the members of this solution.
    pub solution: Option<String>,

    /// Restrict to these projects. Combined with `solution` if both are set.
    pub projects: Vec<String>,

    /// Restrict the target matrix.
    pub filter: TargetFilter,

    /// Worker threads (CLI > config > rayon default).
    pub jobs: Option<usize>,
}

/// Declarations turned into resolver inputs.
#[derive(Debug)]
pub struct Loaded {
    pub registry: ProjectRegistry,
    pub matrix: TargetMatrix,
}

/// Build the registry and the (filtered) target matrix.
pub fn load_workspace(ws: &Workspace, filter: &TargetFilter) -> Result<Loaded> {
    let manifest = ws.manifest();
    let registry = manifest.registry()?;
    manifest.validate_solutions(&registry)?;

    let full = manifest.target_matrix()?;
    let matrix = full.restrict(filter);
    if matrix.is_empty() {
        tracing::warn!(
            "target filter excludes all {} target(s) of the matrix",
            full.len()
        );
    }

    Ok(Loaded { registry, matrix })
}

/// Resolve the selected projects of the workspace.
///
/// Nothing is returned unless every selected pair resolved.
pub fn resolve_workspace(ws: &Workspace, selection: &Selection) -> Result<ResolvedSet> {
    let loaded = load_workspace(ws, &selection.filter)?;
    let projects = selected_projects(ws, selection)?;

    let resolver = Resolver::new(&loaded.registry, &loaded.matrix)?;
    let options = ResolveOptions {
        projects,
        jobs: selection.jobs.or(ws.config().resolve.jobs),
    };

    let set = resolver
        .resolve_all(&options)
        .with_context(|| format!("failed to resolve {}", ws.manifest_path().display()))?;

    tracing::info!(
        "resolved {} configuration(s) for {} project(s)",
        set.len(),
        set.projects().len()
    );
    Ok(set)
}

fn selected_projects(ws: &Workspace, selection: &Selection) -> Result<Option<Vec<String>>> {
    let mut projects = Vec::new();

    if let Some(ref name) = selection.solution {
        let Some(solution) = ws.manifest().solution(name) else {
            let known: Vec<&str> = ws
                .manifest()
                .solutions()
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            bail!(
                "no solution named `{}` in {}\n\
                 help: declared solutions: {}",
                name,
                ws.manifest_path().display(),
                if known.is_empty() { "(none)".to_string() } else { known.join(", ") }
            );
        };
        projects.extend(solution.projects.iter().cloned());
    }

    for name in &selection.projects {
        if !projects.contains(name) {
            projects.push(name.clone());
        }
    }

    if projects.is_empty() && selection.solution.is_none() {
        Ok(None)
    } else {
        Ok(Some(projects))
    }
}
