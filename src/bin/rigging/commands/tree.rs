//! `rigging tree` command

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::cli::TreeArgs;
use crate::commands::open_workspace;
use rigging::core::project::Visibility;
use rigging::resolver::DependencyGraph;
use rigging::util::diagnostic::suggestions;
use rigging::{GlobalContext, Target};

pub fn execute(args: TreeArgs, ctx: &GlobalContext, manifest_path: Option<PathBuf>) -> Result<()> {
    let ws = open_workspace(ctx, manifest_path)?;
    let registry = ws.manifest().registry()?;
    let matrix = ws.manifest().target_matrix()?;
    let graph = DependencyGraph::build(&registry)?;

    let project = registry.get(&args.project).ok_or_else(|| {
        anyhow!(
            "no project named `{}` in {}\n{}",
            args.project,
            ws.manifest_path().display(),
            suggestions::PROJECT_NOT_FOUND
        )
    })?;

    let target = match args.target {
        Some(t) => t,
        None => matrix.applicable(project).next().copied().ok_or_else(|| {
            anyhow!("`{}` supports none of the targets in the matrix", args.project)
        })?,
    };
    graph.validate(&[target])?;

    println!("{} [{}]", project.name(), target);

    if args.fold {
        for entry in graph.resolve_dependencies(project.name(), &target)? {
            println!(
                "  {} ({}, via {}, depth {})",
                entry.project, entry.visibility, entry.via, entry.depth
            );
        }
        return Ok(());
    }

    let mut seen = HashSet::new();
    seen.insert(project.name().to_string());
    for (dep, visibility) in graph.direct(project.name(), &target) {
        print_tree(
            &graph,
            dep.name(),
            visibility,
            &target,
            1,
            args.depth.unwrap_or(usize::MAX),
            &mut seen,
        );
    }

    Ok(())
}

fn print_tree(
    graph: &DependencyGraph<'_>,
    name: &str,
    visibility: Visibility,
    target: &Target,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<String>,
) {
    if depth > max_depth {
        return;
    }

    let is_duplicate = !seen.insert(name.to_string());

    let prefix = format!("{}├── ", "│   ".repeat(depth - 1));
    let vis_marker = match visibility {
        Visibility::Public => "",
        Visibility::Private => " (private)",
    };
    let dup_marker = if is_duplicate { " (*)" } else { "" };

    println!("{}{}{}{}", prefix, name, vis_marker, dup_marker);

    // Don't recurse into duplicates
    if is_duplicate {
        return;
    }

    for (dep, vis) in graph.direct(name, target) {
        print_tree(graph, dep.name(), vis, target, depth + 1, max_depth, seen);
    }
}
