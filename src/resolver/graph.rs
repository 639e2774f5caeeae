//! Dependency graph over projects.
//!
//! Edges carry a visibility and a target filter. The graph is validated
//! before any rule chain runs: every edge must name a declared, concrete
//! project and no target may see a cycle.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::project::{Project, Visibility};
use crate::core::registry::ProjectRegistry;
use crate::core::target::Target;
use crate::resolver::ResolveError;

/// One project whose exported configuration is folded into the dependent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldEntry {
    /// Project being folded.
    pub project: String,
    /// Visibility of the edge that reached it.
    pub visibility: Visibility,
    /// Project declaring that edge.
    pub via: String,
    /// 1 for direct dependencies.
    pub depth: usize,
}

/// State of one `resolve_dependencies` walk.
#[derive(Default)]
struct Walk<'a> {
    /// Projects already in `out`.
    folded: HashSet<&'a str>,
    /// Projects whose public dependencies have been walked.
    expanded: HashSet<&'a str>,
    /// Current chain of public edges from the root.
    path: Vec<&'a str>,
    out: Vec<FoldEntry>,
}

/// Validated dependency graph.
#[derive(Debug)]
pub struct DependencyGraph<'r> {
    registry: &'r ProjectRegistry,
    graph: DiGraph<String, Visibility>,
    nodes: HashMap<String, NodeIndex>,
}

impl<'r> DependencyGraph<'r> {
    /// Build the graph over every concrete project and check its edges.
    pub fn build(registry: &'r ProjectRegistry) -> Result<Self, ResolveError> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for project in registry.concrete() {
            let node = graph.add_node(project.name().to_string());
            nodes.insert(project.name().to_string(), node);
        }

        for project in registry.concrete() {
            for dep in project.dependencies() {
                let target = registry.require(&dep.name, project.name(), "dependency")?;
                if target.is_abstract() {
                    return Err(ResolveError::AbstractProject {
                        project: dep.name.clone(),
                        required_by: Some(project.name().to_string()),
                    });
                }
                graph.add_edge(nodes[project.name()], nodes[&dep.name], dep.visibility);
            }
        }

        tracing::debug!(
            "dependency graph: {} project(s), {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(DependencyGraph {
            registry,
            graph,
            nodes,
        })
    }

    pub fn registry(&self) -> &'r ProjectRegistry {
        self.registry
    }

    /// Reject any cycle reachable under one of `targets`.
    ///
    /// Edges are filtered per target, so two edges that never coexist for
    /// the same target do not form a cycle.
    pub fn validate(&self, targets: &[Target]) -> Result<(), ResolveError> {
        if toposort(&self.graph, None).is_ok() {
            return Ok(());
        }

        for target in targets {
            if let Some(cycle) = self.find_cycle(target) {
                return Err(ResolveError::CyclicDependency {
                    cycle,
                    target: Some(target.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Direct dependencies of `name` for `target`, in declaration order.
    pub fn direct(&self, name: &str, target: &Target) -> Vec<(&'r Project, Visibility)> {
        let Some(project) = self.registry.get(name) else {
            return Vec::new();
        };
        project
            .dependencies()
            .iter()
            .filter(|d| d.applies_to(target))
            .filter_map(|d| self.registry.get(&d.name).map(|p| (p, d.visibility)))
            .collect()
    }

    /// Projects whose configuration folds into `name` for `target`.
    ///
    /// Depth-first in declaration order. Direct dependencies are always
    /// included; below that only public edges are followed, so a private
    /// dependency contributes to its immediate dependent and nothing
    /// reachable through it does. Each project appears at most once, at
    /// the position it was first reached. A project first reached through
    /// a private edge still has its public subtree walked if a public path
    /// reaches it later.
    pub fn resolve_dependencies(
        &self,
        name: &str,
        target: &Target,
    ) -> Result<Vec<FoldEntry>, ResolveError> {
        let root = self.registry.require(name, name, "project")?;
        let mut walk = Walk::default();
        walk.path.push(root.name());
        self.visit(root, target, 1, &mut walk)?;
        Ok(walk.out)
    }

    fn visit<'a>(
        &'a self,
        project: &'a Project,
        target: &Target,
        depth: usize,
        walk: &mut Walk<'a>,
    ) -> Result<(), ResolveError> {
        for dep in project.dependencies() {
            if !dep.applies_to(target) {
                continue;
            }
            if depth > 1 && dep.visibility == Visibility::Private {
                continue;
            }
            if walk.path.contains(&dep.name.as_str()) {
                let mut cycle: Vec<String> = walk.path.iter().map(|s| s.to_string()).collect();
                cycle.push(dep.name.clone());
                return Err(ResolveError::CyclicDependency {
                    cycle,
                    target: Some(target.to_string()),
                });
            }

            let dep_project = self
                .registry
                .require(&dep.name, project.name(), "dependency")?;
            if !dep_project.supports(target) {
                return Err(ResolveError::UnsupportedTarget {
                    project: dep.name.clone(),
                    target: target.to_string(),
                    required_by: Some(project.name().to_string()),
                });
            }
            if walk.folded.insert(dep_project.name()) {
                walk.out.push(FoldEntry {
                    project: dep.name.clone(),
                    visibility: dep.visibility,
                    via: project.name().to_string(),
                    depth,
                });
            }

            if dep.visibility == Visibility::Public && walk.expanded.insert(dep_project.name()) {
                walk.path.push(dep_project.name());
                self.visit(dep_project, target, depth + 1, walk)?;
                walk.path.pop();
            }
        }
        Ok(())
    }

    /// First cycle under `target` found walking projects in declaration
    /// order, as a closed path (`A -> B -> A`).
    fn find_cycle(&self, target: &Target) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }

        fn dfs<'a>(
            registry: &'a ProjectRegistry,
            project: &'a Project,
            target: &Target,
            marks: &mut HashMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            marks.insert(project.name(), Mark::Open);
            stack.push(project.name());

            for dep in project.dependencies() {
                if !dep.applies_to(target) {
                    continue;
                }
                let Some(next) = registry.get(&dep.name) else {
                    continue;
                };
                match marks.get(next.name()) {
                    Some(Mark::Open) => {
                        let start = stack.iter().position(|n| *n == next.name()).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(next.name().to_string());
                        return Some(cycle);
                    }
                    Some(Mark::Done) => continue,
                    None => {
                        if let Some(cycle) = dfs(registry, next, target, marks, stack) {
                            return Some(cycle);
                        }
                    }
                }
            }

            stack.pop();
            marks.insert(project.name(), Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        for project in self.registry.concrete() {
            if marks.contains_key(project.name()) {
                continue;
            }
            let mut stack = Vec::new();
            if let Some(cycle) = dfs(self.registry, project, target, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }
}
