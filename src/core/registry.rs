//! Project registry - every declared project, by name.
//!
//! The registry is built once from the loaded declarations and read-only
//! afterwards. Building it validates the inheritance forest and merges
//! inherited attributes down into each project.

use std::collections::{BTreeMap, HashSet};

use crate::core::project::Project;
use crate::resolver::ResolveError;

#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: BTreeMap<String, Project>,
    /// Declaration order.
    order: Vec<String>,
}

impl ProjectRegistry {
    /// Build the registry.
    ///
    /// Fails on duplicate names, on an `inherits` naming an undeclared
    /// project, and on inheritance cycles.
    pub fn new(projects: Vec<Project>) -> Result<Self, ResolveError> {
        let mut declared = BTreeMap::new();
        let mut order = Vec::with_capacity(projects.len());
        for project in projects {
            let name = project.name().to_string();
            if declared.contains_key(&name) {
                return Err(ResolveError::DuplicateProject { project: name });
            }
            order.push(name.clone());
            declared.insert(name, project);
        }

        // Merge each project after its whole ancestry, base first.
        let mut merged: BTreeMap<String, Project> = BTreeMap::new();
        for name in &order {
            let ancestry = ancestry(&declared, name)?;
            for ancestor in ancestry.iter().rev() {
                if merged.contains_key(ancestor) {
                    continue;
                }
                let mut project = declared[ancestor].clone();
                if let Some(parent) = project.parent().map(str::to_string) {
                    let parent = merged[&parent].clone();
                    project.inherit_from(&parent);
                }
                merged.insert(ancestor.clone(), project);
            }
        }

        tracing::debug!("registered {} project(s)", order.len());
        Ok(ProjectRegistry {
            projects: merged,
            order,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// Look up a project referenced from somewhere else.
    pub fn require(
        &self,
        name: &str,
        referenced_by: &str,
        relation: &'static str,
    ) -> Result<&Project, ResolveError> {
        self.projects
            .get(name)
            .ok_or_else(|| ResolveError::MissingProject {
                project: name.to_string(),
                referenced_by: referenced_by.to_string(),
                relation,
            })
    }

    /// All projects in declaration order, abstract ones included.
    pub fn all(&self) -> impl Iterator<Item = &Project> {
        self.order.iter().filter_map(|n| self.projects.get(n))
    }

    /// Concrete (resolvable) projects in declaration order.
    pub fn concrete(&self) -> impl Iterator<Item = &Project> {
        self.all().filter(|p| !p.is_abstract())
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Names from `name` up to its root ancestor, most-derived first.
pub(crate) fn ancestry(
    declared: &BTreeMap<String, Project>,
    name: &str,
) -> Result<Vec<String>, ResolveError> {
    let mut chain = vec![name.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([name]);
    let mut current = declared
        .get(name)
        .ok_or_else(|| ResolveError::MissingProject {
            project: name.to_string(),
            referenced_by: name.to_string(),
            relation: "project",
        })?;

    while let Some(parent) = current.parent() {
        if !seen.insert(parent) {
            chain.push(parent.to_string());
            return Err(ResolveError::CyclicInheritance {
                project: name.to_string(),
                chain,
            });
        }
        let child = current.name();
        current = declared
            .get(parent)
            .ok_or_else(|| ResolveError::MissingProject {
                project: parent.to_string(),
                referenced_by: child.to_string(),
                relation: "parent",
            })?;
        chain.push(parent.to_string());
    }

    Ok(chain)
}
