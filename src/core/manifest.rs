//! Rigging.toml declarations.
//!
//! The declarations file lists the dimension domains of the target matrix,
//! every project with its rules and dependencies, and the solutions that
//! group projects. Supports both `Rigging.toml` (canonical) and
//! `rigging.toml` (alias).
//!
//! ```toml
//! [matrix]
//! optimization = ["debug", "release"]
//!
//! [[project]]
//! name = "Base"
//! abstract = true
//!
//! [[project.rule]]
//! defines = ["NOMINMAX"]
//!
//! [[project]]
//! name = "Engine"
//! inherits = "Base"
//! source-root = "Engine/Source"
//!
//! [[project.dependency]]
//! name = "Dementia"
//! visibility = "public"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::project::{Dependency, Project};
use crate::core::registry::ProjectRegistry;
use crate::core::rule::RuleSpec;
use crate::core::target::{DimensionDomains, TargetFilter, TargetMatrix};
use crate::resolver::ResolveError;

/// One `[[project]]` entry as written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectDecl {
    pub name: String,

    #[serde(default)]
    pub inherits: Option<String>,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default)]
    pub source_root: Option<String>,

    /// Supported targets. Inherited when absent.
    #[serde(default)]
    pub targets: Option<TargetFilter>,

    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,

    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<Dependency>,
}

impl ProjectDecl {
    fn into_project(self, root_path: &str) -> Project {
        let name = self.name;
        let mut project = Project::new(name.clone()).with_root_path(root_path);
        if let Some(parent) = self.inherits {
            project = project.inherits(parent);
        }
        if self.is_abstract {
            project = project.abstract_base();
        }
        if let Some(root) = self.source_root {
            project = project.with_source_root(root);
        }
        if let Some(filter) = self.targets {
            project = project.with_targets(filter);
        }
        for (index, spec) in self.rules.into_iter().enumerate() {
            project = project.with_rule(spec.into_rule(&name, index));
        }
        for dep in self.dependencies {
            project = project.with_dependency(dep);
        }
        project
    }
}

/// A named group of projects generated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Solution {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    matrix: DimensionDomains,

    #[serde(default, rename = "project")]
    projects: Vec<ProjectDecl>,

    #[serde(default, rename = "solution")]
    solutions: Vec<Solution>,
}

/// Parsed declarations file.
#[derive(Debug, Clone)]
pub struct Manifest {
    matrix: DimensionDomains,
    projects: Vec<ProjectDecl>,
    solutions: Vec<Solution>,
    manifest_dir: PathBuf,
}

impl Manifest {
    /// Load declarations from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse declarations content. `path` locates the project root.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        if raw.projects.is_empty() {
            tracing::warn!("{} declares no projects", path.display());
        }

        Ok(Manifest {
            matrix: raw.matrix,
            projects: raw.projects,
            solutions: raw.solutions,
            manifest_dir,
        })
    }

    pub fn domains(&self) -> &DimensionDomains {
        &self.matrix
    }

    pub fn projects(&self) -> &[ProjectDecl] {
        &self.projects
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn solution(&self, name: &str) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.name == name)
    }

    /// Directory containing the declarations file.
    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }

    /// Enumerate the full target matrix.
    pub fn target_matrix(&self) -> Result<TargetMatrix, ResolveError> {
        Ok(TargetMatrix::enumerate(&self.matrix)?)
    }

    /// Build the project registry. `[project.RootPath]` renders as the
    /// directory holding the declarations.
    pub fn registry(&self) -> Result<ProjectRegistry, ResolveError> {
        let root_path = self.manifest_dir.display().to_string();
        let projects = self
            .projects
            .iter()
            .cloned()
            .map(|decl| decl.into_project(&root_path))
            .collect();
        ProjectRegistry::new(projects)
    }

    /// Check that every solution names declared, concrete projects.
    pub fn validate_solutions(&self, registry: &ProjectRegistry) -> Result<(), ResolveError> {
        for solution in &self.solutions {
            for member in &solution.projects {
                let project = registry.require(member, &solution.name, "solution member")?;
                if project.is_abstract() {
                    return Err(ResolveError::AbstractProject {
                        project: member.clone(),
                        required_by: Some(solution.name.clone()),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Starter declarations written by `rigging init`.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[matrix]
platform = ["win64"]
optimization = ["debug", "release"]
mode = ["editor", "game"]
framework = ["vs2019"]

[[project]]
name = "{name}"
source-root = "{name}/Source"

[[project.rule]]
label = "common"
include-paths = ["[project.SourceRootPath]"]
target-path = "[project.RootPath]/Build/[target.Name]"

[[solution]]
name = "{name}"
projects = ["{name}"]
"#
    )
}
