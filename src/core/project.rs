//! Projects - named units with a rule chain and dependency declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::rule::Rule;
use crate::core::target::{Target, TargetFilter};

/// Visibility of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Propagates to every transitive dependent.
    #[default]
    Public,
    /// Folded into the immediate dependent only.
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// A declared dependency edge from the owning project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Name of the project depended upon.
    pub name: String,

    #[serde(default)]
    pub visibility: Visibility,

    /// Targets for which the edge exists.
    #[serde(default)]
    pub when: TargetFilter,
}

impl Dependency {
    pub fn public(name: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            visibility: Visibility::Public,
            when: TargetFilter::any(),
        }
    }

    pub fn private(name: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            visibility: Visibility::Private,
            when: TargetFilter::any(),
        }
    }

    pub fn when(mut self, filter: TargetFilter) -> Self {
        self.when = filter;
        self
    }

    pub fn applies_to(&self, target: &Target) -> bool {
        self.when.matches(target)
    }
}

/// A project declaration.
///
/// `rules` holds only the rules declared by this project; the inherited ones
/// are collected by walking `inherits`. Scalar attributes, supported targets
/// and dependencies are merged down from ancestors when the registry is
/// built.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    inherits: Option<String>,
    is_abstract: bool,
    source_root: Option<String>,
    root_path: String,
    supported: Option<TargetFilter>,
    rules: Vec<Rule>,
    dependencies: Vec<Dependency>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            inherits: None,
            is_abstract: false,
            source_root: None,
            root_path: String::new(),
            supported: None,
            rules: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    /// Abstract projects only feed their descendants.
    pub fn abstract_base(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    pub fn with_root_path(mut self, path: impl Into<String>) -> Self {
        self.root_path = path.into();
        self
    }

    pub fn with_targets(mut self, filter: TargetFilter) -> Self {
        self.supported = Some(filter);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_dependency(mut self, dep: Dependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.inherits.as_deref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Source root, relative to the declarations file. Empty if unset.
    pub fn source_root(&self) -> &str {
        self.source_root.as_deref().unwrap_or_default()
    }

    /// Directory holding the declarations file.
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Rules declared directly by this project.
    pub fn own_rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Effective dependency declarations, base project's first.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Supported-target predicate; everything when undeclared.
    pub fn supports(&self, target: &Target) -> bool {
        self.supported.as_ref().map_or(true, |f| f.matches(target))
    }

    /// Merge inheritable attributes from an already-merged parent.
    ///
    /// Unset scalars take the parent's value. Dependencies become the
    /// parent's list followed by this project's; redeclaring a name keeps the
    /// parent's position but takes this project's visibility and filter.
    pub(crate) fn inherit_from(&mut self, parent: &Project) {
        if self.source_root.is_none() {
            self.source_root = parent.source_root.clone();
        }
        if self.root_path.is_empty() {
            self.root_path = parent.root_path.clone();
        }
        if self.supported.is_none() {
            self.supported = parent.supported.clone();
        }

        let own = std::mem::take(&mut self.dependencies);
        let mut merged = parent.dependencies.clone();
        for dep in own {
            match merged.iter_mut().find(|d| d.name == dep.name) {
                Some(existing) => *existing = dep,
                None => merged.push(dep),
            }
        }
        self.dependencies = merged;
    }
}
