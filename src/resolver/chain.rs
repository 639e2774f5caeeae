//! Rule chain composition.
//!
//! A project's chain is the rules of its most-base ancestor, then each
//! descendant's in turn, ending with the project's own. The chain is built
//! once per project and run once per target against a fresh
//! [`Configuration`].

use std::collections::HashSet;

use crate::core::configuration::Configuration;
use crate::core::project::Project;
use crate::core::registry::ProjectRegistry;
use crate::core::rule::{Rule, RuleContext};
use crate::core::target::Target;
use crate::core::template::Substitutions;
use crate::resolver::ResolveError;

/// A rule together with the precedence it runs at.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub rule: Rule,
    pub precedence: i32,
}

/// The ordered rules for one project, base to derived.
#[derive(Debug, Clone)]
pub struct RuleChain {
    project: String,
    links: Vec<ChainLink>,
}

impl RuleChain {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Run every rule against a fresh configuration for `target`.
    pub fn run(&self, project: &Project, target: &Target) -> Result<Configuration, ResolveError> {
        let vars = Substitutions::new(
            project.name(),
            project.source_root(),
            project.root_path(),
            target,
        );

        let mut conf = Configuration::new();
        for link in &self.links {
            let ctx = RuleContext {
                target,
                vars: &vars,
                rule: link.rule.id(),
                precedence: link.precedence,
            };
            tracing::trace!("{} [{}]: applying {}", project.name(), target, link.rule.id());
            link.rule
                .apply(&mut conf, &ctx)
                .map_err(|c| ResolveError::conflicting_override(project.name(), target, c))?;
        }

        Ok(conf)
    }
}

/// Collect the rule chain for `name`.
///
/// Rules without a declared precedence run at the inheritance depth of the
/// project that declares them (0 for the root ancestor).
pub fn resolve_chain(registry: &ProjectRegistry, name: &str) -> Result<RuleChain, ResolveError> {
    let mut lineage: Vec<&Project> = Vec::new();
    let mut seen = HashSet::new();
    let mut current = registry.require(name, name, "project")?;

    loop {
        if !seen.insert(current.name()) {
            let mut chain: Vec<String> = lineage.iter().map(|p| p.name().to_string()).collect();
            chain.push(current.name().to_string());
            return Err(ResolveError::CyclicInheritance {
                project: name.to_string(),
                chain,
            });
        }
        lineage.push(current);
        match current.parent() {
            Some(parent) => current = registry.require(parent, current.name(), "parent")?,
            None => break,
        }
    }

    let links: Vec<ChainLink> = lineage
        .iter()
        .rev()
        .enumerate()
        .flat_map(|(depth, project)| {
            project.own_rules().iter().map(move |rule| ChainLink {
                rule: rule.clone(),
                precedence: rule.precedence().unwrap_or(depth as i32),
            })
        })
        .collect();

    tracing::debug!(
        "chain for `{}`: {} rule(s) over {} level(s)",
        name,
        links.len(),
        lineage.len()
    );

    Ok(RuleChain {
        project: name.to_string(),
        links,
    })
}
