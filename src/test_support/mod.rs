//! Test utilities for Rigging unit tests.
//!
//! Builders for small registries, rules and matrices, plus declaration
//! fixtures shaped like a real engine workspace.
//!
//! # Example
//!
//! ```rust,ignore
//! use rigging::test_support::{debug_release_matrix, lib_rule};
//!
//! let registry = ProjectRegistry::new(vec![
//!     Project::new("Dementia").with_rule(lib_rule("Dementia", "Dementia.lib")),
//! ])?;
//! let set = resolve_all(&registry, &debug_release_matrix(), &Default::default())?;
//! ```

pub mod fixtures;

use crate::core::project::{Dependency, Project};
use crate::core::registry::ProjectRegistry;
use crate::core::rule::Rule;
use crate::core::target::{
    DimensionDomains, Framework, Mode, Optimization, Platform, Target, TargetMatrix,
};

// Re-export fixtures for convenience
pub use fixtures::*;

/// `win64` x `debug, release` x `game` x `vs2019`.
pub fn debug_release_matrix() -> TargetMatrix {
    let domains = DimensionDomains {
        platform: vec![Platform::Win64],
        optimization: vec![Optimization::Debug, Optimization::Release],
        mode: vec![Mode::Game],
        framework: vec![Framework::Vs2019],
    };
    match TargetMatrix::enumerate(&domains) {
        Ok(matrix) => matrix,
        Err(e) => panic!("fixture matrix is invalid: {e}"),
    }
}

/// A `win64|<opt>|<mode>|vs2019` target.
pub fn win64(optimization: Optimization, mode: Mode) -> Target {
    Target::new(Platform::Win64, optimization, mode, Framework::Vs2019)
}

/// A rule appending one library file.
pub fn lib_rule(project: &str, file: impl Into<String>) -> Rule {
    let file = file.into();
    Rule::builder(project, "lib").apply(move |conf, _| conf.add_library_file(file.clone()))
}

/// A linear chain `names[0] -> names[1] -> ...` of public dependencies,
/// each project contributing `<name>.lib`.
pub fn public_chain(names: &[&'static str]) -> ProjectRegistry {
    let mut projects = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let mut project = Project::new(*name).with_rule(lib_rule(name, format!("{}.lib", name)));
        if let Some(next) = names.get(i + 1) {
            project = project.with_dependency(Dependency::public(*next));
        }
        projects.push(project);
    }
    match ProjectRegistry::new(projects) {
        Ok(registry) => registry,
        Err(e) => panic!("fixture registry is invalid: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{resolve_all, ResolveOptions};

    #[test]
    fn test_public_chain_folds_every_level() {
        let registry = public_chain(&["Game", "Engine", "Dementia"]);
        let set = resolve_all(&registry, &debug_release_matrix(), &ResolveOptions::default())
            .unwrap();
        let game = set.get("Game", &win64(Optimization::Debug, Mode::Game)).unwrap();
        assert_eq!(
            game.config().library_files(),
            ["Game.lib", "Engine.lib", "Dementia.lib"]
        );
    }
}
