//! Implementation of `rigging check`.
//!
//! Runs every validation a generate run would, including executing the rule
//! chains, without emitting anything.

use anyhow::Result;

use crate::core::Workspace;
use crate::core::target::TargetFilter;
use crate::ops::resolve::load_workspace;
use crate::resolver::{ResolveOptions, Resolver};

/// Summary of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub projects: usize,
    pub abstract_projects: usize,
    pub solutions: usize,
    pub targets: usize,
    pub configurations: usize,
}

pub fn check(ws: &Workspace, jobs: Option<usize>) -> Result<CheckReport> {
    let loaded = load_workspace(ws, &TargetFilter::any())?;
    let resolver = Resolver::new(&loaded.registry, &loaded.matrix)?;
    let set = resolver.resolve_all(&ResolveOptions {
        projects: None,
        jobs: jobs.or(ws.config().resolve.jobs),
    })?;

    let total = loaded.registry.len();
    let concrete = loaded.registry.concrete().count();
    Ok(CheckReport {
        projects: concrete,
        abstract_projects: total - concrete,
        solutions: ws.manifest().solutions().len(),
        targets: loaded.matrix.len(),
        configurations: set.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolveError;
    use crate::test_support::{write_manifest, ENGINE_WORKSPACE};
    use crate::util::GlobalContext;
    use tempfile::TempDir;

    fn load(content: &str) -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(tmp.path(), content);
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        let ws = Workspace::new(&path, &ctx).unwrap();
        (tmp, ws)
    }

    #[test]
    fn test_check_engine_workspace() {
        let (_tmp, ws) = load(ENGINE_WORKSPACE);
        let report = check(&ws, None).unwrap();
        assert_eq!(
            report,
            CheckReport {
                projects: 5,
                abstract_projects: 2,
                solutions: 1,
                targets: 4,
                configurations: 20,
            }
        );
    }

    #[test]
    fn test_check_reports_conflicting_replace() {
        let (_tmp, ws) = load(
            r#"
[[project]]
name = "Game"

[[project.rule]]
replace = ["library-files"]
library-files = ["a.lib"]

[[project.rule]]
replace = ["library-files"]
library-files = ["b.lib"]
"#,
        );
        let err = check(&ws, Some(1)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::ConflictingOverride { .. })
        ));
    }
}
