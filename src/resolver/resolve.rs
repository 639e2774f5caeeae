//! Resolver - per-(project, target) orchestration.
//!
//! For each pair the resolver runs the project's rule chain against a fresh
//! configuration, then folds in the exported configuration of every project
//! returned by [`DependencyGraph::resolve_dependencies`]. Pairs are memoized
//! so a shared dependency is resolved once per target, and independent
//! pairs run in parallel on a rayon pool.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use rayon::prelude::*;

use crate::core::configuration::Configuration;
use crate::core::project::Project;
use crate::core::registry::ProjectRegistry;
use crate::core::target::{Target, TargetMatrix};
use crate::resolver::chain::{resolve_chain, RuleChain};
use crate::resolver::graph::{DependencyGraph, FoldEntry};
use crate::resolver::ResolveError;

/// The outcome of resolving one (project, target) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    project: String,
    target: Target,
    config: Configuration,
    exported: Configuration,
    folded: Vec<FoldEntry>,
}

impl Resolution {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Final configuration: own chain output plus every folded dependency.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// What this project contributes to its dependents: its own chain
    /// output, without anything folded in.
    pub fn exported(&self) -> &Configuration {
        &self.exported
    }

    /// Dependencies folded into `config`, in fold order.
    pub fn folded(&self) -> &[FoldEntry] {
        &self.folded
    }
}

/// Every resolved pair of a run, ordered by project name then target.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    entries: BTreeMap<(String, Target), Arc<Resolution>>,
}

impl ResolvedSet {
    pub fn get(&self, project: &str, target: &Target) -> Option<&Resolution> {
        self.entries
            .get(&(project.to_string(), *target))
            .map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resolution> {
        self.entries.values().map(|r| r.as_ref())
    }

    /// Resolutions of one project, in target order.
    pub fn for_project<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a Resolution> + 'a {
        self.iter().filter(move |r| r.project() == project)
    }

    /// Distinct project names, sorted.
    pub fn projects(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|(p, _)| p.as_str()).collect();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options for [`Resolver::resolve_all`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Resolve only these projects; their dependencies are still resolved
    /// for folding. `None` means every concrete project.
    pub projects: Option<Vec<String>>,
    /// Worker threads. `None` uses rayon's global pool.
    pub jobs: Option<usize>,
}

type PairKey = (String, Target);

/// Lifecycle of one pair. Absent from the memo means unvisited.
#[derive(Debug, Clone)]
enum PairState {
    /// Being resolved by the worker with this id.
    Resolving { owner: u64 },
    Resolved(Arc<Resolution>),
    Failed(ResolveError),
}

/// Shared memo table. A pair marked `Resolving` by another worker is
/// waited on; one marked by the current worker closes a cycle.
#[derive(Debug, Default)]
struct Memo {
    states: Mutex<HashMap<PairKey, PairState>>,
    settled: Condvar,
}

impl Memo {
    fn lock(&self) -> MutexGuard<'_, HashMap<PairKey, PairState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Claim {
    Owned,
    Done(Result<Arc<Resolution>, ResolveError>),
}

/// Resolves (project, target) pairs against one registry and matrix.
///
/// Construction validates the dependency graph for every target of the
/// matrix and builds each concrete project's rule chain, so every
/// structural defect is reported before any rule runs.
pub struct Resolver<'r> {
    registry: &'r ProjectRegistry,
    matrix: &'r TargetMatrix,
    graph: DependencyGraph<'r>,
    chains: HashMap<String, RuleChain>,
    memo: Memo,
    next_owner: AtomicU64,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r ProjectRegistry, matrix: &'r TargetMatrix) -> Result<Self, ResolveError> {
        let graph = DependencyGraph::build(registry)?;
        graph.validate(matrix.targets())?;

        let mut chains = HashMap::new();
        for project in registry.concrete() {
            chains.insert(project.name().to_string(), resolve_chain(registry, project.name())?);
        }

        Ok(Resolver {
            registry,
            matrix,
            graph,
            chains,
            memo: Memo::default(),
            next_owner: AtomicU64::new(1),
        })
    }

    pub fn graph(&self) -> &DependencyGraph<'r> {
        &self.graph
    }

    pub fn matrix(&self) -> &TargetMatrix {
        self.matrix
    }

    /// Resolve a single pair. `target` must be applicable to the project.
    pub fn resolve(&self, name: &str, target: &Target) -> Result<Arc<Resolution>, ResolveError> {
        let project = self.top_level(name)?;
        if !self.matrix.is_applicable(project, target) {
            return Err(ResolveError::UnsupportedTarget {
                project: name.to_string(),
                target: target.to_string(),
                required_by: None,
            });
        }
        let owner = self.next_owner.fetch_add(1, Ordering::Relaxed);
        self.resolve_pair(project, target, owner, &mut Vec::new())
    }

    /// Resolve every selected project for every applicable target.
    ///
    /// The first error aborts the run and no partial set is returned.
    pub fn resolve_all(&self, options: &ResolveOptions) -> Result<ResolvedSet, ResolveError> {
        let projects: Vec<&Project> = match &options.projects {
            Some(names) => names
                .iter()
                .map(|n| self.top_level(n))
                .collect::<Result<_, _>>()?,
            None => self.registry.concrete().collect(),
        };

        let pairs: Vec<(&Project, Target)> = projects
            .iter()
            .flat_map(|p| self.matrix.applicable(p).map(move |t| (*p, *t)))
            .collect();

        tracing::info!(
            "resolving {} project(s) over {} target(s): {} pair(s)",
            projects.len(),
            self.matrix.len(),
            pairs.len()
        );

        let run = || {
            pairs
                .par_iter()
                .map(|&(project, target)| {
                    let owner = self.next_owner.fetch_add(1, Ordering::Relaxed);
                    self.resolve_pair(project, &target, owner, &mut Vec::new())
                })
                .collect::<Result<Vec<_>, ResolveError>>()
        };

        let resolved = match options.jobs {
            Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    tracing::warn!("could not start {} worker(s): {}; using the global pool", jobs, e);
                    run()
                }
            },
            None => run(),
        }?;

        let entries = resolved
            .into_iter()
            .map(|r| ((r.project.clone(), r.target), r))
            .collect();
        Ok(ResolvedSet { entries })
    }

    fn top_level(&self, name: &str) -> Result<&'r Project, ResolveError> {
        let project = self.registry.require(name, name, "project")?;
        if project.is_abstract() {
            return Err(ResolveError::AbstractProject {
                project: name.to_string(),
                required_by: None,
            });
        }
        Ok(project)
    }

    fn resolve_pair(
        &self,
        project: &'r Project,
        target: &Target,
        owner: u64,
        stack: &mut Vec<&'r str>,
    ) -> Result<Arc<Resolution>, ResolveError> {
        let key = (project.name().to_string(), *target);

        match self.claim(&key, owner, stack)? {
            Claim::Done(result) => return result,
            Claim::Owned => {}
        }

        stack.push(project.name());
        let result = self.compute(project, target, owner, stack).map(Arc::new);
        stack.pop();

        let mut states = self.memo.lock();
        let state = match &result {
            Ok(resolution) => PairState::Resolved(Arc::clone(resolution)),
            Err(e) => PairState::Failed(e.clone()),
        };
        states.insert(key, state);
        self.memo.settled.notify_all();
        result
    }

    /// Mark `key` as resolving for `owner`, or return its settled outcome.
    fn claim(&self, key: &PairKey, owner: u64, stack: &[&str]) -> Result<Claim, ResolveError> {
        let mut states = self.memo.lock();
        loop {
            match states.get(key) {
                None => {
                    states.insert(key.clone(), PairState::Resolving { owner });
                    return Ok(Claim::Owned);
                }
                Some(PairState::Resolved(resolution)) => {
                    return Ok(Claim::Done(Ok(Arc::clone(resolution))));
                }
                Some(PairState::Failed(e)) => return Ok(Claim::Done(Err(e.clone()))),
                Some(PairState::Resolving { owner: current }) if *current == owner => {
                    let start = stack.iter().position(|n| *n == key.0).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(key.0.clone());
                    return Err(ResolveError::CyclicDependency {
                        cycle,
                        target: Some(key.1.to_string()),
                    });
                }
                Some(PairState::Resolving { .. }) => {
                    states = self
                        .memo
                        .settled
                        .wait(states)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    fn compute(
        &self,
        project: &'r Project,
        target: &Target,
        owner: u64,
        stack: &mut Vec<&'r str>,
    ) -> Result<Resolution, ResolveError> {
        let chain = match self.chains.get(project.name()) {
            Some(chain) => chain,
            None => {
                return Err(ResolveError::AbstractProject {
                    project: project.name().to_string(),
                    required_by: stack.last().map(|s| s.to_string()),
                })
            }
        };

        let exported = chain.run(project, target)?;
        let folded = self.graph.resolve_dependencies(project.name(), target)?;

        let mut config = exported.clone();
        for entry in &folded {
            let dependency = self
                .registry
                .require(&entry.project, &entry.via, "dependency")?;
            let resolved = self.resolve_pair(dependency, target, owner, stack)?;
            tracing::trace!(
                "{} [{}]: folding {} ({}, via {})",
                project.name(),
                target,
                entry.project,
                entry.visibility,
                entry.via
            );
            config.fold(resolved.exported());
        }

        tracing::debug!(
            "resolved {} [{}]: {} rule(s), {} dependency fold(s)",
            project.name(),
            target,
            chain.len(),
            folded.len()
        );

        Ok(Resolution {
            project: project.name().to_string(),
            target: *target,
            config,
            exported,
            folded,
        })
    }
}

/// Build a resolver and resolve the whole selection in one call.
pub fn resolve_all(
    registry: &ProjectRegistry,
    matrix: &TargetMatrix,
    options: &ResolveOptions,
) -> Result<ResolvedSet, ResolveError> {
    Resolver::new(registry, matrix)?.resolve_all(options)
}
