//! Target matrix - the cartesian product of dimension domains.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Framework, Mode, Optimization, Platform, Target, TargetFilter};
use crate::core::project::Project;

/// Errors raised while building the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A dimension was declared with no values.
    #[error("dimension `{dimension}` has no declared values")]
    InvalidDimension { dimension: &'static str },
}

/// Declared values for each dimension.
///
/// A dimension omitted from the declarations takes its default domain; a
/// dimension declared as an empty list is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionDomains {
    #[serde(default = "default_platforms")]
    pub platform: Vec<Platform>,

    #[serde(default = "default_optimizations")]
    pub optimization: Vec<Optimization>,

    #[serde(default = "default_modes")]
    pub mode: Vec<Mode>,

    #[serde(default = "default_frameworks")]
    pub framework: Vec<Framework>,
}

fn default_platforms() -> Vec<Platform> {
    vec![Platform::Win64]
}

fn default_optimizations() -> Vec<Optimization> {
    vec![Optimization::Debug, Optimization::Release]
}

fn default_modes() -> Vec<Mode> {
    vec![Mode::Editor, Mode::Game]
}

fn default_frameworks() -> Vec<Framework> {
    vec![Framework::Vs2019]
}

impl Default for DimensionDomains {
    fn default() -> Self {
        DimensionDomains {
            platform: default_platforms(),
            optimization: default_optimizations(),
            mode: default_modes(),
            framework: default_frameworks(),
        }
    }
}

/// Keep the first occurrence of each value.
fn dedup_ordered<T: Copy + Ord>(values: &[T]) -> Vec<T> {
    let mut seen = BTreeSet::new();
    values.iter().copied().filter(|v| seen.insert(*v)).collect()
}

fn non_empty<T>(values: &[T], dimension: &'static str) -> Result<(), MatrixError> {
    if values.is_empty() {
        return Err(MatrixError::InvalidDimension { dimension });
    }
    Ok(())
}

/// The enumerated set of targets for one generation run.
///
/// Built once and passed explicitly into resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMatrix {
    targets: Vec<Target>,
}

impl TargetMatrix {
    /// Enumerate the full cartesian product of the domains.
    ///
    /// Order is platform-major, then optimization, mode and framework, each
    /// in declared order. Repeated values in a domain are ignored.
    pub fn enumerate(domains: &DimensionDomains) -> Result<Self, MatrixError> {
        non_empty(&domains.platform, Platform::LABEL)?;
        non_empty(&domains.optimization, Optimization::LABEL)?;
        non_empty(&domains.mode, Mode::LABEL)?;
        non_empty(&domains.framework, Framework::LABEL)?;

        let platforms = dedup_ordered(&domains.platform);
        let optimizations = dedup_ordered(&domains.optimization);
        let modes = dedup_ordered(&domains.mode);
        let frameworks = dedup_ordered(&domains.framework);

        let mut targets =
            Vec::with_capacity(platforms.len() * optimizations.len() * modes.len() * frameworks.len());
        for &platform in &platforms {
            for &optimization in &optimizations {
                for &mode in &modes {
                    for &framework in &frameworks {
                        targets.push(Target::new(platform, optimization, mode, framework));
                    }
                }
            }
        }

        tracing::debug!("enumerated {} target(s)", targets.len());
        Ok(TargetMatrix { targets })
    }

    /// Keep only the targets accepted by `filter`.
    pub fn restrict(&self, filter: &TargetFilter) -> Self {
        TargetMatrix {
            targets: self
                .targets
                .iter()
                .filter(|t| filter.matches(t))
                .copied()
                .collect(),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.targets.contains(target)
    }

    /// Whether `target` is part of this matrix and supported by `project`.
    pub fn is_applicable(&self, project: &Project, target: &Target) -> bool {
        self.contains(target) && project.supports(target)
    }

    /// Targets of this matrix supported by `project`, in matrix order.
    pub fn applicable<'a>(&'a self, project: &'a Project) -> impl Iterator<Item = &'a Target> + 'a {
        self.targets.iter().filter(move |t| project.supports(t))
    }
}
