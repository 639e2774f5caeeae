//! Rigging - a build-configuration resolution engine for multi-target C/C++
//! project generation.
//!
//! This crate provides the core library functionality for Rigging: the
//! target matrix, rule-chain inheritance, dependency folding, and the
//! parallel resolver that produces one configuration per (project, target).

pub mod core;
pub mod emit;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and fixtures for Rigging unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    configuration::Configuration, manifest::Manifest, project::Project, target::Target,
    target::TargetMatrix, workspace::Workspace,
};

pub use resolver::{ResolveError, ResolvedSet, Resolver};
pub use util::context::GlobalContext;
