//! Configuration resolution.
//!
//! Resolution is pure and deterministic: all declarations are loaded before
//! it starts, and nothing is written until the whole run has succeeded.
//!
//! - [`chain`] collects a project's rules from its inheritance ancestry.
//! - [`graph`] validates dependency edges and orders the fold.
//! - [`resolve`] memoizes (project, target) pairs and drives the workers.

pub mod chain;
pub mod errors;
pub mod graph;
pub mod resolve;

pub use chain::{resolve_chain, ChainLink, RuleChain};
pub use errors::ResolveError;
pub use graph::{DependencyGraph, FoldEntry};
pub use resolve::{resolve_all, Resolution, ResolveOptions, ResolvedSet, Resolver};
