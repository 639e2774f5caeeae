//! Core data structures for Rigging.
//!
//! This module contains the foundational types used throughout Rigging:
//! - Targets, the target matrix and target filters
//! - Configurations, rules and path templates
//! - Projects and the project registry
//! - Declarations and workspace management

pub mod configuration;
pub mod manifest;
pub mod project;
pub mod registry;
pub mod rule;
pub mod target;
pub mod template;
pub mod workspace;

pub use configuration::{Configuration, Field, OptionValue, OutputType};
pub use manifest::{Manifest, Solution};
pub use project::{Dependency, Project, Visibility};
pub use registry::ProjectRegistry;
pub use rule::{Rule, RuleBuilder, RuleContext, RuleId, RuleSpec};
pub use target::{Target, TargetFilter, TargetMatrix};
pub use template::{Placeholder, Substitutions, Template, TemplateError};
pub use workspace::{find_manifest, ManifestError, Workspace, MANIFEST_ALIAS, MANIFEST_NAME};
