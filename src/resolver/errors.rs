//! Resolution error types and diagnostics.
//!
//! Every error here is a static configuration defect and aborts the whole
//! run. Nothing is retried.

use thiserror::Error;

use crate::core::configuration::OverrideConflict;
use crate::core::target::{MatrixError, Target};
use crate::util::diagnostic::Diagnostic;

/// Error during configuration resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("dimension `{dimension}` has no declared values")]
    InvalidDimension { dimension: &'static str },

    #[error("cyclic inheritance for `{project}`: {}", chain.join(" -> "))]
    CyclicInheritance { project: String, chain: Vec<String> },

    #[error("dependency cycle detected: {}", cycle.join(" -> "))]
    CyclicDependency {
        cycle: Vec<String>,
        target: Option<String>,
    },

    #[error("{relation} `{project}` referenced by `{referenced_by}` is not declared")]
    MissingProject {
        project: String,
        referenced_by: String,
        relation: &'static str,
    },

    #[error("conflicting replace of `{field}` in `{project}` for target `{target}`")]
    ConflictingOverride {
        project: String,
        target: String,
        field: String,
        existing: String,
        incoming: String,
        precedence: i32,
    },

    #[error("project `{project}` does not support target `{target}`")]
    UnsupportedTarget {
        project: String,
        target: String,
        required_by: Option<String>,
    },

    #[error("project `{project}` is abstract and cannot be resolved")]
    AbstractProject {
        project: String,
        required_by: Option<String>,
    },

    #[error("project `{project}` is declared more than once")]
    DuplicateProject { project: String },
}

impl From<MatrixError> for ResolveError {
    fn from(e: MatrixError) -> Self {
        match e {
            MatrixError::InvalidDimension { dimension } => {
                ResolveError::InvalidDimension { dimension }
            }
        }
    }
}

impl ResolveError {
    /// Attach project and target to a rule conflict.
    pub fn conflicting_override(project: &str, target: &Target, conflict: OverrideConflict) -> Self {
        ResolveError::ConflictingOverride {
            project: project.to_string(),
            target: target.to_string(),
            field: conflict.field.to_string(),
            existing: conflict.existing.to_string(),
            incoming: conflict.incoming.to_string(),
            precedence: conflict.precedence,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::InvalidDimension { dimension } => {
                Diagnostic::error(format!("dimension `{}` has no values", dimension))
                    .with_suggestion(format!(
                        "Declare at least one value for `{}` under [matrix], or remove the key to use the default",
                        dimension
                    ))
            }

            ResolveError::CyclicInheritance { project, chain } => {
                Diagnostic::error(format!("`{}` inherits from itself", project))
                    .with_context(format!("inheritance: {}", chain.join(" -> ")))
                    .with_suggestion("Remove one `inherits` link in the chain")
            }

            ResolveError::CyclicDependency { cycle, target } => {
                let mut diag = Diagnostic::error("cycle detected in dependency graph")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")));
                if let Some(target) = target {
                    diag = diag.with_context(format!("while resolving target {}", target));
                }
                diag.with_suggestion(
                    "Break the cycle by removing or restricting one of the dependencies",
                )
            }

            ResolveError::MissingProject {
                project,
                referenced_by,
                relation,
            } => Diagnostic::error(format!("could not find project `{}`", project))
                .with_context(format!("{} of `{}`", relation, referenced_by))
                .with_suggestion("Check that the project name is spelled correctly")
                .with_suggestion(format!("Declare `{}` with a [[project]] entry", project)),

            ResolveError::ConflictingOverride {
                project,
                target,
                field,
                existing,
                incoming,
                precedence,
            } => Diagnostic::error(format!(
                "conflicting replace of `{}` in `{}`",
                field, project
            ))
            .with_context(format!("target: {}", target))
            .with_context(format!(
                "`{}` and `{}` both replace it at precedence {}",
                existing, incoming, precedence
            ))
            .with_suggestion("Give one of the rules a higher `precedence`")
            .with_suggestion("Or merge the two replacements into a single rule"),

            ResolveError::UnsupportedTarget {
                project,
                target,
                required_by,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "`{}` is not available for target {}",
                    project, target
                ));
                if let Some(dependent) = required_by {
                    diag = diag
                        .with_context(format!("required by `{}`", dependent))
                        .with_suggestion("Restrict the dependency with a `when` filter");
                }
                diag.with_suggestion(format!("Widen the `targets` filter of `{}`", project))
            }

            ResolveError::AbstractProject {
                project,
                required_by,
            } => {
                let mut diag =
                    Diagnostic::error(format!("`{}` is abstract and cannot be resolved", project));
                if let Some(dependent) = required_by {
                    diag = diag.with_context(format!("required by `{}`", dependent));
                }
                diag.with_suggestion(format!(
                    "Inherit from `{}` instead, or use a concrete project",
                    project
                ))
            }

            ResolveError::DuplicateProject { project } => {
                Diagnostic::error(format!("project `{}` is declared twice", project))
                    .with_suggestion("Rename or remove one of the declarations")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::Field;
    use crate::core::rule::RuleId;
    use crate::core::target::{Framework, Mode, Optimization, Platform};

    #[test]
    fn test_cycle_diagnostic() {
        let err = ResolveError::CyclicDependency {
            cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()],
            target: None,
        };
        assert_eq!(err.to_string(), "dependency cycle detected: A -> B -> C -> A");

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("cycle: A -> B -> C -> A"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_conflicting_override_context() {
        let target = Target::new(
            Platform::Win64,
            Optimization::Debug,
            Mode::Game,
            Framework::Vs2019,
        );
        let err = ResolveError::conflicting_override(
            "Game",
            &target,
            OverrideConflict {
                field: Field::LibraryFiles,
                existing: RuleId::new("Game", "0"),
                incoming: RuleId::new("Game", "1"),
                precedence: 2,
            },
        );

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("library-files"));
        assert!(output.contains("win64|debug|game|vs2019"));
        assert!(output.contains("`Game#0` and `Game#1`"));
    }

    #[test]
    fn test_from_matrix_error() {
        let err: ResolveError = MatrixError::InvalidDimension { dimension: "mode" }.into();
        assert_eq!(err, ResolveError::InvalidDimension { dimension: "mode" });
    }
}
