//! Path and name templates.
//!
//! Declared strings may embed placeholders such as `[project.Name]` or
//! `[target.Optimization]`. Templates are parsed once when declarations are
//! loaded; rendering is a lookup in a [`Substitutions`] table built once per
//! (project, target) pair.
//!
//! IDE macros like `$(SolutionDir)` are not interpreted and pass through as
//! literal text. A literal `[` is written as `[[`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::target::Target;

/// Errors raised while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder `[{placeholder}]` in `{template}`")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("unterminated placeholder in `{template}`")]
    Unterminated { template: String },
}

/// A recognized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    ProjectName,
    ProjectSourceRootPath,
    ProjectRootPath,
    TargetPlatform,
    TargetOptimization,
    TargetMode,
    TargetFramework,
    TargetName,
}

impl Placeholder {
    pub const ALL: &'static [Placeholder] = &[
        Placeholder::ProjectName,
        Placeholder::ProjectSourceRootPath,
        Placeholder::ProjectRootPath,
        Placeholder::TargetPlatform,
        Placeholder::TargetOptimization,
        Placeholder::TargetMode,
        Placeholder::TargetFramework,
        Placeholder::TargetName,
    ];

    /// Key as written between brackets.
    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::ProjectName => "project.Name",
            Placeholder::ProjectSourceRootPath => "project.SourceRootPath",
            Placeholder::ProjectRootPath => "project.RootPath",
            Placeholder::TargetPlatform => "target.Platform",
            Placeholder::TargetOptimization => "target.Optimization",
            Placeholder::TargetMode => "target.Mode",
            Placeholder::TargetFramework => "target.Framework",
            Placeholder::TargetName => "target.Name",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Placeholder::ALL.iter().copied().find(|p| p.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template.
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source.as_str();

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            if let Some(escaped) = after.strip_prefix('[') {
                literal.push('[');
                rest = escaped;
                continue;
            }

            let close = after.find(']').ok_or_else(|| TemplateError::Unterminated {
                template: source.clone(),
            })?;
            let key = &after[..close];
            let placeholder =
                Placeholder::from_key(key).ok_or_else(|| TemplateError::UnknownPlaceholder {
                    template: source.clone(),
                    placeholder: key.to_string(),
                })?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));
            rest = &after[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template { source, segments })
    }

    /// Render against a substitution table.
    pub fn render(&self, subs: &Substitutions) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(subs.get(*p)),
            }
        }
        out
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Template::parse(value)
    }
}

impl From<Template> for String {
    fn from(t: Template) -> Self {
        t.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Resolved placeholder values for one (project, target) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<Placeholder, String>,
}

impl Substitutions {
    /// Build the table for a project and target.
    pub fn new(project_name: &str, source_root: &str, root_path: &str, target: &Target) -> Self {
        let mut values = BTreeMap::new();
        values.insert(Placeholder::ProjectName, project_name.to_string());
        values.insert(Placeholder::ProjectSourceRootPath, source_root.to_string());
        values.insert(Placeholder::ProjectRootPath, root_path.to_string());
        values.insert(
            Placeholder::TargetPlatform,
            target.platform.display_name().to_string(),
        );
        values.insert(
            Placeholder::TargetOptimization,
            target.optimization.display_name().to_string(),
        );
        values.insert(Placeholder::TargetMode, target.mode.display_name().to_string());
        values.insert(
            Placeholder::TargetFramework,
            target.framework.display_name().to_string(),
        );
        values.insert(Placeholder::TargetName, target.name());
        Substitutions { values }
    }

    pub fn get(&self, placeholder: Placeholder) -> &str {
        self.values
            .get(&placeholder)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::{Framework, Mode, Optimization, Platform};

    fn subs() -> Substitutions {
        let target = Target::new(
            Platform::Win64,
            Optimization::Debug,
            Mode::Editor,
            Framework::Vs2019,
        );
        Substitutions::new("MitchEngine", "Source", "/work/engine", &target)
    }

    #[test]
    fn test_render_placeholders() {
        let t = Template::parse("ThirdParty/Lib/SDL/Win64/[target.Optimization]").unwrap();
        assert_eq!(t.render(&subs()), "ThirdParty/Lib/SDL/Win64/Debug");

        let t = Template::parse("[project.Name]_[target.Framework]").unwrap();
        assert_eq!(t.render(&subs()), "MitchEngine_vs2019");

        let t = Template::parse("$(SolutionDir).build/[target.Name]/").unwrap();
        assert_eq!(t.render(&subs()), "$(SolutionDir).build/Debug_Editor/");
    }

    #[test]
    fn test_plain_text_is_literal() {
        let t = Template::parse("OptickCore.lib").unwrap();
        assert_eq!(t.render(&subs()), "OptickCore.lib");
    }

    #[test]
    fn test_escaped_bracket() {
        let t = Template::parse("a[[b").unwrap();
        assert_eq!(t.render(&subs()), "a[b");
        assert_eq!(t.to_string(), "a[[b");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = Template::parse("[solution.Name]").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder { ref placeholder, .. } if placeholder == "solution.Name"));
    }

    #[test]
    fn test_unterminated() {
        let err = Template::parse("lib/[target.Optimization").unwrap_err();
        assert!(matches!(err, TemplateError::Unterminated { .. }));
    }

    #[test]
    fn test_deserialize_from_string() {
        #[derive(Deserialize)]
        struct Holder {
            path: Template,
        }
        let h: Holder = toml::from_str("path = \"bin/[target.Mode]\"").unwrap();
        assert_eq!(h.path.render(&subs()), "bin/Editor");

        let bad: Result<Holder, _> = toml::from_str("path = \"bin/[nope]\"");
        assert!(bad.is_err());
    }
}
