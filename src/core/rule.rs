//! Configuration rules.
//!
//! A rule is a tagged closure: a [`RuleId`] for diagnostics plus a pure
//! function that mutates a [`Configuration`] for one [`Target`]. Conditional
//! behavior (debug vs. release libraries, editor-only defines) lives inside
//! the rule, either as an explicit branch in a programmatic rule or as the
//! `when` filter of a declared one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::configuration::{
    Configuration, Field, OptionValue, OutputType, OverrideConflict, Replace,
};
use crate::core::target::{Target, TargetFilter};
use crate::core::template::{Substitutions, Template};

/// Source-level identity of a rule: `project#label`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId {
    pub project: String,
    pub label: String,
}

impl RuleId {
    pub fn new(project: impl Into<String>, label: impl Into<String>) -> Self {
        RuleId {
            project: project.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project, self.label)
    }
}

/// What a rule sees while it runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Target being resolved.
    pub target: &'a Target,
    /// Placeholder values for the project being resolved.
    pub vars: &'a Substitutions,
    /// Identity of the running rule.
    pub rule: &'a RuleId,
    /// Effective precedence of the running rule.
    pub precedence: i32,
}

impl RuleContext<'_> {
    pub fn render(&self, template: &Template) -> String {
        template.render(self.vars)
    }

    /// Explicitly clear `field` on behalf of the running rule.
    pub fn replace(
        &self,
        conf: &mut Configuration,
        field: Field,
    ) -> Result<Replace, OverrideConflict> {
        conf.replace(field, self.rule, self.precedence)
    }
}

type RuleFn = dyn Fn(&mut Configuration, &RuleContext<'_>) -> Result<(), OverrideConflict>
    + Send
    + Sync;

/// One configuration rule.
#[derive(Clone)]
pub struct Rule {
    id: RuleId,
    precedence: Option<i32>,
    body: Arc<RuleFn>,
}

impl Rule {
    pub fn builder(project: impl Into<String>, label: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            id: RuleId::new(project, label),
            precedence: None,
            when: TargetFilter::any(),
        }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// Declared precedence, if any. The chain walker falls back to the
    /// inheritance depth of the declaring project.
    pub fn precedence(&self) -> Option<i32> {
        self.precedence
    }

    /// Run the rule against `conf`.
    pub fn apply(
        &self,
        conf: &mut Configuration,
        ctx: &RuleContext<'_>,
    ) -> Result<(), OverrideConflict> {
        (self.body)(conf, ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

/// Builder for programmatic rules.
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    id: RuleId,
    precedence: Option<i32>,
    when: TargetFilter,
}

impl RuleBuilder {
    pub fn precedence(mut self, precedence: i32) -> Self {
        self.precedence = Some(precedence);
        self
    }

    /// Only run the body for targets accepted by `filter`.
    pub fn when(mut self, filter: TargetFilter) -> Self {
        self.when = filter;
        self
    }

    /// Finish with a fallible body.
    pub fn try_apply<F>(self, body: F) -> Rule
    where
        F: Fn(&mut Configuration, &RuleContext<'_>) -> Result<(), OverrideConflict>
            + Send
            + Sync
            + 'static,
    {
        let when = self.when;
        Rule {
            id: self.id,
            precedence: self.precedence,
            body: Arc::new(move |conf, ctx| {
                if !when.matches(ctx.target) {
                    return Ok(());
                }
                body(conf, ctx)
            }),
        }
    }

    /// Finish with a body that never replaces fields.
    pub fn apply<F>(self, body: F) -> Rule
    where
        F: Fn(&mut Configuration, &RuleContext<'_>) + Send + Sync + 'static,
    {
        self.try_apply(move |conf, ctx| {
            body(conf, ctx);
            Ok(())
        })
    }
}

/// An option value as declared; strings are templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredOption {
    Bool(bool),
    Integer(i64),
    String(Template),
}

impl DeclaredOption {
    fn render(&self, vars: &Substitutions) -> OptionValue {
        match self {
            DeclaredOption::Bool(b) => OptionValue::Bool(*b),
            DeclaredOption::Integer(i) => OptionValue::Integer(*i),
            DeclaredOption::String(t) => OptionValue::String(t.render(vars)),
        }
    }
}

/// A rule as written in the declarations file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleSpec {
    pub label: Option<String>,
    pub when: TargetFilter,
    pub precedence: Option<i32>,
    pub replace: Vec<Field>,
    pub defines: Vec<Template>,
    pub include_paths: Vec<Template>,
    pub library_paths: Vec<Template>,
    pub library_files: Vec<Template>,
    pub output: Option<OutputType>,
    pub options: BTreeMap<String, DeclaredOption>,
    pub solution_folder: Option<Template>,
    pub project_file_name: Option<Template>,
    pub target_path: Option<Template>,
}

impl RuleSpec {
    /// Turn the declaration into a rule owned by `project`.
    ///
    /// Without a label the rule is named by its position in the project.
    pub fn into_rule(self, project: &str, index: usize) -> Rule {
        let label = self.label.clone().unwrap_or_else(|| index.to_string());
        let mut builder = Rule::builder(project, label).when(self.when.clone());
        if let Some(p) = self.precedence {
            builder = builder.precedence(p);
        }
        builder.try_apply(move |conf, ctx| self.run(conf, ctx))
    }

    fn run(&self, conf: &mut Configuration, ctx: &RuleContext<'_>) -> Result<(), OverrideConflict> {
        let mut superseded = BTreeSet::new();
        for &field in &self.replace {
            if ctx.replace(conf, field)? == Replace::Superseded {
                superseded.insert(field);
            }
        }
        let writes = |field: Field| !superseded.contains(&field);

        if writes(Field::Defines) {
            for d in &self.defines {
                conf.add_define(ctx.render(d));
            }
        }
        if writes(Field::IncludePaths) {
            for p in &self.include_paths {
                conf.add_include_path(ctx.render(p));
            }
        }
        if writes(Field::LibraryPaths) {
            for p in &self.library_paths {
                conf.add_library_path(ctx.render(p));
            }
        }
        if writes(Field::LibraryFiles) {
            for f in &self.library_files {
                conf.add_library_file(ctx.render(f));
            }
        }
        if writes(Field::Options) {
            for (key, value) in &self.options {
                conf.set_option(key.clone(), value.render(ctx.vars));
            }
        }

        if let Some(output) = self.output {
            conf.set_output(output);
        }
        if let Some(ref t) = self.solution_folder {
            conf.set_solution_folder(ctx.render(t));
        }
        if let Some(ref t) = self.project_file_name {
            conf.set_project_file_name(ctx.render(t));
        }
        if let Some(ref t) = self.target_path {
            conf.set_target_path(ctx.render(t));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::{Framework, Mode, Optimization, Platform};

    fn target(opt: Optimization) -> Target {
        Target::new(Platform::Win64, opt, Mode::Editor, Framework::Vs2019)
    }

    fn run(rule: &Rule, conf: &mut Configuration, target: &Target) -> Result<(), OverrideConflict> {
        let vars = Substitutions::new("Engine", "Source", "/root", target);
        let ctx = RuleContext {
            target,
            vars: &vars,
            rule: rule.id(),
            precedence: rule.precedence().unwrap_or(0),
        };
        rule.apply(conf, &ctx)
    }

    #[test]
    fn test_programmatic_rule_branches_on_target() {
        let rule = Rule::builder("Engine", "sdl").apply(|conf, ctx| {
            if ctx.target.optimization.is_debug() {
                conf.add_library_file("SDL2d.lib");
            } else {
                conf.add_library_file("SDL2.lib");
            }
        });

        let mut debug = Configuration::new();
        run(&rule, &mut debug, &target(Optimization::Debug)).unwrap();
        let mut release = Configuration::new();
        run(&rule, &mut release, &target(Optimization::Release)).unwrap();

        assert_eq!(debug.library_files(), ["SDL2d.lib"]);
        assert_eq!(release.library_files(), ["SDL2.lib"]);
    }

    #[test]
    fn test_when_filter_skips_body() {
        let rule = Rule::builder("Engine", "editor")
            .when(TargetFilter::any().with_mode([Mode::Game]))
            .apply(|conf, _| conf.add_define("GAME_ONLY"));

        let mut conf = Configuration::new();
        run(&rule, &mut conf, &target(Optimization::Debug)).unwrap();
        assert!(conf.defines().is_empty());
    }

    #[test]
    fn test_rule_spec_renders_templates() {
        let spec: RuleSpec = toml::from_str(
            r#"
            defines = ["NOMINMAX"]
            library-paths = ["ThirdParty/Lib/SDL/Win64/[target.Optimization]"]
            library-files = ["bgfx[target.Optimization].lib"]
            output = "library"
            project-file-name = "[project.Name]_[target.Framework]"
            options = { cpp-standard = "c++17", rtti = true, warning-level = 3 }
            "#,
        )
        .unwrap();
        let rule = spec.into_rule("Engine", 0);
        assert_eq!(rule.id().to_string(), "Engine#0");

        let mut conf = Configuration::new();
        run(&rule, &mut conf, &target(Optimization::Release)).unwrap();

        assert!(conf.defines().contains("NOMINMAX"));
        assert_eq!(conf.library_paths(), ["ThirdParty/Lib/SDL/Win64/Release"]);
        assert_eq!(conf.library_files(), ["bgfxRelease.lib"]);
        assert_eq!(conf.output(), OutputType::Library);
        assert_eq!(conf.project_file_name(), Some("Engine_vs2019"));
        assert_eq!(conf.option("rtti"), Some(&OptionValue::Bool(true)));
        assert_eq!(conf.option("warning-level"), Some(&OptionValue::Integer(3)));
        assert_eq!(
            conf.option("cpp-standard"),
            Some(&OptionValue::String("c++17".into()))
        );
    }

    #[test]
    fn test_rule_spec_replace_then_add() {
        let spec: RuleSpec = toml::from_str(
            r#"
            label = "no-optick"
            replace = ["library-files"]
            library-files = ["Only.lib"]
            "#,
        )
        .unwrap();
        let rule = spec.into_rule("Game", 3);
        assert_eq!(rule.id().label, "no-optick");

        let mut conf = Configuration::new();
        conf.add_library_file("OptickCore.lib");
        run(&rule, &mut conf, &target(Optimization::Debug)).unwrap();
        assert_eq!(conf.library_files(), ["Only.lib"]);
    }

    #[test]
    fn test_rule_spec_rejects_unknown_keys() {
        let result: Result<RuleSpec, _> = toml::from_str("cflags = [\"-O2\"]");
        assert!(result.is_err());
    }
}
