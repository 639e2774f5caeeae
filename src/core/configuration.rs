//! Configuration model - the per-(project, target) accumulator.
//!
//! Sequence fields keep insertion order, which is significant for include and
//! link search order. `defines` is a set. Nothing is ever removed except
//! through an explicit [`Configuration::replace`] call, which is recorded so
//! two competing replacements are caught instead of silently overwriting.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::rule::RuleId;
use crate::util::hash::Fingerprint;

/// Kind of artifact a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// Executable binary
    #[default]
    #[serde(alias = "exe")]
    Executable,

    /// Static library
    #[serde(alias = "lib", alias = "static")]
    Library,

    /// Shared/dynamic library
    #[serde(alias = "dll", alias = "shared")]
    SharedLibrary,

    /// Interface-only library (headers, no artifact)
    #[serde(alias = "header-only")]
    Interface,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Executable => "executable",
            OutputType::Library => "library",
            OutputType::SharedLibrary => "shared-library",
            OutputType::Interface => "interface",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-form compiler/linker option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Integer(i)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::String(s)
    }
}

/// Container fields that can be explicitly replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    Defines,
    IncludePaths,
    LibraryPaths,
    LibraryFiles,
    Options,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Defines => "defines",
            Field::IncludePaths => "include-paths",
            Field::LibraryPaths => "library-paths",
            Field::LibraryFiles => "library-files",
            Field::Options => "options",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two explicit replacements of the same field with equal precedence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{incoming}` replaces `{field}` already replaced by `{existing}` at precedence {precedence}")]
pub struct OverrideConflict {
    pub field: Field,
    pub existing: RuleId,
    pub incoming: RuleId,
    pub precedence: i32,
}

/// Outcome of a [`Configuration::replace`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replace {
    /// The field was cleared; the caller's values become its new contents.
    Applied,
    /// A higher-precedence replacement already owns the field; the caller
    /// must leave it untouched.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReplaceRecord {
    rule: RuleId,
    precedence: i32,
}

/// Resolved compiler/linker settings for one (project, target) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    defines: BTreeSet<String>,
    include_paths: Vec<String>,
    library_paths: Vec<String>,
    library_files: Vec<String>,
    output: OutputType,
    options: BTreeMap<String, OptionValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    solution_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_path: Option<String>,
    #[serde(skip)]
    replaced: BTreeMap<Field, ReplaceRecord>,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration::default()
    }

    pub fn defines(&self) -> &BTreeSet<String> {
        &self.defines
    }

    pub fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    pub fn library_paths(&self) -> &[String] {
        &self.library_paths
    }

    pub fn library_files(&self) -> &[String] {
        &self.library_files
    }

    pub fn output(&self) -> OutputType {
        self.output
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    pub fn solution_folder(&self) -> Option<&str> {
        self.solution_folder.as_deref()
    }

    pub fn project_file_name(&self) -> Option<&str> {
        self.project_file_name.as_deref()
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    /// Add a preprocessor define. Duplicates are no-ops.
    pub fn add_define(&mut self, define: impl Into<String>) {
        self.defines.insert(define.into());
    }

    pub fn add_include_path(&mut self, path: impl Into<String>) {
        self.include_paths.push(path.into());
    }

    pub fn add_library_path(&mut self, path: impl Into<String>) {
        self.library_paths.push(path.into());
    }

    pub fn add_library_file(&mut self, file: impl Into<String>) {
        self.library_files.push(file.into());
    }

    pub fn set_output(&mut self, output: OutputType) {
        self.output = output;
    }

    /// Set an option; a later value for the same key wins.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn set_solution_folder(&mut self, folder: impl Into<String>) {
        self.solution_folder = Some(folder.into());
    }

    pub fn set_project_file_name(&mut self, name: impl Into<String>) {
        self.project_file_name = Some(name.into());
    }

    pub fn set_target_path(&mut self, path: impl Into<String>) {
        self.target_path = Some(path.into());
    }

    /// Explicitly clear `field` on behalf of `rule`.
    ///
    /// A later replacement must carry strictly higher precedence to take the
    /// field over. Equal precedence from a different rule is a conflict;
    /// lower precedence leaves the field as it is.
    pub fn replace(
        &mut self,
        field: Field,
        rule: &RuleId,
        precedence: i32,
    ) -> Result<Replace, OverrideConflict> {
        if let Some(existing) = self.replaced.get(&field) {
            if existing.precedence == precedence && existing.rule != *rule {
                return Err(OverrideConflict {
                    field,
                    existing: existing.rule.clone(),
                    incoming: rule.clone(),
                    precedence,
                });
            }
            if existing.precedence > precedence {
                tracing::debug!(
                    "`{}` keeps `{}` (precedence {} > {}), ignoring replace from `{}`",
                    existing.rule,
                    field,
                    existing.precedence,
                    precedence,
                    rule
                );
                return Ok(Replace::Superseded);
            }
        }

        match field {
            Field::Defines => self.defines.clear(),
            Field::IncludePaths => self.include_paths.clear(),
            Field::LibraryPaths => self.library_paths.clear(),
            Field::LibraryFiles => self.library_files.clear(),
            Field::Options => self.options.clear(),
        }
        self.replaced.insert(
            field,
            ReplaceRecord {
                rule: rule.clone(),
                precedence,
            },
        );
        Ok(Replace::Applied)
    }

    /// Fold a dependency's exported settings into this configuration.
    ///
    /// Sequence fields are appended after the current contents and defines
    /// are unioned. Scalars and options stay with the dependent.
    pub fn fold(&mut self, dependency: &Configuration) {
        self.defines.extend(dependency.defines.iter().cloned());
        self.include_paths
            .extend(dependency.include_paths.iter().cloned());
        self.library_paths
            .extend(dependency.library_paths.iter().cloned());
        self.library_files
            .extend(dependency.library_files.iter().cloned());
    }

    /// Stable content hash (sha256, hex) over every emitted field.
    pub fn fingerprint(&self) -> String {
        let options: Vec<String> = self
            .options
            .iter()
            .map(|(k, v)| format!("{}={:?}", k, v))
            .collect();

        let mut fp = Fingerprint::new();
        fp.update_list("defines", self.defines.iter().map(String::as_str))
            .update_list("include", self.include_paths.iter().map(String::as_str))
            .update_list("libpath", self.library_paths.iter().map(String::as_str))
            .update_list("libfile", self.library_files.iter().map(String::as_str))
            .update_str(self.output.as_str())
            .update_list("options", options.iter().map(String::as_str))
            .update_opt(self.solution_folder.as_deref())
            .update_opt(self.project_file_name.as_deref())
            .update_opt(self.target_path.as_deref());
        fp.finish()
    }
}
