//! Human-readable output.

use std::io::Write;

use anyhow::Result;

use crate::core::configuration::Configuration;
use crate::emit::Emitter;
use crate::resolver::{Resolution, ResolvedSet};

/// Plain-text emitter: one block per (project, target) pair.
pub struct SummaryEmitter<W> {
    out: W,
}

impl<W: Write> SummaryEmitter<W> {
    pub fn new(out: W) -> Self {
        SummaryEmitter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_resolution(&mut self, resolution: &Resolution) -> Result<()> {
        let config = resolution.config();
        writeln!(
            self.out,
            "{} [{}] {} ({})",
            resolution.project(),
            resolution.target(),
            config.output(),
            resolution.target().name()
        )?;
        write_config(&mut self.out, config)?;

        if !resolution.folded().is_empty() {
            let folded: Vec<String> = resolution
                .folded()
                .iter()
                .map(|f| format!("{} ({})", f.project, f.visibility))
                .collect();
            writeln!(self.out, "  folded: {}", folded.join(", "))?;
        }
        writeln!(self.out, "  fingerprint: {}", &config.fingerprint()[..16])?;
        Ok(())
    }
}

/// Write the non-empty fields of `config`, two-space indented.
pub(crate) fn write_config(out: &mut impl Write, config: &Configuration) -> Result<()> {
    if !config.defines().is_empty() {
        writeln!(out, "  defines: {}", joined(config.defines()))?;
    }
    if !config.include_paths().is_empty() {
        writeln!(out, "  include-paths: {}", joined(config.include_paths()))?;
    }
    if !config.library_paths().is_empty() {
        writeln!(out, "  library-paths: {}", joined(config.library_paths()))?;
    }
    if !config.library_files().is_empty() {
        writeln!(out, "  library-files: {}", joined(config.library_files()))?;
    }
    for (key, value) in config.options() {
        writeln!(out, "  option {} = {}", key, value)?;
    }
    if let Some(folder) = config.solution_folder() {
        writeln!(out, "  solution-folder: {}", folder)?;
    }
    if let Some(name) = config.project_file_name() {
        writeln!(out, "  project-file-name: {}", name)?;
    }
    if let Some(path) = config.target_path() {
        writeln!(out, "  target-path: {}", path)?;
    }
    Ok(())
}

fn joined<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<W: Write> Emitter for SummaryEmitter<W> {
    fn emit(&mut self, set: &ResolvedSet) -> Result<()> {
        for (i, resolution) in set.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            self.write_resolution(resolution)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::{Dependency, Project};
    use crate::core::registry::ProjectRegistry;
    use crate::core::rule::Rule;
    use crate::resolver::{resolve_all, ResolveOptions};
    use crate::test_support::{debug_release_matrix, lib_rule};

    #[test]
    fn test_summary_lists_fields_and_folds() {
        let registry = ProjectRegistry::new(vec![
            Project::new("ImGui").with_rule(lib_rule("ImGui", "ImGui.lib")),
            Project::new("Havana")
                .with_rule(Rule::builder("Havana", "defs").apply(|conf, _| {
                    conf.add_define("ME_EDITOR");
                    conf.set_option("Warnings", "Level4");
                }))
                .with_dependency(Dependency::private("ImGui")),
        ])
        .unwrap();
        let matrix = debug_release_matrix();
        let set = resolve_all(
            &registry,
            &matrix,
            &ResolveOptions {
                projects: Some(vec!["Havana".into()]),
                jobs: None,
            },
        )
        .unwrap();

        let mut emitter = SummaryEmitter::new(Vec::new());
        emitter.emit(&set).unwrap();
        let text = String::from_utf8(emitter.into_inner()).unwrap();

        assert!(text.starts_with("Havana [win64|debug|game|vs2019] executable (Debug_Game)\n"));
        assert!(text.contains("  defines: ME_EDITOR\n"));
        assert!(text.contains("  library-files: ImGui.lib\n"));
        assert!(text.contains("  option Warnings = Level4\n"));
        assert!(text.contains("  folded: ImGui (private)\n"));
        assert!(!text.contains("ImGui [win64"));
    }
}
