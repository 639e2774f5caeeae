//! JSON output.
//!
//! One document per run:
//!
//! ```json
//! {
//!   "version": 1,
//!   "configurations": [
//!     {
//!       "project": "Engine",
//!       "target": "win64|debug|editor|vs2019",
//!       "name": "Debug_Editor",
//!       "fingerprint": "…",
//!       "dependencies": [{ "project": "Dementia", "visibility": "public", "via": "Engine" }],
//!       "configuration": { "defines": ["NOMINMAX"], "include_paths": [], … }
//!     }
//!   ]
//! }
//! ```
//!
//! The schema is versioned. New fields may be added, but existing fields
//! are not removed or renamed.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::configuration::Configuration;
use crate::core::project::Visibility;
use crate::core::target::Target;
use crate::emit::Emitter;
use crate::resolver::{Resolution, ResolvedSet};

/// Version of the emitted JSON schema.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    configurations: Vec<Entry<'a>>,
}

#[derive(Serialize)]
struct Entry<'a> {
    project: &'a str,
    target: String,
    #[serde(flatten)]
    dimensions: &'a Target,
    name: String,
    fingerprint: String,
    dependencies: Vec<Folded<'a>>,
    configuration: &'a Configuration,
}

#[derive(Serialize)]
struct Folded<'a> {
    project: &'a str,
    visibility: Visibility,
    via: &'a str,
}

impl<'a> Entry<'a> {
    fn new(resolution: &'a Resolution) -> Self {
        Entry {
            project: resolution.project(),
            target: resolution.target().to_string(),
            dimensions: resolution.target(),
            name: resolution.target().name(),
            fingerprint: resolution.config().fingerprint(),
            dependencies: resolution
                .folded()
                .iter()
                .map(|f| Folded {
                    project: &f.project,
                    visibility: f.visibility,
                    via: &f.via,
                })
                .collect(),
            configuration: resolution.config(),
        }
    }
}

/// Pretty-printed JSON emitter.
pub struct JsonEmitter<W> {
    out: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(out: W) -> Self {
        JsonEmitter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Emitter for JsonEmitter<W> {
    fn emit(&mut self, set: &ResolvedSet) -> Result<()> {
        let document = Document {
            version: SCHEMA_VERSION,
            configurations: set.iter().map(Entry::new).collect(),
        };

        serde_json::to_writer_pretty(&mut self.out, &document)
            .context("failed to serialize resolved configurations")?;
        writeln!(self.out)?;
        self.out.flush()?;

        tracing::debug!("emitted {} configuration(s) as JSON", set.len());
        Ok(())
    }
}
