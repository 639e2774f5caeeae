//! Emitters - hand a resolved set to a downstream consumer.
//!
//! Emission runs only after the whole run resolved successfully, so an
//! emitter never sees a partial set.

mod json;
mod summary;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::resolver::ResolvedSet;

pub use self::json::{JsonEmitter, SCHEMA_VERSION};
pub use self::summary::SummaryEmitter;

/// Consumer of a fully resolved set.
pub trait Emitter {
    fn emit(&mut self, set: &ResolvedSet) -> Result<()>;
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    #[default]
    Json,
    Summary,
}

impl EmitFormat {
    /// Boxed emitter of this format writing to `out`.
    pub fn emitter<'w, W: Write + 'w>(self, out: W) -> Box<dyn Emitter + 'w> {
        match self {
            EmitFormat::Json => Box::new(JsonEmitter::new(out)),
            EmitFormat::Summary => Box::new(SummaryEmitter::new(out)),
        }
    }
}

impl fmt::Display for EmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitFormat::Json => f.write_str("json"),
            EmitFormat::Summary => f.write_str("summary"),
        }
    }
}

impl FromStr for EmitFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(EmitFormat::Json),
            "summary" | "text" => Ok(EmitFormat::Summary),
            _ => Err(format!(
                "unknown output format `{}`, expected `json` or `summary`",
                s
            )),
        }
    }
}
