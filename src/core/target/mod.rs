//! Targets - one concrete combination of build dimensions.
//!
//! A Target is produced by the [`TargetMatrix`] and never mutated. Projects,
//! dependency edges and rules narrow the set of targets they apply to with
//! a [`TargetFilter`].

mod dimension;
mod filter;
mod matrix;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::dimension::{DimensionParseError, Framework, Mode, Optimization, Platform};
pub use self::filter::TargetFilter;
pub use self::matrix::{DimensionDomains, MatrixError, TargetMatrix};

/// An immutable tuple of dimension values.
///
/// Field order drives the derived ordering: platform-major, then
/// optimization, mode and framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
    pub platform: Platform,
    pub optimization: Optimization,
    pub mode: Mode,
    pub framework: Framework,
}

impl Target {
    pub fn new(
        platform: Platform,
        optimization: Optimization,
        mode: Mode,
        framework: Framework,
    ) -> Self {
        Target {
            platform,
            optimization,
            mode,
            framework,
        }
    }

    /// Configuration name, e.g. `Debug_Editor`.
    ///
    /// This is what `[target.Name]` renders to, and is shared by every
    /// platform/framework combination with the same optimization and mode.
    pub fn name(&self) -> String {
        format!(
            "{}_{}",
            self.optimization.display_name(),
            self.mode.display_name()
        )
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.platform, self.optimization, self.mode, self.framework
        )
    }
}

/// Error returned when parsing a target from its display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    /// Wrong number of `|`-separated components.
    Shape(String),
    /// One component is not a known value.
    Dimension(DimensionParseError),
}

impl fmt::Display for TargetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetParseError::Shape(s) => write!(
                f,
                "invalid target '{}', expected platform|optimization|mode|framework",
                s
            ),
            TargetParseError::Dimension(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for TargetParseError {}

impl From<DimensionParseError> for TargetParseError {
    fn from(e: DimensionParseError) -> Self {
        TargetParseError::Dimension(e)
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').map(str::trim).collect();
        let [platform, optimization, mode, framework] = parts.as_slice() else {
            return Err(TargetParseError::Shape(s.to_string()));
        };

        Ok(Target {
            platform: platform.parse()?,
            optimization: optimization.parse()?,
            mode: mode.parse()?,
            framework: framework.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display_roundtrip() {
        let t = Target::new(
            Platform::Win64,
            Optimization::Release,
            Mode::Game,
            Framework::Vs2019,
        );
        assert_eq!(t.to_string(), "win64|release|game|vs2019");
        assert_eq!("win64|release|game|vs2019".parse::<Target>().unwrap(), t);
    }

    #[test]
    fn test_target_name() {
        let t = Target::new(
            Platform::Win64,
            Optimization::Debug,
            Mode::Editor,
            Framework::Vs2019,
        );
        assert_eq!(t.name(), "Debug_Editor");
    }

    #[test]
    fn test_target_parse_errors() {
        assert!(matches!(
            "win64|debug".parse::<Target>(),
            Err(TargetParseError::Shape(_))
        ));
        assert!(matches!(
            "win64|fast|game|vs2019".parse::<Target>(),
            Err(TargetParseError::Dimension(_))
        ));
    }
}
