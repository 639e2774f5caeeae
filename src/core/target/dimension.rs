//! Build dimensions.
//!
//! Each dimension is a closed enumeration. A [`Target`](super::Target) picks
//! exactly one value from each.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown dimension value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionParseError {
    pub dimension: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for DimensionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', valid values: {}",
            self.dimension,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for DimensionParseError {}

/// Declares a dimension enum with its lowercase key and capitalized
/// placeholder rendering.
macro_rules! dimension {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal, $display:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Dimension name used in diagnostics.
            pub const LABEL: &'static str = $label;

            const KEYS: &'static [&'static str] = &[$($key,)+];

            /// Lowercase key as written in declarations.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// Capitalized form substituted into templates.
            pub fn display_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = DimensionParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.to_ascii_lowercase();
                match lower.as_str() {
                    $($key => Ok($name::$variant),)+
                    _ => Err(DimensionParseError {
                        dimension: $label,
                        value: s.to_string(),
                        expected: $name::KEYS,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

dimension! {
    /// Operating system / hardware platform.
    Platform, "platform" {
        /// 64-bit desktop Windows
        Win64 => "win64", "Win64";
        /// 64-bit Linux
        Linux64 => "linux64", "Linux64";
        /// macOS
        MacOs => "macos", "MacOS";
    }
}

dimension! {
    /// Optimization level.
    Optimization, "optimization" {
        Debug => "debug", "Debug";
        Release => "release", "Release";
        /// Fully optimized shipping build
        Retail => "retail", "Retail";
    }
}

dimension! {
    /// Build mode: with or without editor tooling compiled in.
    Mode, "mode" {
        Editor => "editor", "Editor";
        Game => "game", "Game";
    }
}

dimension! {
    /// Toolset / framework the project files are generated for.
    Framework, "framework" {
        Vs2019 => "vs2019", "vs2019";
        Vs2022 => "vs2022", "vs2022";
        Clang => "clang", "clang";
        Gcc => "gcc", "gcc";
    }
}

impl Platform {
    /// Desktop PC platforms.
    pub fn is_pc(&self) -> bool {
        matches!(self, Platform::Win64)
    }
}

impl Optimization {
    pub fn is_debug(&self) -> bool {
        matches!(self, Optimization::Debug)
    }
}
