//! High-level operations.
//!
//! This module contains the implementation of Rigging commands.

pub mod check;
pub mod resolve;
pub mod rigging_generate;
pub mod rigging_init;

pub use check::{check, CheckReport};
pub use resolve::{load_workspace, resolve_workspace, Loaded, Selection};
pub use rigging_generate::{generate, GenerateOptions, GenerateResult};
pub use rigging_init::init_project;
