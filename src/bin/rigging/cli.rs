//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use rigging::core::target::{Framework, Mode, Optimization, Platform, TargetFilter};
use rigging::emit::EmitFormat;
use rigging::Target;

/// Rigging - resolve per-target build configurations for C/C++ projects
#[derive(Parser)]
#[command(name = "rigging")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Rigging.toml (defaults to searching upward from the cwd)
    #[arg(long, global = true, env = "RIGGING_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve configurations and emit them
    Generate(GenerateArgs),

    /// List the targets of the matrix
    Matrix(MatrixArgs),

    /// Show the resolved configuration of one project
    Show(ShowArgs),

    /// Display the dependency tree of a project
    Tree(TreeArgs),

    /// Validate declarations and run every rule chain without emitting
    Check(CheckArgs),

    /// Write a starter Rigging.toml
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Target-matrix restriction shared by several commands.
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only these platforms
    #[arg(long, value_delimiter = ',')]
    pub platform: Vec<Platform>,

    /// Only these optimization levels
    #[arg(long, value_delimiter = ',')]
    pub optimization: Vec<Optimization>,

    /// Only these modes
    #[arg(long, value_delimiter = ',')]
    pub mode: Vec<Mode>,

    /// Only these frameworks
    #[arg(long, value_delimiter = ',')]
    pub framework: Vec<Framework>,
}

impl FilterArgs {
    /// Empty lists leave their dimension unrestricted.
    pub fn to_filter(&self) -> TargetFilter {
        fn some<T: Clone>(values: &[T]) -> Option<Vec<T>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        TargetFilter {
            platform: some(&self.platform),
            optimization: some(&self.optimization),
            mode: some(&self.mode),
            framework: some(&self.framework),
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Resolve the members of this solution
    #[arg(short, long)]
    pub solution: Option<String>,

    /// Resolve these projects (repeatable)
    #[arg(short, long = "project")]
    pub projects: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format [json, summary]
    #[arg(long)]
    pub format: Option<EmitFormat>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Only list targets supported by this project
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project to show
    pub project: String,

    /// Only this target (platform|optimization|mode|framework)
    #[arg(short, long)]
    pub target: Option<Target>,

    /// Output format [json, summary]
    #[arg(long, default_value = "summary")]
    pub format: EmitFormat,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Project to show the tree for
    pub project: String,

    /// Target the edges are evaluated for (defaults to the first applicable)
    #[arg(short, long)]
    pub target: Option<Target>,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Print the flattened fold order instead of the tree
    #[arg(long)]
    pub fold: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
