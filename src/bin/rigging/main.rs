//! Rigging CLI - resolve per-target build configurations

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rigging::util::diagnostic::emit;
use rigging::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ResolveError>() {
            Some(resolve_err) => emit(&resolve_err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("rigging=debug")
    } else {
        EnvFilter::new("rigging=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = rigging::GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);
    let manifest_path = cli.manifest_path;

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &ctx, manifest_path),
        Commands::Matrix(args) => commands::matrix::execute(args, &ctx, manifest_path),
        Commands::Show(args) => commands::show::execute(args, &ctx, manifest_path),
        Commands::Tree(args) => commands::tree::execute(args, &ctx, manifest_path),
        Commands::Check(args) => commands::check::execute(args, &ctx, manifest_path),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
