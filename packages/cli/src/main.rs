mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, init, lint, vars, CompileArgs, InitArgs, LintArgs, VarsArgs};
use tracing_subscriber::EnvFilter;

/// Mailbuilder CLI - compile, lint and inspect email templates
#[derive(Parser, Debug)]
#[command(name = "mailbuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailbuilder project
    Init(InitArgs),

    /// Render .json templates to email HTML
    Compile(CompileArgs),

    /// Check templates for structural and content problems
    Lint(LintArgs),

    /// List the variables each template declares and references
    Vars(VarsArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Compile(args) => compile(args, &cwd),
            Command::Lint(args) => lint(args, &cwd),
            Command::Vars(args) => vars(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
