mod commands;
mod config;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{classes, interpret, rewrite, ClassesArgs, InterpretArgs, RewriteArgs};
use config::Config;
use std::path::PathBuf;
use tailbox_utility::init_theme;
use tracing_subscriber::EnvFilter;

/// Tailbox CLI - utility-class markup to Box trees
#[derive(Parser, Debug)]
#[command(name = "tailbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ./tailbox.config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite class attributes into Box props
    Rewrite(RewriteArgs),

    /// Interpret markup and print the element tree as JSON
    Interpret(InterpretArgs),

    /// Show what each utility class token turns into
    Classes(ClassesArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let config = match &cli.config {
        Some(path) => Config::load_file(&cwd.join(path), true)?,
        None => Config::load(&cwd)?,
    };

    if let Some(theme) = config.theme.clone() {
        init_theme(theme)?;
    }

    match cli.command {
        Command::Rewrite(args) => rewrite(args, &config, &cwd),
        Command::Interpret(args) => interpret(args, &config, &cwd),
        Command::Classes(args) => classes(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
