use super::pretty_parse_error;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tailbox_transform::{rewrite_with_options, RewriteError};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// File or directory to rewrite
    pub path: PathBuf,

    /// Print to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

pub fn rewrite(args: RewriteArgs, config: &Config, cwd: &Path) -> Result<()> {
    let input = cwd.join(&args.path);
    if !input.exists() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    if input.is_file() {
        let output = rewrite_file(&input, config)?;
        if args.stdout {
            println!("{}", output);
            return Ok(());
        }
        let file_name = input
            .file_name()
            .ok_or_else(|| anyhow!("Not a file: {}", input.display()))?;
        let target = out_dir(&args, config, cwd).join(file_name);
        write_output(&target, &output)?;
        println!("  {} {} → {}", "✓".green(), args.path.display(), target.display());
        return Ok(());
    }

    let files = find_sources(&input, config);
    if files.is_empty() {
        println!("{}", "No matching files found".yellow());
        return Ok(());
    }
    println!("Found {} files", files.len());

    let out_dir = out_dir(&args, config, cwd);
    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative = file.strip_prefix(&input).unwrap_or(file);
        match rewrite_file(file, config) {
            Ok(output) if args.stdout => {
                success_count += 1;
                println!("// {}", relative.display());
                println!("{}", output);
            }
            Ok(output) => {
                let target = out_dir.join(relative);
                write_output(&target, &output)?;
                success_count += 1;
                println!("  {} {} → {}", "✓".green(), relative.display(), target.display());
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), relative.display(), e.to_string().red());
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Rewrote {} files", "Done".green().bold(), success_count);
    } else {
        println!(
            "{} Rewrote {} files, {} errors",
            "Done".yellow().bold(),
            success_count,
            error_count
        );
    }
    Ok(())
}

fn out_dir(args: &RewriteArgs, config: &Config, cwd: &Path) -> PathBuf {
    match &args.out_dir {
        Some(dir) => cwd.join(dir),
        None => config.out_dir(cwd),
    }
}

fn find_sources(dir: &Path, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && config.matches_extension(path))
        .collect()
}

fn rewrite_file(path: &Path, config: &Config) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), "Rewriting");
    rewrite_with_options(&source, &config.rewrite).map_err(|error| match error {
        RewriteError::Parse(e) => pretty_parse_error(&e, path, &source),
    })
}

fn write_output(target: &Path, output: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(target, output).with_context(|| format!("Failed to write {}", target.display()))
}
