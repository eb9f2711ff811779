use super::pretty_parse_error;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tailbox_parser::parse_program;
use tailbox_transform::collect_class_lists;
use tailbox_utility::{classify_token, TokenOutcome};

#[derive(Debug, Args)]
pub struct ClassesArgs {
    /// Class tokens; each argument may hold several space-separated tokens
    pub tokens: Vec<String>,

    /// Read the literal `class` attributes of a source file instead
    #[arg(short, long, conflicts_with = "tokens")]
    pub file: Option<PathBuf>,
}

pub fn classes(args: ClassesArgs, cwd: &Path) -> Result<()> {
    if let Some(file) = &args.file {
        let path = cwd.join(file);
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let program = parse_program(&source).map_err(|e| pretty_parse_error(&e, &path, &source))?;

        for list in collect_class_lists(&program) {
            println!("{} {}", format!("<{}>", list.tag).bright_blue(), list.value.dimmed());
            print_tokens(&list.value);
        }
        return Ok(());
    }

    if args.tokens.is_empty() {
        return Err(anyhow!("Pass class tokens or --file"));
    }
    for value in &args.tokens {
        print_tokens(value);
    }
    Ok(())
}

fn print_tokens(value: &str) {
    for token in value.split_whitespace() {
        match classify_token(token) {
            TokenOutcome::Directive(directive) => println!(
                "  {} {} → {}: {}",
                "✓".green(),
                token,
                directive.name.bold(),
                directive.value
            ),
            TokenOutcome::Responsive { breakpoint, .. } => println!(
                "  {} {} {}",
                "-".yellow(),
                token,
                format!("(dropped: responsive variant for {})", breakpoint).dimmed()
            ),
            TokenOutcome::Unmatched => println!(
                "  {} {} {}",
                "-".yellow(),
                token,
                "(dropped: no directive)".dimmed()
            ),
        }
    }
}
