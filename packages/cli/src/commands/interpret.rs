use super::pretty_parse_error;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tailbox_evaluator::{InterpretError, Interpreter, Value};
use tracing::debug;

#[derive(Debug, Args)]
pub struct InterpretArgs {
    /// Markup file to interpret
    pub file: PathBuf,

    /// Pretty-print the JSON tree
    #[arg(long)]
    pub pretty: bool,

    /// JSON object merged into the configured bindings
    #[arg(short, long)]
    pub bindings: Option<PathBuf>,

    /// Print the top-level nodes instead of the wrapped tree
    #[arg(long)]
    pub roots: bool,
}

pub fn interpret(args: InterpretArgs, config: &Config, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.file);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut options = config.interpreter.clone();
    if let Some(bindings) = &args.bindings {
        for (name, value) in load_bindings(&cwd.join(bindings))? {
            options.bindings.insert(name, value);
        }
    }
    debug!(bindings = options.bindings.len(), "Interpreter options ready");

    let interpreter = Interpreter::new(options)?;
    let interpretation = interpreter.interpret(&source).map_err(|error| match error {
        InterpretError::Parse(e) => pretty_parse_error(&e, &path, &source),
        other => other.into(),
    })?;

    for diagnostic in &interpretation.diagnostics {
        eprintln!("  {} {}", "warning:".yellow().bold(), diagnostic);
    }

    let output = if args.roots {
        serde_json::to_value(&interpretation.roots)?
    } else {
        serde_json::to_value(&interpretation.tree)?
    };
    let printed = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", printed);
    Ok(())
}

fn load_bindings(path: &Path) -> Result<Vec<(String, Value)>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match json {
        serde_json::Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        _ => Err(anyhow!("Bindings in {} must be a JSON object", path.display())),
    }
}
