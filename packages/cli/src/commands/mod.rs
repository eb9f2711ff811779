pub mod classes;
pub mod interpret;
pub mod rewrite;

pub use classes::{classes, ClassesArgs};
pub use interpret::{interpret, InterpretArgs};
pub use rewrite::{rewrite, RewriteArgs};

use anyhow::anyhow;
use std::path::Path;
use tailbox_parser::{format_error, ParseError};

/// Parse errors rendered with source context
pub(crate) fn pretty_parse_error(error: &ParseError, path: &Path, source: &str) -> anyhow::Error {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown");
    anyhow!("\n{}", format_error(source, file_name, error))
}
