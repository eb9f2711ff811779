mod context;
mod error;
mod rewrite;

pub use context::{RewriteOptions, RewriteStats};
pub use error::{RewriteError, RewriteResult};
pub use rewrite::{collect_class_lists, rewrite, rewrite_program, rewrite_with_options, ClassList};
