use tailbox_parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewriteError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type RewriteResult<T> = Result<T, RewriteError>;
