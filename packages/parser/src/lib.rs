pub mod ast;
pub mod entities;
pub mod error;
mod expression;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_expression;
#[cfg(test)]
mod tests_markup;

pub use ast::*;
#[cfg(feature = "pretty-errors")]
pub use error::format_error;
pub use error::{ParseError, ParseResult};
pub use parser::{
    is_void_element, parse_expression, parse_markup, parse_program, Parser, ParserOptions,
    DEFAULT_MAX_DEPTH, VOID_ELEMENTS,
};
pub use serializer::{serialize_expression, serialize_nodes, serialize_program, Serializer};
pub use tokenizer::{tokenize, Token};
