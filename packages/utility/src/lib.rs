pub mod parser;
pub mod theme;

pub use parser::{
    classify_token, classify_token_with, parse_class_list, parse_token, StyleDirective,
    TokenOutcome,
};
pub use theme::{init_theme, theme, Screen, Theme, ThemeError};
