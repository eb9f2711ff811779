use crate::options::InterpretOptions;
use crate::render::Renderer;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid blacklisted attribute pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Options plus everything derived from them once, shared by every
/// evaluation an interpreter runs
pub struct Context {
    pub(crate) options: InterpretOptions,
    pub(crate) renderer: Arc<dyn Renderer>,
    blacklisted_attrs: Vec<Regex>,
    blacklisted_tags: Vec<String>,
}

impl Context {
    pub fn new(options: InterpretOptions, renderer: Arc<dyn Renderer>) -> Result<Self, ConfigError> {
        let blacklisted_attrs = options
            .blacklisted_attrs
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blacklisted_tags = options
            .blacklisted_tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        Ok(Self {
            options,
            renderer,
            blacklisted_attrs,
            blacklisted_tags,
        })
    }

    pub fn options(&self) -> &InterpretOptions {
        &self.options
    }

    pub fn is_blacklisted_tag(&self, name: &str) -> bool {
        let tag = name.trim().to_lowercase();
        self.blacklisted_tags.iter().any(|blacklisted| *blacklisted == tag)
    }

    pub fn is_blacklisted_attr(&self, name: &str) -> bool {
        self.blacklisted_attrs.iter().any(|pattern| pattern.is_match(name))
    }
}
