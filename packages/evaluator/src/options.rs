//! Interpreter configuration.
//!
//! Deserializes from the `interpreter` section of `tailbox.config.json`
//! (camelCase keys, every field optional). Callbacks cannot come from JSON
//! and are attached with the builder methods.

use crate::diagnostics::ErrorCallback;
use crate::registry::{ComponentRef, ComponentRegistry};
use crate::scope::Bindings;
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tailbox_parser::DEFAULT_MAX_DEPTH;

/// Fallback renderer receiving an error message or a tag name
pub type RenderCallback = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Class always present on the wrapper element
pub const WRAPPER_CLASS: &str = "jsx-parser";

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpretOptions {
    /// Render tags that are neither registered nor known host elements
    pub allow_unknown_elements: bool,
    pub auto_close_void_elements: bool,
    pub bindings: Bindings,
    /// Case-insensitive regular expressions matched against prop names
    pub blacklisted_attrs: Vec<String>,
    pub blacklisted_tags: Vec<String>,
    /// Extra class for the wrapper element
    pub class_name: Option<String>,
    pub components: ComponentRegistry,
    pub components_only: bool,
    /// Render text as plain strings instead of fragments
    pub disable_fragments: bool,
    pub disable_key_generation: bool,
    pub render_in_wrapper: bool,
    /// Log diagnostics at `warn` instead of `debug`
    pub show_warnings: bool,
    pub max_depth: usize,

    #[serde(skip)]
    pub on_error: Option<ErrorCallback>,
    #[serde(skip)]
    pub render_error: Option<RenderCallback>,
    #[serde(skip)]
    pub render_unrecognized: Option<RenderCallback>,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            allow_unknown_elements: true,
            auto_close_void_elements: false,
            bindings: Bindings::new(),
            blacklisted_attrs: vec!["^on.+".to_string()],
            blacklisted_tags: vec!["script".to_string()],
            class_name: None,
            components: ComponentRegistry::new(),
            components_only: false,
            disable_fragments: false,
            disable_key_generation: false,
            render_in_wrapper: true,
            show_warnings: false,
            max_depth: DEFAULT_MAX_DEPTH,
            on_error: None,
            render_error: None,
            render_unrecognized: None,
        }
    }
}

impl InterpretOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    pub fn with_component(mut self, path: &str, component: ComponentRef) -> Self {
        self.components.register(path, component);
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&(dyn std::error::Error + 'static)) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn render_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.render_error = Some(Arc::new(callback));
        self
    }

    pub fn render_unrecognized<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.render_unrecognized = Some(Arc::new(callback));
        self
    }

    /// `jsx-parser` plus the configured extra class
    pub fn wrapper_class(&self) -> String {
        match self.class_name.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("{} {}", WRAPPER_CLASS, extra),
            _ => WRAPPER_CLASS.to_string(),
        }
    }
}

impl fmt::Debug for InterpretOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpretOptions")
            .field("allow_unknown_elements", &self.allow_unknown_elements)
            .field("auto_close_void_elements", &self.auto_close_void_elements)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("blacklisted_attrs", &self.blacklisted_attrs)
            .field("blacklisted_tags", &self.blacklisted_tags)
            .field("class_name", &self.class_name)
            .field("components", &self.components)
            .field("components_only", &self.components_only)
            .field("disable_fragments", &self.disable_fragments)
            .field("disable_key_generation", &self.disable_key_generation)
            .field("render_in_wrapper", &self.render_in_wrapper)
            .field("show_warnings", &self.show_warnings)
            .field("max_depth", &self.max_depth)
            .field("on_error", &self.on_error.is_some())
            .field("render_error", &self.render_error.is_some())
            .field("render_unrecognized", &self.render_unrecognized.is_some())
            .finish()
    }
}
