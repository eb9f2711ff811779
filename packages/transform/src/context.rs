use serde::Deserialize;

/// Options for the rewrite pass
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteOptions {
    /// Tag every element is renamed to
    pub canonical_tag: String,
    /// Original tag that needs no identity attribute
    pub generic_tag: String,
    /// Attribute recording the original tag name
    pub identity_attribute: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            canonical_tag: "Box".to_string(),
            generic_tag: "div".to_string(),
            identity_attribute: "as".to_string(),
        }
    }
}

/// Counters collected while rewriting, reported once per program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub elements_renamed: usize,
    pub class_attributes_expanded: usize,
    pub directives_emitted: usize,
    pub tokens_dropped: usize,
    pub dynamic_class_attributes: usize,
}
