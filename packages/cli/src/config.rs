use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tailbox_evaluator::InterpretOptions;
use tailbox_transform::RewriteOptions;
use tailbox_utility::Theme;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "tailbox.config.json";

/// Tailbox configuration file format
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Options for `tailbox interpret`
    #[serde(default)]
    pub interpreter: InterpretOptions,

    /// Options for `tailbox rewrite`
    #[serde(default)]
    pub rewrite: RewriteOptions,

    /// Replaces the default breakpoint table when present
    #[serde(default)]
    pub theme: Option<Theme>,

    /// Where rewritten files go unless `--stdout` is given
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// File extensions picked up when rewriting a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["jsx".to_string(), "tsx".to_string(), "html".to_string()]
}

impl Config {
    /// Load `tailbox.config.json` from a directory, or defaults if absent
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        Self::load_file(&cwd.join(DEFAULT_CONFIG_NAME), false)
    }

    /// Load an explicit config path; a missing file is an error only when
    /// `required` is set
    pub fn load_file(path: &Path, required: bool) -> anyhow::Result<Self> {
        if !path.exists() {
            if required {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: InterpretOptions::default(),
            rewrite: RewriteOptions::default(),
            theme: None,
            out_dir: default_out_dir(),
            extensions: default_extensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "interpreter": {
                "componentsOnly": true,
                "blacklistedTags": ["script", "iframe"],
                "bindings": { "title": "Hello" }
            },
            "rewrite": { "canonicalTag": "View" },
            "theme": {
                "separator": "_",
                "screens": [{ "name": "tablet", "minWidth": "640px" }]
            },
            "outDir": "build",
            "extensions": ["jsx"]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.interpreter.components_only);
        assert_eq!(config.interpreter.blacklisted_tags, vec!["script", "iframe"]);
        assert!(config.interpreter.bindings.contains_key("title"));
        assert_eq!(config.rewrite.canonical_tag, "View");
        assert_eq!(config.rewrite.generic_tag, "div");

        let theme = config.theme.unwrap();
        assert_eq!(theme.separator, "_");
        assert!(theme.is_breakpoint("tablet"));
        assert_eq!(config.out_dir, "build");
        assert_eq!(config.extensions, vec!["jsx"]);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.interpreter.allow_unknown_elements);
        assert!(config.theme.is_none());
        assert_eq!(config.out_dir, "dist");
        assert!(config.matches_extension(Path::new("card.tsx")));
        assert!(!config.matches_extension(Path::new("notes.md")));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.rewrite, RewriteOptions::default());
        assert_eq!(config.extensions, vec!["jsx", "tsx", "html"]);
    }
}
