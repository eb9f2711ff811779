use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static THEME: OnceCell<Theme> = OnceCell::new();

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Theme already initialized; it cannot be replaced after first use")]
    AlreadyInitialized,

    #[error("Theme separator must not be empty")]
    EmptySeparator,
}

/// A named responsive-width threshold (`md` → `768px`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub name: String,
    pub min_width: String,
}

impl Screen {
    pub fn new(name: impl Into<String>, min_width: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_width: min_width.into(),
        }
    }
}

/// Theme table consulted by the token parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Variant separator (`md:flex`)
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Breakpoints, smallest first
    #[serde(default = "default_screens")]
    pub screens: Vec<Screen>,
}

fn default_separator() -> String {
    ":".to_string()
}

fn default_screens() -> Vec<Screen> {
    vec![
        Screen::new("sm", "640px"),
        Screen::new("md", "768px"),
        Screen::new("lg", "1024px"),
        Screen::new("xl", "1280px"),
        Screen::new("2xl", "1536px"),
    ]
}

impl Theme {
    pub fn is_breakpoint(&self, name: &str) -> bool {
        self.screens.iter().any(|screen| screen.name == name)
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|screen| screen.name == name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            screens: default_screens(),
        }
    }
}

/// Install the process-wide theme. Must run before the first [`theme`] read;
/// afterwards the table is frozen.
pub fn init_theme(theme: Theme) -> Result<&'static Theme, ThemeError> {
    if theme.separator.is_empty() {
        return Err(ThemeError::EmptySeparator);
    }

    let mut installed = false;
    let current = THEME.get_or_init(|| {
        installed = true;
        theme
    });

    if installed {
        Ok(current)
    } else {
        Err(ThemeError::AlreadyInitialized)
    }
}

/// The process-wide theme, falling back to the default table if nobody
/// called [`init_theme`].
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
