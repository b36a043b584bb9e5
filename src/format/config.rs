//! Formatting configuration
//!
//! Width and tab size come from the editor's settings: the first ruler is
//! the width, and anything missing silently falls back to the defaults.

use serde::{Deserialize, Serialize};

/// Width used when no ruler is configured
pub const DEFAULT_WIDTH: usize = 80;

/// Tab size used when none is configured
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Parameter name that marks a parameter without a real name
pub const UNNAMED_PLACEHOLDER: &str = "<unnamed>";

/// What to do with `@param <unnamed>` entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnnamedParams {
    /// Remove them from the output and from column alignment
    #[default]
    Drop,
    /// Format them like any other parameter
    Keep,
}

/// Read-only settings for one formatting request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Target line width in columns (at least 1)
    pub width: usize,
    /// Columns per tab stop (at least 1)
    pub tab_size: usize,
    /// Placeholder parameter policy
    pub unnamed_params: UnnamedParams,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            tab_size: DEFAULT_TAB_SIZE,
            unnamed_params: UnnamedParams::default(),
        }
    }
}

/// Settings as stored by the editor
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    rulers: Option<Vec<usize>>,
    #[serde(default)]
    tab_size: Option<usize>,
    #[serde(default)]
    unnamed_params: UnnamedParams,
}

impl FormatConfig {
    /// Create a config with the given width and tab size
    pub fn new(width: usize, tab_size: usize) -> Self {
        Self::default().with_width(width).with_tab_size(tab_size)
    }

    /// Set the line width
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Set the tab size
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Set the placeholder parameter policy
    pub fn with_unnamed_params(mut self, policy: UnnamedParams) -> Self {
        self.unnamed_params = policy;
        self
    }

    /// Build from editor settings
    ///
    /// The width is the first ruler; no rulers means [`DEFAULT_WIDTH`].
    pub fn from_settings(rulers: Option<&[usize]>, tab_size: Option<usize>) -> Self {
        let width = rulers
            .and_then(|rulers| rulers.first().copied())
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(width, tab_size.unwrap_or(DEFAULT_TAB_SIZE))
    }

    /// Build from a JSON settings object with optional `rulers`,
    /// `tab_size` and `unnamed_params` keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Ok(Self::from_settings(raw.rulers.as_deref(), raw.tab_size)
            .with_unnamed_params(raw.unnamed_params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.width, 80);
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.unnamed_params, UnnamedParams::Drop);
    }

    #[test]
    fn test_values_are_clamped() {
        let config = FormatConfig::new(0, 0);
        assert_eq!(config.width, 1);
        assert_eq!(config.tab_size, 1);
    }

    #[test]
    fn test_from_settings_uses_first_ruler() {
        let config = FormatConfig::from_settings(Some(&[100, 120]), Some(2));
        assert_eq!(config.width, 100);
        assert_eq!(config.tab_size, 2);
    }

    #[test]
    fn test_from_settings_defaults() {
        assert_eq!(FormatConfig::from_settings(Some(&[]), None).width, 80);
        assert_eq!(FormatConfig::from_settings(None, None), FormatConfig::default());
    }

    #[test]
    fn test_from_json() {
        let config =
            FormatConfig::from_json(r#"{"rulers": [72], "tab_size": 8, "unnamed_params": "keep"}"#)
                .unwrap();
        assert_eq!(config.width, 72);
        assert_eq!(config.tab_size, 8);
        assert_eq!(config.unnamed_params, UnnamedParams::Keep);

        let config = FormatConfig::from_json("{}").unwrap();
        assert_eq!(config, FormatConfig::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(FormatConfig::from_json(r#"{"rulers": "wide"}"#).is_err());
    }
}
