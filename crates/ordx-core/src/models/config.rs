//! Configuration structures for order extraction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OrdxError, Result};

/// Environment variable overriding [`EmailConfig::subject_filter`].
pub const ENV_SUBJECT_FILTER: &str = "ORDX_SUBJECT_FILTER";
/// Environment variable overriding [`EmailConfig::order_url_template`].
pub const ENV_ORDER_URL_TEMPLATE: &str = "ORDX_ORDER_URL_TEMPLATE";
/// Environment variable overriding [`OutputConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "ORDX_OUTPUT_DIR";

/// Main configuration for ordx.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Notification email configuration.
    pub email: EmailConfig,

    /// Output file configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters after the "Payment method" heading searched for card details.
    pub payment_window: usize,

    /// Log a warning when an order resolves to a zero total.
    pub warn_on_zero_total: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            payment_window: 500,
            warn_on_zero_total: true,
        }
    }
}

/// Notification email configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Only messages whose subject equals this text, ignoring case and
    /// surrounding whitespace, are scanned for links. Empty matches every
    /// message.
    pub subject_filter: String,

    /// Order page URL, with `{order_no}` replaced by the order number.
    pub order_url_template: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            subject_filter: "Your Walmart order was delivered".to_string(),
            order_url_template: "https://www.walmart.ca/en/orders/{order_no}".to_string(),
        }
    }
}

/// Output file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving per-order files.
    pub output_dir: PathBuf,

    /// Also write a copy of the source page next to each summary.
    pub write_html: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            write_html: false,
        }
    }
}

impl OrdxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| OrdxError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| OrdxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `ORDX_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_blank(ENV_SUBJECT_FILTER) {
            self.email.subject_filter = value;
        }
        if let Some(value) = non_blank(ENV_ORDER_URL_TEMPLATE) {
            self.email.order_url_template = value;
        }
        if let Some(value) = non_blank(ENV_OUTPUT_DIR) {
            self.output.output_dir = PathBuf::from(value);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: OrdxConfig =
            serde_json::from_str(r#"{"extraction": {"payment_window": 200}}"#).unwrap();
        assert_eq!(config.extraction.payment_window, 200);
        assert!(config.extraction.warn_on_zero_total);
        assert_eq!(config.email, EmailConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = OrdxConfig::default().with_overrides(|key| match key {
            ENV_OUTPUT_DIR => Some("/tmp/orders".to_string()),
            ENV_SUBJECT_FILTER => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.output.output_dir, PathBuf::from("/tmp/orders"));
        assert_eq!(
            config.email.subject_filter,
            EmailConfig::default().subject_filter
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = OrdxConfig::default();
        config.output.write_html = true;
        config.save(&path).unwrap();

        assert_eq!(OrdxConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = OrdxConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, OrdxError::Config(_)));
        assert!(err.to_string().starts_with("configuration error: "));

        let missing = OrdxConfig::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, OrdxError::Io(_)));
    }
}
