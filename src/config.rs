//! mailtask.toml: corpus location and resolution tunables.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::descriptor::ResolveOptions;
use crate::error::ConfigError;
use crate::resolve;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MailtaskConfig {
    /// Mail repository root.
    #[serde(default)]
    pub maildir: Option<String>,
    #[serde(default)]
    pub resolve: ResolveOptions,
}

impl MailtaskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.resolve.some_unread_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Invalid(format!(
                "some_unread_probability must be within [0, 1], got {}",
                p
            )));
        }
        Ok(())
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<MailtaskConfig> {
    let config: MailtaskConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly named config file, or the resolved one when present.
///
/// An explicit path must exist; a missing resolved file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<MailtaskConfig> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match resolve::config_file() {
            Some(p) => p,
            None => return Ok(MailtaskConfig::default()),
        },
    };
    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.maildir, None);
        assert_eq!(config.resolve.recipient_limit, 5);
        assert_eq!(config.resolve.some_unread_probability, 0.2);
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            "maildir = \"~/enron/maildir\"\n\n[resolve]\nrecipient_limit = 3\nsome_unread_probability = 0.5\n",
        )
        .unwrap();
        assert_eq!(config.maildir.as_deref(), Some("~/enron/maildir"));
        assert_eq!(config.resolve.recipient_limit, 3);
        assert_eq!(config.resolve.some_unread_probability, 0.5);
    }

    #[test]
    fn test_partial_resolve_table_keeps_defaults() {
        let config = parse_config("[resolve]\nrecipient_limit = 2\n").unwrap();
        assert_eq!(config.resolve.some_unread_probability, 0.2);
    }

    #[test]
    fn test_probability_out_of_range() {
        let err = parse_config("[resolve]\nsome_unread_probability = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("some_unread_probability"));
    }

    #[test]
    fn test_explicit_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/mailtask.toml"))).is_err());
    }
}
