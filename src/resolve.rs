//! Path resolution for the config file and the mail directory.
//!
//! Config file:
//!   1. MAILTASK_CONFIG environment variable
//!   2. mailtask.toml in cwd
//!   3. .mailtask.toml in cwd
//!
//! Mail directory:
//!   1. --maildir flag
//!   2. MAILTASK_MAILDIR environment variable
//!   3. `maildir` key of the config
//!   4. maildir/ in cwd

use std::path::{Path, PathBuf};

use crate::config::MailtaskConfig;

pub const CONFIG_ENV: &str = "MAILTASK_CONFIG";
pub const MAILDIR_ENV: &str = "MAILTASK_MAILDIR";

/// Return the config file to load, if one exists.
pub fn config_file() -> Option<PathBuf> {
    if let Ok(env) = std::env::var(CONFIG_ENV) {
        if !env.is_empty() {
            return Some(expand_tilde(&env));
        }
    }
    ["mailtask.toml", ".mailtask.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Return the mail repository root.
pub fn maildir(flag: Option<&Path>, config: &MailtaskConfig) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Ok(env) = std::env::var(MAILDIR_ENV) {
        if !env.is_empty() {
            return expand_tilde(&env);
        }
    }
    if let Some(dir) = config.maildir.as_deref() {
        if !dir.is_empty() {
            return expand_tilde(dir);
        }
    }
    PathBuf::from("maildir")
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand ~ to home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
