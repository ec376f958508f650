//! Editor settings loaded from TOML.
//!
//! ```toml
//! [backups]
//! enabled = true
//! directory = "backups"
//! backup_before_restore = true
//! future_skew_minutes = 5
//! ```
//!
//! Every key is optional; unknown keys are rejected so typos surface early.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sshcfg_fs::io;
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_directory() -> String {
    "backups".to_string()
}

fn default_future_skew() -> i64 {
    5
}

/// Backup behaviour for mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Take a backup of a non-empty target before every mutation
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Name of the backup directory, created next to the target
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Back up the current file before restoring an older one
    #[serde(default = "default_true")]
    pub backup_before_restore: bool,

    /// How far (in minutes) a stamp may lie in the future before it is
    /// reinterpreted as local time
    #[serde(default = "default_future_skew")]
    pub future_skew_minutes: i64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            directory: default_directory(),
            backup_before_restore: default_true(),
            future_skew_minutes: default_future_skew(),
        }
    }
}

/// Top-level editor settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    #[serde(default)]
    pub backups: BackupConfig,
}

impl EditorConfig {
    /// Parse settings from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use sshcfg_core::config::EditorConfig;
    ///
    /// let config = EditorConfig::from_toml_str(r#"
    /// [backups]
    /// enabled = false
    /// "#).unwrap();
    ///
    /// assert!(!config.backups.enabled);
    /// assert_eq!(config.backups.directory, "backups");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EditorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match io::read_text(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %path.display(), "no editor config, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn validate(&self) -> Result<()> {
        let dir = self.backups.directory.as_str();
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains(['/', '\\']) {
            return Err(Error::Config {
                message: format!("backups.directory must be a plain directory name, got '{}'", dir),
            });
        }
        if self.backups.future_skew_minutes < 0 {
            return Err(Error::Config {
                message: "backups.future_skew_minutes must be zero or greater".to_string(),
            });
        }
        Ok(())
    }
}
