//! Editing layer for the SSH config manager
//!
//! This crate turns the pure parsing and text operations of the lower
//! crates into safe edits of files on disk:
//!
//! - **Editing**: replace, remove, and append host blocks with precondition
//!   checks, a backup, and an atomic write ([`ConfigEditor`])
//! - **Backups**: timestamped copies with discovery, restore, and pruning
//!   ([`BackupManager`])
//! - **Tags**: tag assignment against per-file tag definitions ([`tags`])
//! - **Sources**: default entrypoint discovery ([`sources`])
//!
//! # Architecture
//!
//! ```text
//!              front-ends (CLI / UI)
//!                        |
//!                   sshcfg-core
//!                        |
//!         +--------------+-------------+
//!         |              |             |
//!     sshcfg-fs    sshcfg-blocks   sshcfg-meta
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sshcfg_core::{ConfigEditor, Result};
//! use sshcfg_blocks::{parse_config_files, rank};
//! use std::path::Path;
//!
//! fn set_user(config: &Path, host: &str, user: &str) -> Result<()> {
//!     let blocks = parse_config_files(&[config]);
//!     let block = rank(host, &blocks).single()?.clone();
//!
//!     let mut options = block.options.clone();
//!     options.retain(|(key, _)| !key.eq_ignore_ascii_case("user"));
//!     options.push(("User".to_string(), user.to_string()));
//!
//!     ConfigEditor::new().replace(&block.source_file, &block, &block.patterns, &options)?;
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod sources;
pub mod tags;

pub use backup::{BackupEntry, BackupManager, PruneOptions, PruneReport, RestoreOutcome};
pub use config::{BackupConfig, EditorConfig};
pub use editor::ConfigEditor;
pub use error::{Error, Result};
pub use sources::{default_config_path, discover_config_files};
pub use tags::{add_tags, hosts_with_tag, remove_tags, set_tag_color, tag_counts};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_not_found_displays_path() {
        let error = Error::NotFound {
            path: PathBuf::from("/home/u/.ssh/config"),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/home/u/.ssh/config"),
            "Error display should contain the path, got: {}",
            display
        );
    }

    #[test]
    fn error_undefined_tags_lists_every_tag() {
        let error = Error::UndefinedTags {
            tags: vec!["prod".to_string(), "lab".to_string()],
            path: PathBuf::from("/c"),
        };
        assert_eq!(error.to_string(), "Tags not defined in /c: prod, lab");
    }
}
