//! Error types for sshcfg-core

use std::path::PathBuf;

/// Result type for sshcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sshcfg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Target config file does not exist
    #[error("Config file {path} does not exist")]
    NotFound { path: PathBuf },

    /// Block was parsed from a different file than the one being edited
    #[error("Block '{block}' belongs to {source_file}, not {target}")]
    StaleBlock {
        block: String,
        source_file: PathBuf,
        target: PathBuf,
    },

    /// No backup matched the selector
    #[error("Backup '{selector}' not found for {target}")]
    BackupNotFound { selector: String, target: PathBuf },

    /// Prune was asked to select nothing
    #[error("Prune needs a keep count, a cutoff stamp, or both")]
    InvalidPrune,

    /// Stamp is not in `YYYYMMDDHHMMSS` form
    #[error("Invalid backup stamp '{stamp}': expected YYYYMMDDHHMMSS")]
    InvalidStamp { stamp: String },

    /// Tags used on a host without a `# @tagdef` in its file
    #[error("Tags not defined in {path}: {}", tags.join(", "))]
    UndefinedTags { tags: Vec<String>, path: PathBuf },

    /// Invalid editor configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from sshcfg-fs
    #[error(transparent)]
    Fs(#[from] sshcfg_fs::Error),

    /// Block error from sshcfg-blocks
    #[error(transparent)]
    Blocks(#[from] sshcfg_blocks::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
