//! Default config entrypoints.

use sshcfg_blocks::expand_include;
use sshcfg_fs::expand_tilde;
use std::path::PathBuf;

/// System-wide and per-user client configs, in parse order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["/etc/ssh/ssh_config", "~/.ssh/config"];

/// Searched only when none of [`DEFAULT_CONFIG_PATHS`] exist.
pub const DEFAULT_INCLUDE_FALLBACKS: &[&str] = &["~/.ssh/config.d/*.conf"];

/// The per-user config, `~/.ssh/config`.
pub fn default_config_path() -> PathBuf {
    expand_tilde("~/.ssh/config")
}

/// Entrypoints to parse when the caller names none.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_from(DEFAULT_CONFIG_PATHS, DEFAULT_INCLUDE_FALLBACKS)
}

/// Existing files among `paths`; the expansion of `fallbacks` when there
/// are none.
pub fn discover_from(paths: &[&str], fallbacks: &[&str]) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = paths
        .iter()
        .map(|path| expand_tilde(path))
        .filter(|path| path.is_file())
        .collect();
    if !files.is_empty() {
        return files;
    }

    let mut found = Vec::new();
    for pattern in fallbacks {
        match expand_include(pattern, None) {
            Ok(matches) => found.extend(matches),
            Err(err) => tracing::warn!(pattern = %pattern, error = %err, "skipping fallback pattern"),
        }
    }
    tracing::debug!(count = found.len(), "using fallback config files");
    found
}
