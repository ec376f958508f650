//! SSH config fixtures shared by the workspace's tests.
//!
//! Every fixture writes into a caller-owned directory (normally a
//! `tempfile::TempDir`) so tests never touch the real `~/.ssh`.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Paths of the two-file sample configuration.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Directory holding both files (`<root>/ssh`).
    pub ssh_dir: PathBuf,
    /// Entrypoint: `Host foo` followed by `Include extra.conf`.
    pub config: PathBuf,
    /// Included file: `Host *.example.com`.
    pub include: PathBuf,
}

/// Entrypoint content of [`sample_config`].
pub const SAMPLE_CONFIG: &str = "\
Host foo
    HostName foo.example.com
    User alice

Include extra.conf
";

/// Included file content of [`sample_config`].
pub const SAMPLE_INCLUDE: &str = "\
Host *.example.com
    User wildcard
";

/// Writes `content` to `dir/name`, creating parent directories.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_config: failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("write_config: failed to write {}: {e}", path.display()));
    path
}

/// Creates `<root>/ssh/config` including `<root>/ssh/extra.conf`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn sample_config(root: &Path) -> SampleConfig {
    let ssh_dir = root.join("ssh");
    let config = write_config(&ssh_dir, "config", SAMPLE_CONFIG);
    let include = write_config(&ssh_dir, "extra.conf", SAMPLE_INCLUDE);
    SampleConfig {
        ssh_dir,
        config,
        include,
    }
}

/// A fresh temp dir with a single config file, returned with its path.
///
/// # Panics
/// Panics if the temp dir cannot be created or the file cannot be written.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap_or_else(|e| panic!("temp_config: failed to create temp dir: {e}"));
    let path = write_config(temp.path(), "config", content);
    (temp, path)
}

/// Writes `content` to `<target name>.backup.<stamp>` in the
/// `backups` directory next to `target`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_backup(target: &Path, stamp: &str, content: &str) -> PathBuf {
    let dir = target
        .parent()
        .unwrap_or_else(|| panic!("fake_backup: {} has no parent", target.display()))
        .join("backups");
    let name = target
        .file_name()
        .unwrap_or_else(|| panic!("fake_backup: {} has no file name", target.display()))
        .to_string_lossy();
    write_config(&dir, &format!("{name}.backup.{stamp}"), content)
}
