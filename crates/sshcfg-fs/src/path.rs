//! Path expansion for SSH config files
//!
//! SSH config paths use `~` for the home directory and resolve relative
//! `Include` arguments against the directory of the including file.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// Paths without a leading tilde, and `~user` forms, are returned unchanged.
/// If no home directory can be determined the input is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Resolve an `Include` argument.
///
/// Arguments starting with `~` or `/` are taken as they are (after tilde
/// expansion). Anything else is joined onto `base_dir`, the directory of the
/// file holding the `Include` line.
pub fn resolve_relative(pattern: &str, base_dir: Option<&Path>) -> PathBuf {
    if pattern.starts_with('~') || pattern.starts_with('/') {
        return expand_tilde(pattern);
    }
    match base_dir {
        Some(base) => base.join(pattern),
        None => PathBuf::from(pattern),
    }
}

/// Fully resolve a path for identity comparison.
///
/// Uses `canonicalize` so that symlinks and `..` segments collapse to one
/// key. Falls back to a lexically absolute path when the file cannot be
/// canonicalized (for example because it does not exist yet).
pub fn absolutize(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// A directory named `name` next to `path`.
///
/// `sibling_dir("/home/u/.ssh/config", "backups")` is `/home/u/.ssh/backups`.
pub fn sibling_dir(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_plain_path_unchanged() {
        assert_eq!(expand_tilde("/etc/ssh/ssh_config"), PathBuf::from("/etc/ssh/ssh_config"));
        assert_eq!(expand_tilde("config.d/*.conf"), PathBuf::from("config.d/*.conf"));
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/.ssh/config"), home.join(".ssh/config"));
            assert_eq!(expand_tilde("~"), home);
        }
    }

    #[test]
    fn test_sibling_dir_relative_file() {
        assert_eq!(sibling_dir(Path::new("config"), "backups"), PathBuf::from("backups"));
    }
}
