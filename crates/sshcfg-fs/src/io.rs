//! Atomic I/O operations with file locking

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_LINK_DEPTH: usize = 40;

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a crash never leaves a truncated
/// config behind. Acquires an advisory lock on the temp file while writing.
/// Permissions of an existing target are carried over to the new file.
///
/// A symlinked `path` is written through: the file it points to receives
/// the content and the link itself is kept. The temp file is removed when
/// any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let resolved = resolve_link(path);
    let path = resolved.as_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let written = write_temp(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path)
            && cleanup.kind() != ErrorKind::NotFound
        {
            tracing::warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temp file");
        }
        return Err(err);
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file atomically");
    Ok(())
}

fn write_temp(temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(temp_path, existing.permissions())
            .map_err(|e| Error::io(temp_path, e))?;
    }

    temp_file
        .unlock()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })
}

/// The file a symlink chain ends at, or `path` itself when it is not a link.
///
/// A dangling link resolves to its (possibly relative) target so the write
/// creates the file the link names.
fn resolve_link(path: &Path) -> PathBuf {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_DEPTH {
        let is_link = fs::symlink_metadata(&current)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            return current;
        }
        match fs::read_link(&current) {
            Ok(target) if target.is_absolute() => current = target,
            Ok(target) => {
                current = match current.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                }
            }
            Err(_) => return current,
        }
    }
    current
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
