//! Backup manager implementation
//!
//! Handles creating, listing, restoring, and pruning timestamped copies of
//! one config file.

use super::stamp::{now_stamp, parse_stamp_at};
use crate::config::BackupConfig;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sshcfg_fs::{expand_tilde, io, sibling_dir};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One backup file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Full path of the backup file
    pub path: PathBuf,
    /// File name suffix after `<name>.backup.`
    pub stamp: String,
    /// Parsed stamp, when it is a valid `YYYYMMDDHHMMSS` stamp
    pub timestamp: Option<DateTime<Utc>>,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, used to order entries without a timestamp
    pub modified: Option<SystemTime>,
}

impl BackupEntry {
    /// Ordering key: the parsed stamp, else the file's mtime.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
            .or_else(|| self.modified.map(DateTime::<Utc>::from))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether `selector` names this entry by stamp, file name, or path.
    pub fn matches(&self, selector: &str) -> bool {
        self.stamp == selector
            || self.file_name() == selector
            || self.path.to_string_lossy() == selector
    }
}

/// First entry matching `selector`, in the order given.
pub fn select<'a>(selector: &str, entries: &'a [BackupEntry]) -> Option<&'a BackupEntry> {
    entries.iter().find(|entry| entry.matches(selector))
}

/// What a restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Backup the target was restored from
    pub restored_from: PathBuf,
    /// File that was overwritten
    pub target: PathBuf,
    /// Backup of the target taken just before restoring, if any
    pub previous: Option<PathBuf>,
}

/// Which backups a prune should select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOptions {
    /// Keep the newest `keep` backups, select the rest
    pub keep: Option<usize>,
    /// Select backups whose stamp is strictly before this instant
    pub before: Option<DateTime<Utc>>,
    /// Report the selection without deleting anything
    pub dry_run: bool,
}

/// Result of a prune.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Selected backups, sorted by path
    pub selected: Vec<PathBuf>,
    /// Backups actually deleted
    pub removed: Vec<PathBuf>,
    /// Backups that could not be deleted, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Manages the backups of one config file.
///
/// Backups live in a directory next to the target (`backups` by default)
/// and are named `<name>.backup.<YYYYMMDDHHMMSS>`.
#[derive(Debug, Clone)]
pub struct BackupManager {
    target: PathBuf,
    backup_dir: PathBuf,
    config: BackupConfig,
}

impl BackupManager {
    /// Create a manager for `target` with default settings
    pub fn new(target: impl AsRef<Path>) -> Self {
        Self::with_config(target, &BackupConfig::default())
    }

    /// Create a manager for `target` with explicit settings
    pub fn with_config(target: impl AsRef<Path>, config: &BackupConfig) -> Self {
        let target = expand_tilde(&target.as_ref().to_string_lossy());
        let backup_dir = sibling_dir(&target, &config.directory);
        Self {
            target,
            backup_dir,
            config: config.clone(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn prefix(&self) -> String {
        let name = self
            .target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}.backup.", name)
    }

    /// Copy the target into the backup directory under a fresh stamp.
    ///
    /// A backup taken in the same second as an earlier one overwrites it.
    pub fn backup(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| sshcfg_fs::Error::io(&self.backup_dir, e))?;

        let dest = self.backup_dir.join(format!("{}{}", self.prefix(), now_stamp()));
        fs::copy(&self.target, &dest).map_err(|e| sshcfg_fs::Error::io(&self.target, e))?;

        tracing::info!(file = %self.target.display(), backup = %dest.display(), "created backup");
        Ok(dest)
    }

    /// List backups of the target, newest first.
    pub fn discover(&self) -> Result<Vec<BackupEntry>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = self.prefix();
        let now = Utc::now();
        let mut entries = Vec::new();

        let dir = fs::read_dir(&self.backup_dir).map_err(|e| sshcfg_fs::Error::io(&self.backup_dir, e))?;
        for entry in dir {
            let path = entry?.path();
            let Some(stamp) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix(prefix.as_str()))
                .map(str::to_string)
            else {
                continue;
            };

            // Follows symlinks, as the copy on restore would.
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            entries.push(BackupEntry {
                timestamp: parse_stamp_at(&stamp, self.config.future_skew_minutes, now),
                path,
                stamp,
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }

        entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()).then_with(|| b.path.cmp(&a.path)));
        tracing::debug!(file = %self.target.display(), count = entries.len(), "discovered backups");
        Ok(entries)
    }

    /// Restore the target from the newest backup matching `selector`,
    /// honouring the configured `backup_before_restore`.
    pub fn restore_default(&self, selector: &str) -> Result<RestoreOutcome> {
        self.restore(selector, self.config.backup_before_restore)
    }

    /// Restore the target from the newest backup matching `selector`.
    ///
    /// With `backup_current`, an existing target is backed up first. The
    /// selected backup is read before that, so a same-second backup cannot
    /// clobber the content being restored.
    ///
    /// # Errors
    /// `BackupNotFound` when no backup matches `selector`.
    pub fn restore(&self, selector: &str, backup_current: bool) -> Result<RestoreOutcome> {
        let entries = self.discover()?;
        let entry = select(selector, &entries).ok_or_else(|| Error::BackupNotFound {
            selector: selector.to_string(),
            target: self.target.clone(),
        })?;

        let content = fs::read(&entry.path).map_err(|e| sshcfg_fs::Error::io(&entry.path, e))?;

        let previous = if backup_current && self.target.is_file() {
            Some(self.backup()?)
        } else {
            None
        };

        io::write_atomic(&self.target, &content)?;
        tracing::info!(
            file = %self.target.display(),
            backup = %entry.path.display(),
            "restored config from backup"
        );

        Ok(RestoreOutcome {
            restored_from: entry.path.clone(),
            target: self.target.clone(),
            previous,
        })
    }

    /// Delete old backups by count, by age, or both.
    ///
    /// The selection is the union of everything past the newest `keep`
    /// entries and every entry stamped before `before`. Entries whose stamp
    /// cannot be parsed are never selected by `before`. Failures to delete
    /// one file are reported and do not stop the others.
    ///
    /// # Errors
    /// `InvalidPrune` when neither `keep` nor `before` is set.
    pub fn prune(&self, options: &PruneOptions) -> Result<PruneReport> {
        if options.keep.is_none() && options.before.is_none() {
            return Err(Error::InvalidPrune);
        }

        let entries = self.discover()?;
        let mut selected: BTreeSet<PathBuf> = BTreeSet::new();

        if let Some(keep) = options.keep {
            selected.extend(entries.iter().skip(keep).map(|entry| entry.path.clone()));
        }
        if let Some(cutoff) = options.before {
            selected.extend(
                entries
                    .iter()
                    .filter(|entry| entry.timestamp.is_some_and(|ts| ts < cutoff))
                    .map(|entry| entry.path.clone()),
            );
        }

        let mut report = PruneReport {
            selected: selected.into_iter().collect(),
            ..PruneReport::default()
        };

        if options.dry_run {
            tracing::info!(count = report.selected.len(), "dry run, nothing deleted");
            return Ok(report);
        }

        delete_selected(&mut report);
        tracing::info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "pruned backups"
        );
        Ok(report)
    }
}

/// Deletes every selected file, recording each outcome. A failure on one
/// file does not stop the rest.
fn delete_selected(report: &mut PruneReport) {
    for path in &report.selected {
        match fs::remove_file(path) {
            Ok(()) => report.removed.push(path.clone()),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to delete backup");
                report.failed.push((path.clone(), err.to_string()));
            }
        }
    }
}
