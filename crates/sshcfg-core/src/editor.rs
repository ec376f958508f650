//! File-level host block editing.
//!
//! [`ConfigEditor`] wraps the pure text operations of `sshcfg_blocks::writer`
//! with the file handling around them: precondition checks, an optional
//! backup of the target, and an atomic write. Every operation returns the
//! path of the backup it took, if any.

use crate::backup::BackupManager;
use crate::config::EditorConfig;
use crate::{Error, Result};
use sshcfg_blocks::{
    HostBlock, append_block, format_block_with_metadata, remove_block,
    replace_block_with_metadata, replace_tag_definitions,
};
use sshcfg_fs::{absolutize, expand_tilde, io};
use sshcfg_meta::TagDefinitions;
use std::fs;
use std::path::{Path, PathBuf};

/// Applies block mutations to config files on disk.
#[derive(Debug, Clone, Default)]
pub struct ConfigEditor {
    config: EditorConfig,
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Backup manager for `target`, using this editor's backup settings.
    pub fn backups_for(&self, target: &Path) -> BackupManager {
        BackupManager::with_config(target, &self.config.backups)
    }

    /// Replace `block` in `target`, keeping its tags and color.
    ///
    /// # Errors
    /// `NotFound` when `target` does not exist, `StaleBlock` when `block`
    /// was parsed from another file, and `Blocks(NotAHostLine)` when the
    /// file changed since `block` was parsed.
    pub fn replace(
        &self,
        target: &Path,
        block: &HostBlock,
        patterns: &[String],
        options: &[(String, String)],
    ) -> Result<Option<PathBuf>> {
        self.replace_with_metadata(
            target,
            block,
            patterns,
            options,
            block.tags.as_slice(),
            block.color.as_deref(),
        )
    }

    /// Replace `block` and its metadata comments in `target`.
    pub fn replace_with_metadata(
        &self,
        target: &Path,
        block: &HostBlock,
        patterns: &[String],
        options: &[(String, String)],
        tags: &[String],
        color: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let target = self.check_block(target, block)?;
        let content = io::read_text(&target)?;

        let replacement = format_block_with_metadata(patterns, options, tags, color);
        let updated = replace_block_with_metadata(&content, block.lineno, &replacement)?;

        let backup = self.backup_if_needed(&target)?;
        io::write_text(&target, &updated)?;
        tracing::info!(file = %target.display(), line = block.lineno, host = %block.display_name(), "replaced host block");
        Ok(backup)
    }

    /// Remove `block` and its metadata comments from `target`.
    pub fn remove(&self, target: &Path, block: &HostBlock) -> Result<Option<PathBuf>> {
        self.remove_many(target, &[block])
    }

    /// Remove several blocks of one file with a single backup and write.
    ///
    /// Blocks are removed bottom-up so the line numbers of the remaining
    /// ones stay valid.
    pub fn remove_many(&self, target: &Path, blocks: &[&HostBlock]) -> Result<Option<PathBuf>> {
        let mut resolved = None;
        for block in blocks {
            resolved = Some(self.check_block(target, block)?);
        }
        let Some(target) = resolved else {
            return Ok(None);
        };

        let mut linenos: Vec<usize> = blocks.iter().map(|block| block.lineno).collect();
        linenos.sort_unstable_by(|a, b| b.cmp(a));
        linenos.dedup();

        let mut content = io::read_text(&target)?;
        for lineno in &linenos {
            content = remove_block(&content, *lineno)?;
        }

        let backup = self.backup_if_needed(&target)?;
        io::write_text(&target, &content)?;
        tracing::info!(file = %target.display(), count = linenos.len(), "removed host blocks");
        Ok(backup)
    }

    /// Append a new block to `target`, creating the file if needed.
    pub fn append(
        &self,
        target: &Path,
        patterns: &[String],
        options: &[(String, String)],
    ) -> Result<Option<PathBuf>> {
        self.append_with_metadata(target, patterns, options, &[], None)
    }

    /// Append a new block with tags and color to `target`.
    pub fn append_with_metadata(
        &self,
        target: &Path,
        patterns: &[String],
        options: &[(String, String)],
        tags: &[String],
        color: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let target = expand_tilde(&target.to_string_lossy());
        let content = read_or_empty(&target)?;

        let block_text = format_block_with_metadata(patterns, options, tags, color);
        let updated = append_block(&content, &block_text);

        let backup = self.backup_if_needed(&target)?;
        io::write_text(&target, &updated)?;
        tracing::info!(file = %target.display(), host = %patterns.join(" "), "appended host block");
        Ok(backup)
    }

    /// Rewrite the `# @tagdef` lines of `target`.
    pub fn set_tag_definitions(
        &self,
        target: &Path,
        definitions: &TagDefinitions,
    ) -> Result<Option<PathBuf>> {
        let target = expand_tilde(&target.to_string_lossy());
        let content = read_or_empty(&target)?;
        let updated = replace_tag_definitions(&content, definitions);
        if updated == content {
            tracing::debug!(file = %target.display(), "tag definitions unchanged");
            return Ok(None);
        }

        let backup = self.backup_if_needed(&target)?;
        io::write_text(&target, &updated)?;
        tracing::info!(file = %target.display(), count = definitions.len(), "updated tag definitions");
        Ok(backup)
    }

    /// Checks that `target` exists and that `block` came from it. Returns
    /// the expanded target path.
    fn check_block(&self, target: &Path, block: &HostBlock) -> Result<PathBuf> {
        let target = expand_tilde(&target.to_string_lossy());
        if !target.is_file() {
            return Err(Error::NotFound { path: target });
        }
        if absolutize(&block.source_file) != absolutize(&target) {
            return Err(Error::StaleBlock {
                block: block.display_name(),
                source_file: block.source_file.clone(),
                target,
            });
        }
        Ok(target)
    }

    fn backup_if_needed(&self, target: &Path) -> Result<Option<PathBuf>> {
        if !self.config.backups.enabled {
            return Ok(None);
        }
        match fs::metadata(target) {
            Ok(metadata) if metadata.is_file() && metadata.len() > 0 => {
                Ok(Some(self.backups_for(target).backup()?))
            }
            _ => Ok(None),
        }
    }
}

fn read_or_empty(path: &Path) -> Result<String> {
    match io::read_text(path) {
        Ok(content) => Ok(content),
        Err(err) if err.is_not_found() => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}
