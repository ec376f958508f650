//! Parsed host blocks and parse results.

use sshcfg_meta::{TagDefinitions, TagSet};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One `Host` stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    /// Patterns as declared after `Host`, in order.
    pub patterns: Vec<String>,
    /// Options in first-seen order. Keys keep their first spelling and
    /// compare case-insensitively; a redeclared key overwrites the value.
    pub options: Vec<(String, String)>,
    /// File the block is declared in (never the including file).
    pub source_file: PathBuf,
    /// 1-based line number of the `Host` line in `source_file`.
    pub lineno: usize,
    /// Tags from a `# @tags:` comment above the `Host` line.
    pub tags: TagSet,
    /// Color from a `# @color:` comment above the `Host` line.
    pub color: Option<String>,
}

impl HostBlock {
    pub fn new(patterns: Vec<String>, source_file: impl Into<PathBuf>, lineno: usize) -> Self {
        Self {
            patterns,
            options: Vec::new(),
            source_file: source_file.into(),
            lineno,
            tags: TagSet::new(),
            color: None,
        }
    }

    /// Patterns joined by a space, as written on the `Host` line.
    pub fn display_name(&self) -> String {
        self.patterns.join(" ")
    }

    /// `path:line` of the `Host` line.
    pub fn location(&self) -> String {
        format!("{}:{}", self.source_file.display(), self.lineno)
    }

    /// Value of an option, looked up case-insensitively.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Sets an option in place, or appends it when absent.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .options
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.options.push((key, value)),
        }
    }

    /// Removes an option. Returns whether it was present.
    pub fn remove_option(&mut self, key: &str) -> bool {
        let before = self.options.len();
        self.options
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
        self.options.len() != before
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the block was declared in `path`.
    pub fn is_from(&self, path: &Path) -> bool {
        self.source_file == path
    }
}

/// Everything one parse pass produced.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
    /// Blocks in `Host`-line order, depth-first across includes.
    pub blocks: Vec<HostBlock>,
    /// `# @tagdef` declarations, per source file.
    pub tag_definitions: BTreeMap<PathBuf, TagDefinitions>,
    /// Every file that was read, in the order it was read.
    pub files: Vec<PathBuf>,
}

impl ParsedConfig {
    /// Tag definitions declared in `path`; empty when it declares none.
    pub fn tag_definitions_for(&self, path: &Path) -> TagDefinitions {
        self.tag_definitions.get(path).cloned().unwrap_or_default()
    }

    /// Blocks declared directly in `path`.
    pub fn blocks_in<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a HostBlock> + 'a {
        self.blocks.iter().filter(move |block| block.is_from(path))
    }

    pub fn into_blocks(self) -> Vec<HostBlock> {
        self.blocks
    }
}
