//! Tag assignment and tag definitions.
//!
//! A tag can only be put on a host once the host's file declares it with a
//! `# @tagdef NAME [COLOR]` line. Assigned tags take the declared spelling.

use crate::editor::ConfigEditor;
use crate::{Error, Result};
use sshcfg_blocks::{HostBlock, ParsedConfig, parse_config};
use sshcfg_fs::expand_tilde;
use sshcfg_meta::tag_key;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Add `tags` to `block` and rewrite it in its source file.
///
/// # Errors
/// `UndefinedTags` listing every tag the block's file does not declare.
/// Nothing is written in that case.
pub fn add_tags<S: AsRef<str>>(
    editor: &ConfigEditor,
    parsed: &ParsedConfig,
    block: &HostBlock,
    tags: &[S],
) -> Result<Option<PathBuf>> {
    let definitions = parsed.tag_definitions_for(&block.source_file);

    let missing: Vec<String> = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|tag| !definitions.contains(tag))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(Error::UndefinedTags {
            tags: missing,
            path: block.source_file.clone(),
        });
    }

    let mut updated = block.clone();
    for tag in tags {
        let tag = tag.as_ref();
        updated.add_tag(definitions.canonical(tag).unwrap_or(tag));
    }
    rewrite_tags(editor, block, &updated)
}

/// Remove `tags` (case-insensitively) from `block` and rewrite it.
pub fn remove_tags<S: AsRef<str>>(
    editor: &ConfigEditor,
    block: &HostBlock,
    tags: &[S],
) -> Result<Option<PathBuf>> {
    let mut updated = block.clone();
    for tag in tags {
        updated.remove_tag(tag.as_ref());
    }
    rewrite_tags(editor, block, &updated)
}

fn rewrite_tags(
    editor: &ConfigEditor,
    original: &HostBlock,
    updated: &HostBlock,
) -> Result<Option<PathBuf>> {
    editor.replace_with_metadata(
        &original.source_file,
        original,
        &updated.patterns,
        &updated.options,
        updated.tags.as_slice(),
        updated.color.as_deref(),
    )
}

/// Define `tag` with `color` in `target`, or update its color.
///
/// An existing definition keeps its spelling.
pub fn set_tag_color(
    editor: &ConfigEditor,
    target: &Path,
    tag: &str,
    color: &str,
) -> Result<Option<PathBuf>> {
    let target = expand_tilde(&target.to_string_lossy());
    let parsed = parse_config(&[&target]);
    let key = parsed
        .files
        .first()
        .cloned()
        .unwrap_or_else(|| sshcfg_fs::absolutize(&target));

    let mut definitions = parsed.tag_definitions_for(&key);
    definitions.insert(tag, color);
    editor.set_tag_definitions(&target, &definitions)
}

/// Number of hosts carrying each tag.
///
/// Spellings differing only in case count as one tag, reported under the
/// first spelling seen.
pub fn tag_counts(blocks: &[HostBlock]) -> BTreeMap<String, usize> {
    let mut grouped: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for block in blocks {
        for tag in &block.tags {
            grouped
                .entry(tag_key(tag))
                .or_insert_with(|| (tag.to_string(), 0))
                .1 += 1;
        }
    }
    grouped.into_values().collect()
}

/// Hosts tagged with `tag`, compared case-insensitively.
pub fn hosts_with_tag<'a>(blocks: &'a [HostBlock], tag: &str) -> Vec<&'a HostBlock> {
    blocks.iter().filter(|block| block.has_tag(tag)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(name: &str, tags: &[&str]) -> HostBlock {
        let mut block = HostBlock::new(vec![name.to_string()], "/tmp/config", 1);
        for tag in tags {
            block.add_tag(*tag);
        }
        block
    }

    #[test]
    fn test_tag_counts() {
        let blocks = vec![tagged("a", &["prod", "web"]), tagged("b", &["prod"]), tagged("c", &[])];
        let counts = tag_counts(&blocks);
        assert_eq!(counts.get("prod"), Some(&2));
        assert_eq!(counts.get("web"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_tag_counts_merge_case_variants_under_first_spelling() {
        let blocks = vec![tagged("a", &["Prod"]), tagged("b", &["prod"]), tagged("c", &["PROD", "web"])];
        let counts = tag_counts(&blocks);
        assert_eq!(counts.get("Prod"), Some(&3));
        assert_eq!(counts.get("prod"), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_hosts_with_tag_ignores_case() {
        let blocks = vec![tagged("a", &["Prod"]), tagged("b", &["lab"])];
        let hosts: Vec<String> = hosts_with_tag(&blocks, "prod")
            .iter()
            .map(|b| b.display_name())
            .collect();
        assert_eq!(hosts, vec!["a"]);
    }
}
