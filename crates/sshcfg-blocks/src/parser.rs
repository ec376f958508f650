//! SSH config parsing with recursive `Include` resolution.
//!
//! The parser is deliberately permissive: files that are missing, unreadable
//! or not UTF-8 contribute no blocks instead of failing the whole parse, so a
//! broken `Include` never hides the rest of the configuration.
//!
//! Block boundaries follow the client's own rule: a block starts at a `Host`
//! line and runs until the next `Host` or `Match` line. `Match` blocks are
//! recognised but not evaluated; their options are dropped.

use crate::error::{Error, Result};
use crate::model::{HostBlock, ParsedConfig};
use sshcfg_fs::{absolutize, io, resolve_relative};
use sshcfg_meta::{COLOR_KEY, TAGS_KEY, decode_comment, decode_tag_definition, decode_tags};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Splits a config line into its keyword and the rest.
///
/// Accepts both `Key value` and `Key=value` (with optional spaces around
/// `=`). The keyword keeps its case; callers compare case-insensitively.
pub(crate) fn split_directive(line: &str) -> (&str, &str) {
    let line = line.trim();
    let end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    let (keyword, rest) = line.split_at(end);
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    (keyword, rest)
}

/// Drops a trailing `#` comment. There is no escaping: every `#` starts one.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Whether a raw line is a `Host` or `Match` directive that opens a new
/// block scope.
pub(crate) fn is_block_start(line: &str) -> bool {
    let code = strip_comment(line);
    let (keyword, _) = split_directive(code);
    keyword.eq_ignore_ascii_case("host") || keyword.eq_ignore_ascii_case("match")
}

/// Parser state for one top-level parse call.
///
/// The visited set lives here, so every call starts fresh and a file is read
/// at most once per call no matter how often it is included.
#[derive(Debug, Default)]
pub struct ConfigParser {
    visited: HashSet<PathBuf>,
    result: ParsedConfig,
}

/// Metadata comments seen since the last non-comment line.
#[derive(Debug, Default)]
struct PendingMetadata {
    tags: Vec<String>,
    color: Option<String>,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the entrypoints left to right, following includes depth-first.
    pub fn parse<P: AsRef<Path>>(mut self, entrypoints: &[P]) -> ParsedConfig {
        for entrypoint in entrypoints {
            self.parse_file(entrypoint.as_ref());
        }
        self.result
    }

    /// Parses in-memory text as if it were the content of `source_file`.
    ///
    /// Relative `Include` arguments resolve against `source_file`'s
    /// directory.
    pub fn parse_str(mut self, content: &str, source_file: &Path) -> ParsedConfig {
        let source = absolutize(source_file);
        self.visited.insert(source.clone());
        self.result.files.push(source.clone());
        self.parse_content(content, &source);
        self.result
    }

    fn parse_file(&mut self, path: &Path) {
        let key = absolutize(path);
        if !self.visited.insert(key.clone()) {
            tracing::debug!(path = %key.display(), "already parsed, skipping");
            return;
        }

        let content = match io::read_text(&key) {
            Ok(content) => content,
            Err(err) => {
                if err.is_not_found() {
                    tracing::debug!(path = %key.display(), "config file not found, skipping");
                } else {
                    tracing::warn!(path = %key.display(), error = %err, "could not read config file, skipping");
                }
                return;
            }
        };

        self.result.files.push(key.clone());
        self.parse_content(&content, &key);
    }

    fn parse_content(&mut self, content: &str, source: &Path) {
        let base_dir = source.parent().map(Path::to_path_buf);
        let mut current: Option<usize> = None;
        let mut pending = PendingMetadata::default();

        for (idx, raw) in content.lines().enumerate() {
            let lineno = idx + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with('#') {
                self.collect_metadata(trimmed, source, &mut pending);
                continue;
            }

            let code = strip_comment(trimmed).trim();
            if code.is_empty() {
                pending = PendingMetadata::default();
                continue;
            }

            let (keyword, rest) = split_directive(code);
            let metadata = std::mem::take(&mut pending);

            match keyword.to_ascii_lowercase().as_str() {
                "include" => {
                    for argument in rest.split_whitespace() {
                        match expand_include(argument, base_dir.as_deref()) {
                            Ok(files) => {
                                for file in files {
                                    self.parse_file(&file);
                                }
                            }
                            Err(err) => {
                                tracing::warn!(file = %source.display(), line = lineno, error = %err, "skipping include");
                            }
                        }
                    }
                }
                "match" => {
                    current = None;
                }
                "host" => {
                    let patterns: Vec<String> =
                        rest.split_whitespace().map(str::to_string).collect();
                    if patterns.is_empty() {
                        tracing::debug!(file = %source.display(), line = lineno, "Host line without patterns");
                        current = None;
                        continue;
                    }
                    let mut block = HostBlock::new(patterns, source, lineno);
                    for tag in metadata.tags {
                        block.add_tag(tag);
                    }
                    block.color = metadata.color;
                    self.result.blocks.push(block);
                    current = Some(self.result.blocks.len() - 1);
                }
                _ => {
                    if rest.is_empty() {
                        continue;
                    }
                    if let Some(index) = current {
                        let value = rest.split_whitespace().collect::<Vec<_>>().join(" ");
                        self.result.blocks[index].set_option(keyword, value);
                    }
                }
            }
        }
    }

    fn collect_metadata(&mut self, line: &str, source: &Path, pending: &mut PendingMetadata) {
        if let Some((name, color)) = decode_tag_definition(line) {
            self.result
                .tag_definitions
                .entry(source.to_path_buf())
                .or_default()
                .insert(name, color);
            // A definition ends the metadata run above the next `Host`.
            *pending = PendingMetadata::default();
            return;
        }
        if let Some((key, value)) = decode_comment(line) {
            if key == TAGS_KEY {
                pending.tags = decode_tags(&value);
            } else if key == COLOR_KEY && !value.is_empty() {
                pending.color = Some(value);
            }
        }
    }
}

/// Expands one `Include` argument to the regular files it names, sorted.
pub fn expand_include(pattern: &str, base_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let resolved = resolve_relative(pattern, base_dir);
    let pattern_str = resolved.to_string_lossy();

    let entries = glob::glob(&pattern_str).map_err(|e| Error::InvalidPattern {
        pattern: pattern_str.to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable include candidate");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        tracing::debug!(pattern = %pattern_str, "include matched no files");
    }
    Ok(files)
}

/// Parses the entrypoints and returns the full result, including tag
/// definitions.
///
/// # Example
/// ```no_run
/// use sshcfg_blocks::parse_config;
///
/// let parsed = parse_config(&["/home/me/.ssh/config"]);
/// for block in &parsed.blocks {
///     println!("{} ({})", block.display_name(), block.location());
/// }
/// ```
pub fn parse_config<P: AsRef<Path>>(entrypoints: &[P]) -> ParsedConfig {
    ConfigParser::new().parse(entrypoints)
}

/// Parses the entrypoints and returns only the host blocks.
pub fn parse_config_files<P: AsRef<Path>>(entrypoints: &[P]) -> Vec<HostBlock> {
    parse_config(entrypoints).into_blocks()
}

/// Parses in-memory text attributed to `source_file`.
///
/// # Example
/// ```
/// use sshcfg_blocks::parse_str;
/// use std::path::Path;
///
/// let parsed = parse_str("Host foo\n    User alice\n", Path::new("/tmp/config"));
/// assert_eq!(parsed.blocks[0].option("user"), Some("alice"));
/// ```
pub fn parse_str(content: &str, source_file: &Path) -> ParsedConfig {
    ConfigParser::new().parse_str(content, source_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ParsedConfig {
        parse_str(content, Path::new("/nonexistent/ssh/config"))
    }

    #[test]
    fn test_split_directive_forms() {
        assert_eq!(split_directive("HostName example.com"), ("HostName", "example.com"));
        assert_eq!(split_directive("Port=22"), ("Port", "22"));
        assert_eq!(split_directive("Port = 22"), ("Port", "22"));
        assert_eq!(split_directive("Host"), ("Host", ""));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("User bob # admin"), "User bob ");
        assert_eq!(strip_comment("User bob"), "User bob");
    }

    #[test]
    fn test_is_block_start() {
        assert!(is_block_start("Host foo"));
        assert!(is_block_start("  match host foo"));
        assert!(is_block_start("HOST=foo"));
        assert!(!is_block_start("HostName foo"));
        assert!(!is_block_start("# Host foo"));
    }

    #[test]
    fn test_options_before_first_host_are_ignored() {
        let parsed = parse("User root\nHost foo\n    Port 2222\n");
        assert_eq!(parsed.blocks.len(), 1);
        assert_eq!(parsed.blocks[0].options, vec![("Port".to_string(), "2222".to_string())]);
    }

    #[test]
    fn test_match_closes_previous_block() {
        let parsed = parse("Host foo\n    User a\nMatch host bar\n    User b\n");
        assert_eq!(parsed.blocks.len(), 1);
        assert_eq!(parsed.blocks[0].option("User"), Some("a"));
    }

    #[test]
    fn test_blank_line_detaches_metadata() {
        let parsed = parse("# @tags: prod\n\nHost foo\n");
        assert!(parsed.blocks[0].tags.is_empty());
    }

    #[test]
    fn test_plain_comment_keeps_metadata_attached() {
        let parsed = parse("# @tags: prod\n# the web box\nHost foo\n");
        assert!(parsed.blocks[0].has_tag("prod"));
    }

    #[test]
    fn test_value_whitespace_is_normalized() {
        let parsed = parse("Host foo\n    ProxyCommand   ssh  -W %h:%p   jump\n");
        assert_eq!(parsed.blocks[0].option("proxycommand"), Some("ssh -W %h:%p jump"));
    }
}
