//! Host block writing for SSH config text.
//!
//! Pure functions over file content. Block extents are detected with the
//! same rule the parser uses to close blocks, so a rewrite always touches
//! exactly the lines a parse attributed to the block:
//!
//! - the extent starts at the block's `Host` line;
//! - it ends before the next `Host`/`Match` line, or at end of file;
//! - trailing blank lines, and metadata comments that belong to the next
//!   block, are left outside the extent.
//!
//! Metadata-aware variants additionally cover the `# @tags:`/`# @color:`
//! comments directly above the `Host` line.
//!
//! `Include` lines nested in a block are not options, so replacements carry
//! them over after the new options. Removal drops them with the block.

use crate::error::{Error, Result};
use crate::parser::{is_block_start, split_directive, strip_comment};
use sshcfg_meta::{TagDefinitions, encode_metadata, encode_tag_definitions, is_block_metadata, is_tag_definition};
use std::ops::Range;

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Formats a `Host` line and its indented options, newline-terminated.
///
/// # Example
/// ```
/// use sshcfg_blocks::writer::format_block;
///
/// let text = format_block(
///     &["web".to_string()],
///     &[("HostName".to_string(), "web.example.com".to_string())],
/// );
/// assert_eq!(text, "Host web\n    HostName web.example.com\n");
/// ```
pub fn format_block(patterns: &[String], options: &[(String, String)]) -> String {
    let mut out = format!("Host {}\n", patterns.join(" "));
    for (key, value) in options {
        out.push_str(&format!("    {} {}\n", key, value));
    }
    out
}

/// Formats a block preceded by its encoded metadata comments.
pub fn format_block_with_metadata(
    patterns: &[String],
    options: &[(String, String)],
    tags: &[String],
    color: Option<&str>,
) -> String {
    let mut out = String::new();
    for line in encode_metadata(tags, color) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format_block(patterns, options));
    out
}

/// Line index range of the block whose `Host` line is `lineno` (1-based).
///
/// # Errors
/// `LineOutOfRange` when `lineno` is 0 or past the end, `NotAHostLine`
/// when the line is not a `Host` directive (the block is stale).
pub fn block_range(lines: &[&str], lineno: usize) -> Result<Range<usize>> {
    if lineno == 0 || lineno > lines.len() {
        return Err(Error::LineOutOfRange {
            lineno,
            total: lines.len(),
        });
    }

    let start = lineno - 1;
    let (keyword, _) = split_directive(strip_comment(lines[start]));
    if is_comment(lines[start]) || !keyword.eq_ignore_ascii_case("host") {
        return Err(Error::NotAHostLine {
            lineno,
            line: lines[start].to_string(),
        });
    }

    let mut end = start + 1;
    while end < lines.len() {
        let line = lines[end];
        if !is_blank(line) && !is_comment(line) && is_block_start(line) {
            break;
        }
        end += 1;
    }

    // Metadata of the following block belongs to it, not to this one.
    if end < lines.len() {
        end = metadata_start(lines, end).max(start + 1);
    }

    while end > start + 1 && is_blank(lines[end - 1]) {
        end -= 1;
    }

    Ok(start..end)
}

/// First line of the metadata attached to the `Host` line at index `start`.
///
/// Walks back over the contiguous comment run above `start` and returns the
/// index of its earliest `@tags`/`@color` line, or `start` when the run
/// carries no block metadata. A `@tagdef` line ends the run, as it does for
/// the parser.
pub fn metadata_start(lines: &[&str], start: usize) -> usize {
    let mut first = start;
    let mut idx = start;
    while idx > 0 {
        let line = lines[idx - 1];
        if !is_comment(line) || is_tag_definition(line) {
            break;
        }
        idx -= 1;
        if is_block_metadata(line) {
            first = idx;
        }
    }
    first
}

fn join_lines(lines: &[&str]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn is_include(line: &str) -> bool {
    let (keyword, _) = split_directive(strip_comment(line));
    !is_comment(line) && keyword.eq_ignore_ascii_case("include")
}

fn with_nested_includes(replacement: &str, extent: &[&str]) -> String {
    let mut out = replacement.trim_end_matches('\n').to_string();
    for line in extent.iter().filter(|line| is_include(line)) {
        out.push('\n');
        out.push_str(line);
    }
    out
}

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..range.start]);
    out.extend(replacement.lines());
    out.extend_from_slice(&lines[range.end..]);
    join_lines(&out)
}

/// Replaces the block at `lineno` with `replacement`.
///
/// Metadata comments above the `Host` line are left as they are.
pub fn replace_block(content: &str, lineno: usize, replacement: &str) -> Result<String> {
    let lines: Vec<&str> = content.lines().collect();
    let range = block_range(&lines, lineno)?;
    let replacement = with_nested_includes(replacement, &lines[range.clone()]);
    Ok(splice(content, range, &replacement))
}

/// Replaces the block at `lineno` together with the metadata comments above
/// it. `replacement` is expected to carry the new metadata, if any.
pub fn replace_block_with_metadata(content: &str, lineno: usize, replacement: &str) -> Result<String> {
    let lines: Vec<&str> = content.lines().collect();
    let range = block_range(&lines, lineno)?;
    let start = metadata_start(&lines, range.start);
    let replacement = with_nested_includes(replacement, &lines[range.clone()]);
    Ok(splice(content, start..range.end, &replacement))
}

/// Removes the block at `lineno` and its metadata comments.
///
/// Blank lines left dangling at the removal point are dropped, so no double
/// blank line remains and the file does not end in a blank line.
///
/// # Example
/// ```
/// use sshcfg_blocks::writer::remove_block;
///
/// let content = "Host a\n    User x\n\nHost b\n    User y\n\nHost c\n";
/// let result = remove_block(content, 4).unwrap();
/// assert_eq!(result, "Host a\n    User x\n\nHost c\n");
/// ```
pub fn remove_block(content: &str, lineno: usize) -> Result<String> {
    let mut lines: Vec<&str> = content.lines().collect();
    let range = block_range(&lines, lineno)?;
    let start = metadata_start(&lines, range.start);

    lines.drain(start..range.end);

    while start < lines.len() && is_blank(lines[start]) {
        lines.remove(start);
    }
    if start == lines.len() {
        while lines.last().is_some_and(|line| is_blank(line)) {
            lines.pop();
        }
    }

    Ok(join_lines(&lines))
}

/// Appends a block at the end of `content`.
///
/// Existing content is separated from the new block by exactly one blank
/// line. The result ends with a single newline. Only trailing blank lines
/// of `content` are dropped; its last line is kept as written.
pub fn append_block(content: &str, block_text: &str) -> String {
    let block = block_text.trim_end_matches('\n');
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
    if lines.is_empty() {
        format!("{}\n", block)
    } else {
        format!("{}\n\n{}\n", lines.join("\n"), block)
    }
}

/// Rewrites the `# @tagdef` lines of a file.
///
/// Existing declarations are dropped wherever they are; the new ones are
/// written, sorted, at the top of the file and separated from the rest by a
/// blank line.
pub fn replace_tag_definitions(content: &str, definitions: &TagDefinitions) -> String {
    let kept: Vec<&str> = content
        .lines()
        .filter(|line| !is_tag_definition(line))
        .collect();
    let leading_blanks = kept.iter().take_while(|line| is_blank(line)).count();
    let body = &kept[leading_blanks..];

    let header = encode_tag_definitions(definitions);
    let mut lines: Vec<&str> = header.iter().map(String::as_str).collect();
    if !lines.is_empty() && !body.is_empty() {
        lines.push("");
    }
    lines.extend_from_slice(body);
    join_lines(&lines)
}
