//! Encoding and decoding of metadata comment lines.
//!
//! Two shapes are recognised:
//! ```text
//! # @<key>: <value>
//! # @tagdef <name> [color]
//! ```
//! Anything else, including comments that only look similar, decodes to
//! `None`. Malformed metadata is never an error.

use crate::tags::TagDefinitions;
use crate::{COLOR_KEY, TAGS_KEY};
use regex::Regex;
use std::sync::LazyLock;

/// `# @key: value`. The key is a bare identifier, the value runs to end of line.
static KEY_VALUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*@([A-Za-z][A-Za-z0-9_-]*)\s*:(.*)$").expect("Invalid metadata regex")
});

/// `# @tagdef NAME [COLOR]`.
static TAGDEF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*@(?i:tagdef)\s+(\S+)(?:\s+(\S+))?\s*$").expect("Invalid tagdef regex")
});

/// Decodes a `# @key: value` comment.
///
/// The key is lower-cased and the value trimmed.
///
/// # Example
/// ```
/// use sshcfg_meta::decode_comment;
///
/// assert_eq!(
///     decode_comment("# @Tags: prod, web"),
///     Some(("tags".to_string(), "prod, web".to_string()))
/// );
/// assert_eq!(decode_comment("# plain comment"), None);
/// assert_eq!(decode_comment("HostName example.com"), None);
/// ```
pub fn decode_comment(line: &str) -> Option<(String, String)> {
    let caps = KEY_VALUE_REGEX.captures(line.trim())?;
    let key = caps.get(1)?.as_str().to_lowercase();
    let value = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    Some((key, value))
}

/// Splits a comma-separated tag list, trimming each entry and dropping
/// empty ones.
pub fn decode_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encodes a tag list as a `# @tags:` comment, or `None` when there are no tags.
pub fn encode_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let joined = tags.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    Some(format!("# @{}: {}", TAGS_KEY, joined))
}

/// Encodes a host color as a `# @color:` comment, or `None` when empty.
pub fn encode_color(color: Option<&str>) -> Option<String> {
    match color.map(str::trim) {
        Some(color) if !color.is_empty() => Some(format!("# @{}: {}", COLOR_KEY, color)),
        _ => None,
    }
}

/// All metadata lines to write above a `Host` line, tags first.
pub fn encode_metadata<S: AsRef<str>>(tags: &[S], color: Option<&str>) -> Vec<String> {
    encode_tags(tags)
        .into_iter()
        .chain(encode_color(color))
        .collect()
}

/// Whether the line is block-scoped metadata (`@tags` or `@color`).
pub fn is_block_metadata(line: &str) -> bool {
    matches!(decode_comment(line), Some((key, _)) if key == TAGS_KEY || key == COLOR_KEY)
}

/// Decodes a `# @tagdef NAME [COLOR]` line. A missing color is `""`.
///
/// # Example
/// ```
/// use sshcfg_meta::decode_tag_definition;
///
/// assert_eq!(
///     decode_tag_definition("# @tagdef prod #ff0000"),
///     Some(("prod".to_string(), "#ff0000".to_string()))
/// );
/// assert_eq!(
///     decode_tag_definition("# @tagdef staging"),
///     Some(("staging".to_string(), String::new()))
/// );
/// ```
pub fn decode_tag_definition(line: &str) -> Option<(String, String)> {
    let caps = TAGDEF_REGEX.captures(line.trim())?;
    let name = caps.get(1)?.as_str().to_string();
    let color = caps.get(2).map_or("", |m| m.as_str()).to_string();
    Some((name, color))
}

/// Whether the line is a `# @tagdef` declaration.
pub fn is_tag_definition(line: &str) -> bool {
    decode_tag_definition(line).is_some()
}

/// Encodes tag definitions sorted by name, case-insensitively.
pub fn encode_tag_definitions(definitions: &TagDefinitions) -> Vec<String> {
    let mut entries: Vec<(&str, &str)> = definitions.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
    entries
        .into_iter()
        .map(|(name, color)| {
            if color.is_empty() {
                format!("# @tagdef {}", name)
            } else {
                format!("# @tagdef {} {}", name, color)
            }
        })
        .collect()
}
