//! Host metadata for the SSH config manager.
//!
//! Metadata lives in ordinary SSH config comments so that `ssh` itself
//! ignores it:
//!
//! ```text
//! # @tagdef prod red
//! # @tagdef staging
//!
//! # @tags: prod, web
//! # @color: orange
//! Host web1
//!     HostName web1.example.com
//! ```
//!
//! `@tags` and `@color` apply to the `Host` line that follows them.
//! `@tagdef` lines declare the tags a file may use, with an optional color,
//! and may appear anywhere in the file.
//!
//! This crate only converts between comment lines and values. It knows
//! nothing about block boundaries.

pub mod codec;
pub mod tags;

pub use codec::{
    decode_comment, decode_tag_definition, decode_tags, encode_color, encode_metadata,
    encode_tag_definitions, encode_tags, is_block_metadata, is_tag_definition,
};
pub use tags::{TagDefinitions, TagSet, same_tag, tag_key};

/// Metadata key carrying a comma-separated tag list.
pub const TAGS_KEY: &str = "tags";

/// Metadata key carrying a per-host color.
pub const COLOR_KEY: &str = "color";
