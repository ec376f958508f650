//! Host block parsing, matching, and writing for the SSH config manager.
//!
//! Three layers, leaf first:
//!
//! - [`parser`]: reads an entrypoint and everything it `Include`s into an
//!   ordered list of [`HostBlock`]s with tags, colors, and per-file tag
//!   definitions attached.
//! - [`pattern`]: scores queries against host patterns and picks the block
//!   an operation should act on.
//! - [`writer`]: rewrites the text of one block in place, leaving the rest
//!   of the file untouched.
//!
//! Nothing here writes to disk; file-level editing with backups lives in
//! `sshcfg-core`.
//!
//! ```text
//! # @tags: prod
//! Host web web.internal          <- HostBlock { lineno: 2, .. }
//!     HostName 10.0.0.5
//!     User deploy
//!
//! Include config.d/*.conf        <- parsed depth-first, in place
//!
//! Host *.example.com
//!     User ops
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod pattern;
pub mod writer;

pub use error::{Error, Result};
pub use model::{HostBlock, ParsedConfig};
pub use parser::{ConfigParser, expand_include, parse_config, parse_config_files, parse_str};
pub use pattern::{MatchScore, Ranking, best_score, find_exact, glob_match, rank, score_pattern};
pub use writer::{
    append_block, block_range, format_block, format_block_with_metadata, remove_block,
    replace_block, replace_block_with_metadata, replace_tag_definitions,
};
