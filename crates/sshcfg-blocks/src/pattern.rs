//! Host pattern matching and ranking.
//!
//! Patterns use shell-style wildcards: `*` matches any run of characters and
//! `?` exactly one. Matching is a plain, case-sensitive string glob against
//! the query; nothing is resolved through DNS. Patterns prefixed with `!`
//! exclude: a block whose negated pattern matches the query does not match
//! at all, as with the SSH client.
//!
//! Ranking prefers, in order: literal patterns over wildcard ones, fewer
//! wildcard characters, longer patterns, and finally earlier declaration.

use crate::error::{Error, Result};
use crate::model::HostBlock;

/// Ranking key of one pattern against a query. Higher is better; fields
/// compare lexicographically in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchScore {
    /// 1 for a pattern without wildcards, else 0.
    pub literal: u8,
    /// 0 for literal patterns, minus the wildcard count otherwise.
    pub wildcard_penalty: i64,
    /// Pattern length in characters.
    pub length: i64,
    /// Minus the block's position in parse order.
    pub declaration: i64,
}

impl MatchScore {
    /// The score without the declaration tie-break.
    pub fn specificity(&self) -> (u8, i64, i64) {
        (self.literal, self.wildcard_penalty, self.length)
    }
}

fn is_wildcard(c: char) -> bool {
    c == '*' || c == '?'
}

/// Whether the pattern contains `*` or `?`.
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.chars().any(is_wildcard)
}

/// Shell-style glob match, case-sensitive.
///
/// ```
/// use sshcfg_blocks::pattern::glob_match;
///
/// assert!(glob_match("web1.example.com", "web*.example.com"));
/// assert!(glob_match("db1", "db?"));
/// assert!(!glob_match("Foo", "foo"));
/// ```
pub fn glob_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    // Position of the last `*` and the text index it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if let Some((star, absorbed)) = backtrack {
            p = star + 1;
            t = absorbed + 1;
            backtrack = Some((star, absorbed + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Scores `pattern` against `query` for a block at parse position `index`.
///
/// Returns `None` when the pattern does not match. Negated patterns never
/// score; see [`best_score`].
pub fn score_pattern(query: &str, pattern: &str, index: usize) -> Option<MatchScore> {
    if pattern.starts_with('!') || !glob_match(query, pattern) {
        return None;
    }

    let wildcards = pattern.chars().filter(|&c| is_wildcard(c)).count() as i64;
    Some(MatchScore {
        literal: u8::from(wildcards == 0),
        wildcard_penalty: -wildcards,
        length: pattern.chars().count() as i64,
        declaration: -(index as i64),
    })
}

/// Best score among a block's patterns, or `None` if none match or a
/// negated pattern excludes the query.
pub fn best_score(query: &str, block: &HostBlock, index: usize) -> Option<MatchScore> {
    let excluded = block
        .patterns
        .iter()
        .filter_map(|pattern| pattern.strip_prefix('!'))
        .any(|negated| glob_match(query, negated));
    if excluded {
        return None;
    }

    block
        .patterns
        .iter()
        .filter_map(|pattern| score_pattern(query, pattern, index))
        .max()
}

/// Result of ranking blocks against a query.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    query: String,
    primary: Vec<&'a HostBlock>,
    all: Vec<&'a HostBlock>,
}

impl<'a> Ranking<'a> {
    /// Blocks tied for the most specific match, in parse order.
    pub fn primary(&self) -> &[&'a HostBlock] {
        &self.primary
    }

    /// Every matching block, in parse order.
    pub fn all(&self) -> &[&'a HostBlock] {
        &self.all
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.primary.len() > 1
    }

    /// The top block, breaking specificity ties by declaration order
    /// (first match wins). Suitable for read-only lookups.
    pub fn best(&self) -> Option<&'a HostBlock> {
        self.primary.first().copied()
    }

    /// The single target for a mutating operation.
    ///
    /// # Errors
    /// `NoMatch` when nothing matched, `AmbiguousMatch` listing every tied
    /// candidate with its location when more than one block ties.
    pub fn single(&self) -> Result<&'a HostBlock> {
        match self.primary.as_slice() {
            [] => Err(Error::NoMatch {
                query: self.query.clone(),
            }),
            [block] => Ok(*block),
            candidates => Err(ambiguous(&self.query, candidates)),
        }
    }

    /// Like [`Ranking::single`] but over every matching block, for callers
    /// that refuse to act whenever more than one block matches at all.
    pub fn single_any(&self) -> Result<&'a HostBlock> {
        match self.all.as_slice() {
            [] => Err(Error::NoMatch {
                query: self.query.clone(),
            }),
            [block] => Ok(*block),
            candidates => Err(ambiguous(&self.query, candidates)),
        }
    }
}

fn ambiguous(query: &str, candidates: &[&HostBlock]) -> Error {
    Error::AmbiguousMatch {
        query: query.to_string(),
        candidates: candidates
            .iter()
            .map(|block| format!("{} ({})", block.display_name(), block.location()))
            .collect(),
    }
}

/// Ranks `blocks` (in parse order) against `query`.
///
/// # Example
/// ```
/// use sshcfg_blocks::{HostBlock, pattern::rank};
///
/// let blocks = vec![
///     HostBlock::new(vec!["*.example.com".into()], "/tmp/config", 1),
///     HostBlock::new(vec!["web.example.com".into()], "/tmp/config", 4),
/// ];
/// let ranking = rank("web.example.com", &blocks);
/// assert_eq!(ranking.all().len(), 2);
/// assert_eq!(ranking.single().unwrap().lineno, 4);
/// ```
pub fn rank<'a>(query: &str, blocks: &'a [HostBlock]) -> Ranking<'a> {
    let scored: Vec<(MatchScore, &'a HostBlock)> = blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| best_score(query, block, index).map(|score| (score, block)))
        .collect();

    let top = scored.iter().map(|(score, _)| score.specificity()).max();
    let primary = match top {
        Some(top) => scored
            .iter()
            .filter(|(score, _)| score.specificity() == top)
            .map(|(_, block)| *block)
            .collect(),
        None => Vec::new(),
    };

    Ranking {
        query: query.to_string(),
        primary,
        all: scored.into_iter().map(|(_, block)| block).collect(),
    }
}

/// Blocks that literally declare `pattern` among their patterns.
pub fn find_exact<'a>(pattern: &str, blocks: &'a [HostBlock]) -> Vec<&'a HostBlock> {
    blocks
        .iter()
        .filter(|block| block.patterns.iter().any(|p| p == pattern))
        .collect()
}
