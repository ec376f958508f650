//! Error types for sshcfg-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Line {lineno} is out of range (file has {total} lines)")]
    LineOutOfRange { lineno: usize, total: usize },

    #[error("Line {lineno} is not a Host line: {line:?}")]
    NotAHostLine { lineno: usize, line: String },

    #[error("No host block matches '{query}'")]
    NoMatch { query: String },

    #[error("Multiple host blocks match '{query}': {}", .candidates.join("; "))]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
