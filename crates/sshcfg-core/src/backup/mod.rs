//! Config backup, restore, and prune
//!
//! Every mutating operation can copy the target first. Backups are stored
//! next to the target:
//!
//! ```text
//! ~/.ssh/config
//! ~/.ssh/backups/config.backup.20240101010101
//! ~/.ssh/backups/config.backup.20231224083000
//! ```

mod manager;
mod stamp;

pub use manager::{
    BackupEntry, BackupManager, PruneOptions, PruneReport, RestoreOutcome, select,
};
pub use stamp::{
    DEFAULT_FUTURE_SKEW_MINUTES, STAMP_FORMAT, now_stamp, parse_cutoff, parse_stamp,
    parse_stamp_at,
};
