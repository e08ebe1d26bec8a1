//! Filesystem helpers for spyce
//!
//! Whole-file reads, temp-then-rename writes, timestamped backups and
//! permission copying. Nothing here keeps a file handle open between calls.

pub mod backup;
pub mod error;
pub mod io;

pub use backup::{BackupFormat, DEFAULT_BACKUP_FORMAT, Timestamp};
pub use error::{Error, Result};
pub use io::{is_same_file, read_text, write_atomic, write_preserving_mode};
