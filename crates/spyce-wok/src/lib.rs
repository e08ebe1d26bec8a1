//! Project configuration ("wok") for spyce
//!
//! A `.wok-project.yaml` file lists target files and the spyces each one
//! should carry. [`load_wok`] turns it into a [`Wok`] that can apply the
//! spyces, report drift, or preview the change as a diff.

pub mod error;
pub mod loader;
pub mod status;
pub mod wok;

pub use error::{Error, Result};
pub use loader::{WOK_FILE_NAME, find_wok_path, load_wok, parse_wok};
pub use status::{FileStatus, SpyceState, SpyceStatus};
pub use wok::{Wok, WokFile};
