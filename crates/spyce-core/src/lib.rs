//! Named, typed payload regions embedded in ordinary text files
//!
//! A host file carries any number of jars, each delimited by marker comments:
//!
//! ```text
//! # spyce: start logo:bytes
//! # spyce: - encoding="base85"
//! #|VPRomVPO3hVRzX...
//! # spyce: end logo
//! ```
//!
//! [`SpycyFile`] parses the markers once, keeps every jar's line range in
//! step with the buffer as jars are set and removed, and writes the file
//! back through [`SpycyFile::refactor`] only when something changed.

pub mod codec;
pub mod diff;
pub mod edit;
pub mod error;
pub mod filter;
pub mod jar;
pub mod marker;
pub mod parser;
pub mod payload;
pub mod refactor;
pub mod spycy_file;

pub use codec::{CodecError, CodecOptions, Compression, Encoding};
pub use diff::FileDiff;
pub use edit::{Edit, EditKind};
pub use error::{Error, Result};
pub use filter::{Field, JarFilter, Pattern};
pub use jar::{Jar, Position};
pub use marker::{Marker, MarkerSyntax};
pub use payload::{Configuration, Payload, PayloadType, validate_name};
pub use refactor::{RefactorOptions, Refactored};
pub use spycy_file::{FileOptions, Spyce, SpycyFile};
