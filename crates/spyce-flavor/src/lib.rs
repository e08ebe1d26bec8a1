//! Payload producers ("flavors") for spyce
//!
//! A flavor knows how to regenerate one jar's content from somewhere else:
//! a file, a directory, a URL, a literal, or the bootstrap reader itself.
//! [`build_flavor`] turns a declarative [`FlavorSpec`] into one.

pub mod api;
pub mod dir;
pub mod error;
pub mod file;
pub mod flavor;
pub mod inline;
pub mod kind;
pub mod url;

pub use api::ApiFlavor;
pub use dir::DirFlavor;
pub use error::{Error, Result};
pub use file::{FileFlavor, SourceFlavor};
pub use flavor::{Flavor, FlavorOptions, Settings};
pub use inline::InlineFlavor;
pub use kind::{FlavorKind, FlavorSpec, build_flavor};
pub use url::UrlFlavor;
