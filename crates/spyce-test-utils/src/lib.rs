//! Shared test utilities for the spyce workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`project`]: [`TestProject`], a scratch directory with a wok file and assets

pub mod project;

pub use project::{SCRIPT, TestProject};
