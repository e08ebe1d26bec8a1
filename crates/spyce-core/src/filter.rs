//! Shell-glob selection of jars

use std::fmt;
use std::str::FromStr;

use glob::Pattern as Glob;

use crate::error::{Error, Result};
use crate::jar::Jar;
use crate::spycy_file::SpycyFile;

/// Configuration key holding the producer tag of a jar.
pub const FLAVOR_KEY: &str = "flavor";
/// Configuration key holding the source path or URL of a jar.
pub const SOURCE_KEY: &str = "source";

/// A predicate over jars.
pub trait JarFilter {
    fn matches(&self, jar: &Jar) -> bool;
}

/// What a [`Pattern`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `name:type`
    Key,
    /// The `flavor` configuration value
    Flavor,
    /// The `source` configuration value
    Source,
}

/// A glob over one field of a jar, optionally negated with a leading `~`.
#[derive(Debug, Clone)]
pub struct Pattern {
    field: Field,
    glob: Glob,
    negated: bool,
    raw: String,
}

impl Pattern {
    /// Parse `[~][name][:type]`; a missing part matches anything.
    pub fn parse(pattern: &str) -> Result<Self> {
        let (negated, body) = split_negation(pattern);
        let (name, payload_type) = match body.split_once(':') {
            Some((name, payload_type)) => (name, payload_type),
            None => (body, ""),
        };
        let name = if name.is_empty() { "*" } else { name };
        let payload_type = if payload_type.is_empty() {
            "*"
        } else {
            payload_type
        };
        Self::build(Field::Key, &format!("{name}:{payload_type}"), negated, pattern)
    }

    /// Match the `flavor` configuration value.
    pub fn flavor(pattern: &str) -> Result<Self> {
        let (negated, body) = split_negation(pattern);
        Self::build(Field::Flavor, body, negated, pattern)
    }

    /// Match the `source` configuration value.
    pub fn source(pattern: &str) -> Result<Self> {
        let (negated, body) = split_negation(pattern);
        Self::build(Field::Source, body, negated, pattern)
    }

    fn build(field: Field, glob: &str, negated: bool, raw: &str) -> Result<Self> {
        let glob = Glob::new(glob).map_err(|e| Error::InvalidPattern {
            pattern: raw.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            field,
            glob,
            negated,
            raw: raw.to_string(),
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

fn split_negation(pattern: &str) -> (bool, &str) {
    match pattern.strip_prefix('~') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    }
}

impl JarFilter for Pattern {
    fn matches(&self, jar: &Jar) -> bool {
        let subject = match self.field {
            Field::Key => jar.fq_key(),
            Field::Flavor => jar
                .configuration()
                .get_str(FLAVOR_KEY)
                .unwrap_or_default()
                .to_string(),
            Field::Source => jar
                .configuration()
                .get_str(SOURCE_KEY)
                .unwrap_or_default()
                .to_string(),
        };
        self.glob.matches(&subject) != self.negated
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl SpycyFile {
    /// Names of the jars matching every filter, in file order.
    pub fn filter<F: JarFilter>(&self, filters: &[F]) -> Vec<&str> {
        self.jars()
            .into_iter()
            .filter(|jar| filters.iter().all(|f| f.matches(jar)))
            .map(Jar::name)
            .collect()
    }
}
