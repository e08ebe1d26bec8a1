//! Payload values, payload types, and jar configuration

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// How a jar's payload is stored in the host file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadType {
    /// Verbatim lines
    Text,
    /// Sentinel-prefixed, wrapped base-N lines
    Bytes,
}

impl PayloadType {
    pub const ALL: [PayloadType; 2] = [PayloadType::Text, PayloadType::Bytes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names neither `text` nor `bytes`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown spyce type {0:?} (expected 'text' or 'bytes')")]
pub struct UnknownPayloadType(pub String);

impl FromStr for PayloadType {
    type Err = UnknownPayloadType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "bytes" => Ok(Self::Bytes),
            other => Err(UnknownPayloadType(other.to_string())),
        }
    }
}

/// Decoded content of a jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Text(_) => PayloadType::Text,
            Self::Bytes(_) => PayloadType::Bytes,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA-256 of the raw content, hex encoded
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Write the raw content to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| spyce_fs::Error::io(parent, e))?;
        }
        fs::write(path, self.as_bytes()).map_err(|e| spyce_fs::Error::io(path, e))?;
        Ok(())
    }

    /// Unpack a gzip-compressed tar payload into `dir`.
    pub fn untar(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| spyce_fs::Error::io(dir, e))?;
        let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(self.as_bytes())));
        archive.unpack(dir).map_err(|e| spyce_fs::Error::io(dir, e))?;
        Ok(())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Ordered key/value configuration of a jar.
///
/// Each entry is one `- key=value` marker line, written in insertion order.
/// Values are JSON scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    entries: Vec<(String, Value)>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, keeping its position if it is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        let value = value.into();
        if !is_scalar(&value) {
            return Err(Error::InvalidKey {
                key,
                reason: "configuration values must be JSON scalars".to_string(),
            });
        }
        self.set_unchecked(&key, value);
        Ok(())
    }

    /// Set one of the library's own keys (`flavor`, `source`, ...).
    pub fn set_reserved(&mut self, key: &'static str, value: impl Into<Value>) {
        self.set_unchecked(key, value.into());
    }

    pub(crate) fn set_unchecked(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub(crate) fn push_parsed(&mut self, key: String, value: Value) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.contains('=') {
        Some("key contains '='")
    } else if key.chars().any(char::is_whitespace) {
        Some("key contains whitespace")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Check that `name` can be used as a jar name.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains('/') {
        Some("name contains '/'")
    } else if name.contains(':') {
        Some("name contains ':'")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
