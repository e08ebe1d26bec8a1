//! Flavor categories and the tag-keyed constructor table

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spyce_core::PayloadType;

use crate::api::ApiFlavor;
use crate::dir::DirFlavor;
use crate::error::{Error, Result};
use crate::file::{FileFlavor, SourceFlavor};
use crate::flavor::{Flavor, FlavorOptions};
use crate::inline::InlineFlavor;
use crate::url::UrlFlavor;

/// Category tag of a flavor, as written in `category:` and in `flavor=` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorKind {
    File,
    Source,
    Dir,
    Url,
    Api,
    Inline,
}

type Constructor = fn(&str, &FlavorSpec, &Path) -> Result<Box<dyn Flavor>>;

static REGISTRY: [(FlavorKind, &str, Constructor); 6] = [
    (FlavorKind::File, "file", build_file),
    (FlavorKind::Source, "source", build_source),
    (FlavorKind::Dir, "dir", build_dir),
    (FlavorKind::Url, "url", build_url),
    (FlavorKind::Api, "api", build_api),
    (FlavorKind::Inline, "inline", build_inline),
];

impl FlavorKind {
    pub fn all() -> impl Iterator<Item = FlavorKind> {
        REGISTRY.iter().map(|(kind, _, _)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, tag, _)| *tag)
            .unwrap_or("unknown")
    }

    fn constructor(&self) -> Option<Constructor> {
        REGISTRY
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, _, build)| *build)
    }
}

impl fmt::Display for FlavorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlavorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|(_, tag, _)| *tag == s)
            .map(|(kind, _, _)| *kind)
            .ok_or_else(|| Error::UnknownCategory {
                category: s.to_string(),
            })
    }
}

fn default_category() -> String {
    "file".to_string()
}

/// Declarative description of one flavor, as found in a wok file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorSpec {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Literal content for the `inline` category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<PayloadType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
}

impl Default for FlavorSpec {
    fn default() -> Self {
        Self {
            category: default_category(),
            name: None,
            path: None,
            url: None,
            text: None,
            payload_type: None,
            encoding: None,
            compression: None,
        }
    }
}

impl FlavorSpec {
    fn options(&self, key: &str) -> Result<FlavorOptions> {
        Ok(FlavorOptions {
            name: Some(self.name.clone().unwrap_or_else(|| key.to_string())),
            payload_type: self.payload_type,
            encoding: self.encoding.as_deref().map(str::parse).transpose()?,
            compression: self.compression.as_deref().map(str::parse).transpose()?,
        })
    }

    fn path(&self, category: FlavorKind, base_dir: &Path) -> Result<PathBuf> {
        let path = self.path.as_ref().ok_or(Error::MissingKey {
            category: category.as_str(),
            key: "path",
        })?;
        Ok(if path.is_absolute() {
            path.clone()
        } else {
            base_dir.join(path)
        })
    }
}

/// Build the flavor described by `spec`, stored under `key`.
///
/// Relative paths are taken from `base_dir`.
pub fn build_flavor(key: &str, spec: &FlavorSpec, base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let kind: FlavorKind = spec.category.parse()?;
    let build = kind.constructor().ok_or_else(|| Error::UnknownCategory {
        category: spec.category.clone(),
    })?;
    build(key, spec, base_dir)
}

fn build_file(key: &str, spec: &FlavorSpec, base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let path = spec.path(FlavorKind::File, base_dir)?;
    Ok(Box::new(FileFlavor::new(path, spec.options(key)?)?))
}

fn build_source(key: &str, spec: &FlavorSpec, base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let path = spec.path(FlavorKind::Source, base_dir)?;
    Ok(Box::new(SourceFlavor::new(path, spec.options(key)?)?))
}

fn build_dir(key: &str, spec: &FlavorSpec, base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let path = spec.path(FlavorKind::Dir, base_dir)?;
    Ok(Box::new(DirFlavor::new(path, spec.options(key)?)?))
}

fn build_url(key: &str, spec: &FlavorSpec, _base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let url = spec.url.clone().ok_or(Error::MissingKey {
        category: FlavorKind::Url.as_str(),
        key: "url",
    })?;
    Ok(Box::new(UrlFlavor::new(url, spec.options(key)?)?))
}

fn build_api(key: &str, spec: &FlavorSpec, _base_dir: &Path) -> Result<Box<dyn Flavor>> {
    Ok(Box::new(ApiFlavor::new(spec.options(key)?)?))
}

fn build_inline(key: &str, spec: &FlavorSpec, _base_dir: &Path) -> Result<Box<dyn Flavor>> {
    let text = spec.text.clone().ok_or(Error::MissingKey {
        category: FlavorKind::Inline.as_str(),
        key: "text",
    })?;
    Ok(Box::new(InlineFlavor::new(text, spec.options(key)?)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in FlavorKind::all() {
            assert_eq!(kind.as_str().parse::<FlavorKind>().unwrap(), kind);
        }
        assert!(matches!(
            "image".parse::<FlavorKind>(),
            Err(Error::UnknownCategory { .. })
        ));
    }

    #[test]
    fn spec_defaults_to_file_category() {
        let spec: FlavorSpec = serde_yaml::from_str("path: logo.png\ntype: bytes\n").unwrap();
        assert_eq!(spec.category, "file");
        assert_eq!(spec.payload_type, Some(PayloadType::Bytes));
    }

    #[test]
    fn missing_path_is_reported() {
        let spec = FlavorSpec::default();
        let err = build_flavor("logo", &spec, Path::new(".")).unwrap_err();
        assert!(matches!(err, Error::MissingKey { key: "path", .. }));
    }

    #[test]
    fn bad_encoding_is_reported() {
        let spec = FlavorSpec {
            category: "inline".into(),
            text: Some("x".into()),
            encoding: Some("rot13".into()),
            ..FlavorSpec::default()
        };
        assert!(matches!(
            build_flavor("x", &spec, Path::new(".")),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn inline_spec_builds() {
        let spec = FlavorSpec {
            category: "inline".into(),
            text: Some("hello".into()),
            ..FlavorSpec::default()
        };
        let flavor = build_flavor("greeting", &spec, Path::new(".")).unwrap();
        assert_eq!(flavor.name(), "greeting");
        assert_eq!(flavor.kind(), FlavorKind::Inline);
        assert_eq!(flavor.payload_type(), PayloadType::Text);
    }
}
