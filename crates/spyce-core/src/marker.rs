//! Marker comment syntax: recognizing and writing directive lines

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::payload::PayloadType;

/// Comment prefix used when none is configured.
pub const DEFAULT_COMMENT_PREFIX: &str = "#";
/// Keyword used when none is configured.
pub const DEFAULT_KEYWORD: &str = "spyce";

static DEFAULT_SYNTAX: LazyLock<MarkerSyntax> = LazyLock::new(|| {
    MarkerSyntax::new(DEFAULT_COMMENT_PREFIX, DEFAULT_KEYWORD)
        .expect("default marker syntax is valid")
});

/// A recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `start NAME[:TYPE]`; the type is kept raw for the parser to check
    Start {
        name: String,
        payload_type: Option<String>,
    },
    End { name: String },
    /// `- KEY=VALUE`; the value is raw JSON text
    Config { key: String, value: String },
    Section { payload_type: PayloadType },
}

/// The comment prefix and keyword that make a line a marker.
#[derive(Debug, Clone)]
pub struct MarkerSyntax {
    comment_prefix: String,
    keyword: String,
    directive: Regex,
    start: Regex,
    end: Regex,
    config: Regex,
    section: Regex,
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        DEFAULT_SYNTAX.clone()
    }
}

impl PartialEq for MarkerSyntax {
    fn eq(&self, other: &Self) -> bool {
        self.comment_prefix == other.comment_prefix && self.keyword == other.keyword
    }
}

impl Eq for MarkerSyntax {}

impl MarkerSyntax {
    pub fn new(comment_prefix: impl Into<String>, keyword: impl Into<String>) -> Result<Self> {
        let comment_prefix = comment_prefix.into();
        let keyword = keyword.into();
        if comment_prefix.trim().is_empty() {
            return Err(Error::InvalidMarkerSyntax {
                message: "comment prefix is empty".to_string(),
            });
        }
        if keyword.is_empty() || keyword.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(Error::InvalidMarkerSyntax {
                message: format!("keyword {keyword:?} must be a single word"),
            });
        }

        let head = format!(
            r"^{}\s*{}:\s+",
            regex::escape(&comment_prefix),
            regex::escape(&keyword)
        );
        let compile = |tail: &str| {
            Regex::new(&format!("{head}{tail}")).map_err(|e| Error::InvalidMarkerSyntax {
                message: e.to_string(),
            })
        };

        Ok(Self {
            directive: compile(r"(?:start|end|section|-)(?:\s|$)")?,
            start: compile(r"start\s+(?P<name>[^\s/:]+)(?::(?P<type>\S+))?\s*$")?,
            end: compile(r"end\s+(?P<name>[^\s/:]+)(?::\S+)?\s*$")?,
            config: compile(r"-\s+(?P<key>[^=\s]+)=(?P<value>.*?)\s*$")?,
            section: compile(r"section\s+(?P<section>\S+)\s*$")?,
            comment_prefix,
            keyword,
        })
    }

    pub fn comment_prefix(&self) -> &str {
        &self.comment_prefix
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Prefix of every bytes payload line.
    pub fn sentinel(&self) -> String {
        format!("{}|", self.comment_prefix)
    }

    /// Whether the line is shaped like a directive, valid or not.
    pub fn is_marker_like(&self, line: &str) -> bool {
        self.directive.is_match(line)
    }

    /// Classify one line.
    ///
    /// Returns `Ok(None)` for ordinary lines and `Err(message)` for lines that
    /// look like directives but do not parse.
    pub fn classify(&self, line: &str) -> std::result::Result<Option<Marker>, String> {
        if !self.directive.is_match(line) {
            return Ok(None);
        }
        if let Some(caps) = self.start.captures(line) {
            return Ok(Some(Marker::Start {
                name: caps["name"].to_string(),
                payload_type: caps.name("type").map(|m| m.as_str().to_string()),
            }));
        }
        if let Some(caps) = self.end.captures(line) {
            return Ok(Some(Marker::End {
                name: caps["name"].to_string(),
            }));
        }
        if let Some(caps) = self.config.captures(line) {
            return Ok(Some(Marker::Config {
                key: caps["key"].to_string(),
                value: caps["value"].to_string(),
            }));
        }
        if let Some(caps) = self.section.captures(line) {
            let payload_type = match &caps["section"] {
                "text" | "source" => PayloadType::Text,
                "bytes" | "data" => PayloadType::Bytes,
                other => return Err(format!("unknown section {other:?}")),
            };
            return Ok(Some(Marker::Section { payload_type }));
        }
        Err(format!("malformed directive {:?}", line.trim_end()))
    }

    pub fn start_line(&self, name: &str, payload_type: PayloadType) -> String {
        format!(
            "{} {}: start {name}:{payload_type}\n",
            self.comment_prefix, self.keyword
        )
    }

    pub fn config_line(&self, key: &str, value: &Value) -> String {
        format!("{} {}: - {key}={value}\n", self.comment_prefix, self.keyword)
    }

    pub fn end_line(&self, name: &str) -> String {
        format!("{} {}: end {name}\n", self.comment_prefix, self.keyword)
    }

    pub fn section_line(&self, payload_type: PayloadType) -> String {
        format!(
            "{} {}: section {payload_type}\n",
            self.comment_prefix, self.keyword
        )
    }
}
