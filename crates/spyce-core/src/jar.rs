//! Jar (region index) types

use std::cell::OnceCell;
use std::ops::Range;

use sha2::{Digest, Sha256};

use crate::payload::{Configuration, Payload, PayloadType};

/// One marker-delimited region of a host file.
///
/// `start..end` is the half-open line range covering the start marker, the
/// configuration lines, the payload, and the end marker. A jar whose end
/// marker is missing covers only its header.
#[derive(Debug, Clone)]
pub struct Jar {
    name: String,
    payload_type: PayloadType,
    configuration: Configuration,
    start: usize,
    end: usize,
    terminated: bool,
    pub(crate) payload: OnceCell<Payload>,
}

impl Jar {
    pub(crate) fn new(
        name: String,
        payload_type: PayloadType,
        configuration: Configuration,
        start: usize,
        end: usize,
        terminated: bool,
    ) -> Self {
        Self {
            name,
            payload_type,
            configuration,
            start,
            end,
            terminated,
            payload: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// `name:type`
    pub fn fq_key(&self) -> String {
        format!("{}:{}", self.name, self.payload_type)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Whole block, markers included.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the end marker was present.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Start marker plus configuration lines.
    pub fn header_len(&self) -> usize {
        1 + self.configuration.len()
    }

    /// Payload lines only.
    pub fn body_range(&self) -> Range<usize> {
        let body_start = self.start + self.header_len();
        let body_end = if self.terminated { self.end - 1 } else { self.end };
        body_start..body_end.max(body_start)
    }

    /// Lines of this jar in `buffer`, with or without the marker lines.
    pub fn lines<'a>(&self, buffer: &'a [String], headers: bool) -> &'a [String] {
        let range = if headers { self.range() } else { self.body_range() };
        &buffer[range.start.min(buffer.len())..range.end.min(buffer.len())]
    }

    /// SHA-256 over the stored payload lines, hex encoded.
    pub fn checksum(&self, buffer: &[String]) -> String {
        lines_checksum(self.lines(buffer, false).iter().map(String::as_str))
    }

    /// Decoded payload, if it has been accessed or set already.
    pub fn cached_payload(&self) -> Option<&Payload> {
        self.payload.get()
    }

    pub(crate) fn shift(&mut self, delta: isize) {
        self.start = self.start.saturating_add_signed(delta);
        self.end = self.end.saturating_add_signed(delta);
    }

    pub(crate) fn shrink(&mut self, lines: usize) {
        self.end -= lines;
    }
}

pub(crate) fn lines_checksum<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Where [`SpycyFile::set`](crate::SpycyFile::set) puts a jar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Position {
    /// Keep an existing jar in place; otherwise pick a home by payload type
    #[default]
    Auto,
    /// First line of the file
    Start,
    /// After the last line of the file
    End,
    /// Directly before another jar
    Before(String),
    /// Directly after another jar
    After(String),
    /// Before the given 0-based line of the current file
    Line(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> Vec<String> {
        ["a\n", "# spyce: start x:text\n", "# spyce: - k=1\n", "body\n", "# spyce: end x\n"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn jar(terminated: bool) -> Jar {
        let mut config = Configuration::new();
        config.insert("k", 1).unwrap();
        let end = if terminated { 5 } else { 3 };
        Jar::new("x".into(), PayloadType::Text, config, 1, end, terminated)
    }

    #[test]
    fn body_excludes_markers() {
        let jar = jar(true);
        assert_eq!(jar.body_range(), 3..4);
        assert_eq!(jar.lines(&buffer(), false), &["body\n".to_string()]);
        assert_eq!(jar.lines(&buffer(), true).len(), 4);
        assert_eq!(jar.fq_key(), "x:text");
    }

    #[test]
    fn unterminated_jar_has_empty_body() {
        let jar = jar(false);
        assert_eq!(jar.range(), 1..3);
        assert!(jar.body_range().is_empty());
    }

    #[test]
    fn shift_moves_both_ends() {
        let mut jar = jar(true);
        jar.shift(3);
        assert_eq!(jar.range(), 4..8);
        jar.shift(-4);
        assert_eq!(jar.range(), 0..4);
    }

    #[test]
    fn checksum_tracks_payload_lines_only() {
        let jar = jar(true);
        let mut other = buffer();
        other[2] = "# spyce: - k=2\n".to_string();
        assert_eq!(jar.checksum(&buffer()), jar.checksum(&other));
        other[3] = "changed\n".to_string();
        assert_ne!(jar.checksum(&buffer()), jar.checksum(&other));
    }
}
