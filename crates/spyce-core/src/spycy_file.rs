//! The document model: a host file's line buffer plus its jar index

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::codec::{CodecContext, CodecOptions, Compression, Encoding};
use crate::edit::{Edit, EditKind};
use crate::error::{Error, Result};
use crate::jar::{Jar, Position, lines_checksum};
use crate::marker::MarkerSyntax;
use crate::parser;
use crate::payload::{Configuration, Payload, PayloadType, validate_name};

/// Display name for buffers that did not come from a file.
pub const STRING_SOURCE: &str = "<string>";

/// Marker syntax and codec defaults for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub syntax: MarkerSyntax,
    pub codec: CodecOptions,
}

/// A payload ready to be stored under a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Spyce {
    pub name: String,
    pub payload: Payload,
    pub configuration: Configuration,
    /// Overrides the document's default for bytes payloads
    pub encoding: Option<Encoding>,
    /// Overrides the document's default for bytes payloads
    pub compression: Option<Compression>,
}

impl Spyce {
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            configuration: Configuration::new(),
            encoding: None,
            compression: None,
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload.payload_type()
    }
}

/// Marker lines and payload lines of one encoded jar.
struct Block {
    configuration: Configuration,
    lines: Vec<String>,
    body: std::ops::Range<usize>,
}

/// A host text file with embedded jars.
///
/// Owns the line buffer and keeps every jar's line range in step with it.
/// Every structural mutation bumps the content version.
#[derive(Debug, Clone)]
pub struct SpycyFile {
    path: Option<PathBuf>,
    name: String,
    lines: Vec<String>,
    jars: HashMap<String, Jar>,
    sections: BTreeMap<PayloadType, usize>,
    options: FileOptions,
    /// Final line that had no newline until a jar was appended after it
    unterminated_tail: Option<usize>,
    pub(crate) version: u64,
    pub(crate) flushed_version: u64,
}

impl SpycyFile {
    /// Read and index a file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, FileOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: FileOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = spyce_fs::read_text(path)?;
        let mut file = Self::parse_with(&text, &path.display().to_string(), options)?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Read a whole stream; `name` is only used in messages.
    pub fn from_reader(mut reader: impl Read, name: &str) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_with(&text, name, FileOptions::default())
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, STRING_SOURCE, FileOptions::default())
    }

    pub fn parse_with(text: &str, name: &str, options: FileOptions) -> Result<Self> {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        let parsed = parser::parse(&lines, &options.syntax, name)?;
        tracing::debug!(file = name, lines = lines.len(), jars = parsed.jars.len(), "parsed");
        Ok(Self {
            path: None,
            name: name.to_string(),
            lines,
            jars: parsed
                .jars
                .into_iter()
                .map(|jar| (jar.name().to_string(), jar))
                .collect(),
            sections: parsed.sections,
            options,
            unterminated_tail: None,
            version: 0,
            flushed_version: 0,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.name = path.display().to_string();
        self.path = Some(path);
    }

    /// Name used in messages: the path, or the name given when parsed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FileOptions {
        &self.options
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole buffer as text.
    pub fn render(&self) -> String {
        self.lines.concat()
    }

    /// Content version; bumped by every mutation that changed the buffer.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the buffer changed since it was read or last written in place.
    pub fn is_modified(&self) -> bool {
        self.version != self.flushed_version
    }

    /// Line of the `section` marker recorded for `payload_type`.
    pub fn section(&self, payload_type: PayloadType) -> Option<usize> {
        self.sections.get(&payload_type).copied()
    }

    pub fn len(&self) -> usize {
        self.jars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jars.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.jars.contains_key(name)
    }

    pub fn jar(&self, name: &str) -> Option<&Jar> {
        self.jars.get(name)
    }

    pub fn get(&self, name: &str) -> Result<&Jar> {
        self.jars.get(name).ok_or_else(|| Error::JarNotFound {
            name: name.to_string(),
        })
    }

    /// Jars in file order.
    pub fn jars(&self) -> Vec<&Jar> {
        let mut jars: Vec<&Jar> = self.jars.values().collect();
        jars.sort_by_key(|jar| jar.start());
        jars
    }

    /// Jar names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.jars().into_iter().map(Jar::name).collect()
    }

    /// Decoded payload of a jar, decoded on first access and cached.
    pub fn content(&self, name: &str) -> Result<&Payload> {
        let jar = self.get(name)?;
        if let Some(payload) = jar.payload.get() {
            return Ok(payload);
        }
        let payload = self.decode(jar)?;
        Ok(jar.payload.get_or_init(|| payload))
    }

    fn decode(&self, jar: &Jar) -> Result<Payload> {
        let options = match jar.payload_type() {
            PayloadType::Text => self.options.codec,
            PayloadType::Bytes => self
                .options
                .codec
                .from_configuration(jar.configuration())
                .map_err(|e| Error::codec(&self.name, jar.name(), e))?,
        };
        let sentinel = self.options.syntax.sentinel();
        let ctx = CodecContext {
            sentinel: &sentinel,
            options,
        };
        let lines: Vec<&str> = jar
            .lines(&self.lines, false)
            .iter()
            .map(String::as_str)
            .collect();
        jar.payload_type()
            .codec()
            .decode(&lines, &ctx)
            .map_err(|e| Error::codec(&self.name, jar.name(), e))
    }

    fn encode(&self, spyce: &Spyce) -> Result<Block> {
        let payload_type = spyce.payload_type();
        let mut configuration = spyce.configuration.clone();
        let mut options = self.options.codec;
        if payload_type == PayloadType::Bytes {
            options = options
                .from_configuration(&configuration)
                .map_err(|e| Error::codec(&self.name, &spyce.name, e))?;
            if let Some(encoding) = spyce.encoding {
                options.encoding = encoding;
            }
            if let Some(compression) = spyce.compression {
                options.compression = compression;
            }
            options.write_configuration(&mut configuration);
        }

        let syntax = &self.options.syntax;
        let sentinel = syntax.sentinel();
        let ctx = CodecContext {
            sentinel: &sentinel,
            options,
        };
        let body = payload_type
            .codec()
            .encode(&spyce.payload, &ctx)
            .map_err(|e| Error::codec(&self.name, &spyce.name, e))?;

        if payload_type == PayloadType::Text {
            if let Some(index) = body.iter().position(|line| syntax.is_marker_like(line)) {
                return Err(Error::MarkerInPayload {
                    name: spyce.name.clone(),
                    line: index + 1,
                });
            }
        }

        let mut lines = Vec::with_capacity(body.len() + configuration.len() + 2);
        lines.push(syntax.start_line(&spyce.name, payload_type));
        for (key, value) in configuration.iter() {
            lines.push(syntax.config_line(key, value));
        }
        let body_start = lines.len();
        lines.extend(body);
        let body_end = lines.len();
        lines.push(syntax.end_line(&spyce.name));

        Ok(Block {
            configuration,
            lines,
            body: body_start..body_end,
        })
    }

    /// Whether storing `spyce` would leave its jar exactly as it is now.
    pub fn is_up_to_date(&self, spyce: &Spyce) -> Result<bool> {
        let Some(jar) = self.jars.get(&spyce.name) else {
            return Ok(false);
        };
        let block = self.encode(spyce)?;
        if !jar.is_terminated()
            || jar.payload_type() != spyce.payload_type()
            || *jar.configuration() != block.configuration
        {
            return Ok(false);
        }
        let fresh = lines_checksum(block.lines[block.body.clone()].iter().map(String::as_str));
        Ok(fresh == jar.checksum(&self.lines))
    }

    /// Store `spyce`, replacing a jar of the same name.
    pub fn set(&mut self, spyce: Spyce, position: Position) -> Result<Edit> {
        validate_name(&spyce.name)?;
        let block = self.encode(&spyce)?;
        let name = spyce.name.clone();
        let old = self.jars.get(&name).map(Jar::range);

        let point = self.resolve_position(&name, spyce.payload_type(), &position, old.clone())?;

        // insertion point once the old block is gone
        let point = match &old {
            Some(old) if point >= old.end => point - old.len(),
            Some(old) if point > old.start => old.start,
            _ => point,
        };

        if let Some(old) = &old {
            if point == old.start && self.lines[old.clone()] == block.lines[..] {
                tracing::debug!(file = %self.name, jar = %name, "spyce unchanged");
                return Ok(Edit {
                    kind: EditKind::Unchanged,
                    name,
                    lines: old.clone(),
                    delta: 0,
                });
            }
        }

        let removed = match &old {
            Some(old) => {
                self.jars.remove(&name);
                self.splice_out(old.clone());
                self.restore_tail();
                old.len()
            }
            None => 0,
        };

        if point > 0 {
            if let Some(previous) = self.lines.get_mut(point - 1) {
                if !previous.ends_with('\n') {
                    previous.push('\n');
                    self.unterminated_tail = Some(point - 1);
                }
            }
        }

        let added = block.lines.len();
        self.shift_from(point, added as isize);
        let tail = self.lines.split_off(point);
        self.lines.extend(block.lines);
        self.lines.extend(tail);

        let jar = Jar::new(
            name.clone(),
            spyce.payload.payload_type(),
            block.configuration,
            point,
            point + added,
            true,
        );
        let _ = jar.payload.set(spyce.payload);
        self.jars.insert(name.clone(), jar);
        self.version += 1;

        let kind = if old.is_some() {
            EditKind::Replace
        } else {
            EditKind::Insert
        };
        tracing::debug!(
            file = %self.name,
            jar = %name,
            ?kind,
            start = point,
            end = point + added,
            "stored spyce"
        );
        Ok(Edit {
            kind,
            name,
            lines: point..point + added,
            delta: added as isize - removed as isize,
        })
    }

    /// Insertion line before the jar's own block is removed.
    fn resolve_position(
        &self,
        name: &str,
        payload_type: PayloadType,
        position: &Position,
        old: Option<std::ops::Range<usize>>,
    ) -> Result<usize> {
        let anchor = |anchor: &str| {
            self.jars.get(anchor).ok_or_else(|| Error::UnknownAnchor {
                name: anchor.to_string(),
            })
        };

        let point = match position {
            Position::Before(a) | Position::After(a) if a == name => match &old {
                Some(old) => old.start,
                None => {
                    return Err(Error::UnknownAnchor {
                        name: a.to_string(),
                    });
                }
            },
            Position::Auto => match &old {
                Some(old) => old.start,
                None => self.auto_home(payload_type),
            },
            Position::Start => 0,
            Position::End => self.lines.len(),
            Position::Before(a) => anchor(a)?.start(),
            Position::After(a) => anchor(a)?.end(),
            Position::Line(line) => {
                if *line > self.lines.len() {
                    return Err(Error::InvalidPosition {
                        line: *line,
                        message: format!("file has {} lines", self.lines.len()),
                    });
                }
                *line
            }
        };

        if let Some(inside) = self
            .jars
            .values()
            .find(|jar| jar.name() != name && jar.start() < point && point < jar.end())
        {
            return Err(Error::InvalidPosition {
                line: point,
                message: format!("inside spyce {:?}", inside.name()),
            });
        }
        Ok(point)
    }

    /// Default home for a new jar of `payload_type`.
    ///
    /// After the last jar of the same type, else after the `section` marker,
    /// else text goes right after leading `#!` lines and bytes go at the end.
    fn auto_home(&self, payload_type: PayloadType) -> usize {
        if let Some(last) = self
            .jars
            .values()
            .filter(|jar| jar.payload_type() == payload_type)
            .max_by_key(|jar| jar.start())
        {
            return last.end();
        }
        if let Some(section) = self.section(payload_type) {
            return section + 1;
        }
        match payload_type {
            PayloadType::Text => self
                .lines
                .iter()
                .take_while(|line| line.starts_with("#!"))
                .count(),
            PayloadType::Bytes => self.lines.len(),
        }
    }

    /// Remove a whole jar, markers included.
    pub fn remove(&mut self, name: &str) -> Result<Edit> {
        let jar = self.jars.remove(name).ok_or_else(|| Error::JarNotFound {
            name: name.to_string(),
        })?;
        let range = jar.range();
        self.splice_out(range.clone());
        self.restore_tail();
        self.version += 1;
        tracing::debug!(file = %self.name, jar = %name, start = range.start, end = range.end, "removed spyce");
        Ok(Edit {
            kind: EditKind::Delete,
            name: name.to_string(),
            lines: range.start..range.start,
            delta: -(range.len() as isize),
        })
    }

    /// Remove only the payload lines, keeping the markers.
    pub fn remove_content(&mut self, name: &str) -> Result<Edit> {
        let body = self.get(name)?.body_range();
        if body.is_empty() {
            return Ok(Edit {
                kind: EditKind::Unchanged,
                name: name.to_string(),
                lines: body,
                delta: 0,
            });
        }

        self.lines.drain(body.clone());
        let removed = body.len() as isize;
        if let Some(jar) = self.jars.get_mut(name) {
            jar.shrink(body.len());
            jar.payload = Default::default();
        }
        self.shift_from(body.end, -removed);
        self.version += 1;
        tracing::debug!(file = %self.name, jar = %name, lines = body.len(), "emptied spyce");
        Ok(Edit {
            kind: EditKind::Delete,
            name: name.to_string(),
            lines: body.start..body.start,
            delta: -removed,
        })
    }

    pub fn delete(&mut self, name: &str, content_only: bool) -> Result<Edit> {
        if content_only {
            self.remove_content(name)
        } else {
            self.remove(name)
        }
    }

    /// Drop `range` from the buffer and pull later jars and anchors back.
    fn splice_out(&mut self, range: std::ops::Range<usize>) {
        let len = range.len() as isize;
        let end = range.end;
        if self.unterminated_tail.is_some_and(|tail| range.contains(&tail)) {
            self.unterminated_tail = None;
        }
        self.lines.drain(range);
        self.shift_from(end, -len);
    }

    /// Take back the newline `set` added once that line is last again.
    fn restore_tail(&mut self) {
        let Some(tail) = self.unterminated_tail else {
            return;
        };
        if tail + 1 == self.lines.len() {
            if let Some(line) = self.lines.get_mut(tail) {
                line.pop();
            }
            self.unterminated_tail = None;
        }
    }

    fn shift_from(&mut self, from: usize, delta: isize) {
        for jar in self.jars.values_mut() {
            if jar.start() >= from {
                jar.shift(delta);
            }
        }
        for anchor in self.sections.values_mut() {
            if *anchor >= from {
                *anchor = anchor.saturating_add_signed(delta);
            }
        }
        if let Some(tail) = self.unterminated_tail.as_mut() {
            if *tail >= from {
                *tail = tail.saturating_add_signed(delta);
            }
        }
    }
}
