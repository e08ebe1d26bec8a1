//! Encoding of payloads into embeddable lines and back
//!
//! Text payloads are stored verbatim, one line per `\n`-separated piece.
//! Bytes payloads are optionally gzip-compressed, base64 or base85 encoded,
//! then hard-wrapped into sentinel-prefixed lines.
//!
//! Every payload type has one [`Codec`] entry in a static table, picked with
//! [`PayloadType::codec`].

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde_json::Value;

use crate::payload::{Configuration, Payload, PayloadType};

/// Default width of a bytes line, sentinel included.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;

/// Configuration key naming the base-N alphabet of a bytes jar.
pub const ENCODING_KEY: &str = "encoding";

/// Configuration key naming the compression of a bytes jar.
pub const COMPRESSION_KEY: &str = "compression";

/// Errors raised while encoding or decoding one jar.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("payload line {line} does not start with the sentinel {sentinel:?}")]
    MissingSentinel { line: usize, sentinel: String },

    #[error("invalid {encoding} data: {message}")]
    InvalidData { encoding: Encoding, message: String },

    #[error("max line length {max_line_length} leaves no room after the sentinel {sentinel:?}")]
    LineLengthTooSmall {
        max_line_length: usize,
        sentinel: String,
    },

    #[error("unknown encoding {0:?} (expected 'base64' or 'base85')")]
    UnknownEncoding(String),

    #[error("unknown compression {0:?} (expected 'gzip' or 'none')")]
    UnknownCompression(String),

    #[error("gzip compression failed: {0}")]
    Compress(#[source] std::io::Error),

    #[error("gzip stream is corrupt: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("text payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Base-N alphabet for bytes payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Base64,
    /// RFC 1924 alphabet
    Base85,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base85 => "base85",
        }
    }

    fn encode(&self, data: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(data),
            Self::Base85 => base85::encode(data),
        }
    }

    fn decode(&self, data: &str) -> Result<Vec<u8>, CodecError> {
        let decoded = match self {
            Self::Base64 => STANDARD.decode(data).map_err(|e| e.to_string()),
            Self::Base85 => base85::decode(data),
        };
        decoded.map_err(|message| CodecError::InvalidData {
            encoding: *self,
            message,
        })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" | "b64" => Ok(Self::Base64),
            "base85" | "b85" => Ok(Self::Base85),
            other => Err(CodecError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Compression applied before base-N encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
        }
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::best());
                encoder.write_all(data).map_err(CodecError::Compress)?;
                encoder.finish().map_err(CodecError::Compress)
            }
        }
    }

    /// An empty stream is an emptied jar, not a truncated gzip member.
    fn decompress(&self, data: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        match self {
            _ if data.is_empty() => Ok(data),
            Self::None => Ok(data),
            Self::Gzip => {
                let mut out = Vec::new();
                GzDecoder::new(data.as_slice())
                    .read_to_end(&mut out)
                    .map_err(CodecError::Decompress)?;
                Ok(out)
            }
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "gzip" | "gz" => Ok(Self::Gzip),
            other => Err(CodecError::UnknownCompression(other.to_string())),
        }
    }
}

/// Knobs for encoding bytes payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Width of a bytes line, sentinel included
    pub max_line_length: usize,
    pub encoding: Encoding,
    pub compression: Compression,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            encoding: Encoding::default(),
            compression: Compression::default(),
        }
    }
}

impl CodecOptions {
    /// Options as recorded in a jar's reserved configuration keys.
    ///
    /// Missing keys fall back to `self`.
    pub fn from_configuration(&self, configuration: &Configuration) -> Result<Self, CodecError> {
        let mut options = *self;
        if let Some(value) = configuration.get(ENCODING_KEY) {
            options.encoding = scalar_str(value).parse()?;
        }
        if let Some(value) = configuration.get(COMPRESSION_KEY) {
            options.compression = scalar_str(value).parse()?;
        }
        Ok(options)
    }

    /// Record non-default encoding and compression in `configuration`,
    /// removing keys that would restate the defaults.
    pub fn write_configuration(&self, configuration: &mut Configuration) {
        if self.encoding == Encoding::default() {
            configuration.remove(ENCODING_KEY);
        } else {
            configuration.set_unchecked(ENCODING_KEY, Value::from(self.encoding.as_str()));
        }
        if self.compression == Compression::default() {
            configuration.remove(COMPRESSION_KEY);
        } else {
            configuration.set_unchecked(COMPRESSION_KEY, Value::from(self.compression.as_str()));
        }
    }
}

fn scalar_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Everything a codec needs besides the payload.
#[derive(Debug, Clone, Copy)]
pub struct CodecContext<'a> {
    pub sentinel: &'a str,
    pub options: CodecOptions,
}

type EncodeFn = fn(&Payload, &CodecContext<'_>) -> Result<Vec<String>, CodecError>;
type DecodeFn = fn(&[&str], &CodecContext<'_>) -> Result<Payload, CodecError>;

/// Encoder/decoder pair for one payload type.
pub struct Codec {
    pub payload_type: PayloadType,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("payload_type", &self.payload_type)
            .finish_non_exhaustive()
    }
}

impl Codec {
    /// Encode into newline-terminated lines.
    pub fn encode(&self, payload: &Payload, ctx: &CodecContext<'_>) -> Result<Vec<String>, CodecError> {
        (self.encode)(payload, ctx)
    }

    /// Decode lines as they appear between the jar's header and end marker.
    pub fn decode(&self, lines: &[&str], ctx: &CodecContext<'_>) -> Result<Payload, CodecError> {
        (self.decode)(lines, ctx)
    }
}

static CODECS: [Codec; 2] = [
    Codec {
        payload_type: PayloadType::Text,
        encode: encode_text,
        decode: decode_text,
    },
    Codec {
        payload_type: PayloadType::Bytes,
        encode: encode_bytes,
        decode: decode_bytes,
    },
];

impl PayloadType {
    pub fn codec(self) -> &'static Codec {
        match self {
            PayloadType::Text => &CODECS[0],
            PayloadType::Bytes => &CODECS[1],
        }
    }
}

fn encode_text(payload: &Payload, _ctx: &CodecContext<'_>) -> Result<Vec<String>, CodecError> {
    let text = match payload {
        Payload::Text(text) => text.clone(),
        Payload::Bytes(bytes) => String::from_utf8(bytes.clone())?,
    };
    Ok(text.split('\n').map(|piece| format!("{piece}\n")).collect())
}

fn decode_text(lines: &[&str], _ctx: &CodecContext<'_>) -> Result<Payload, CodecError> {
    let mut text = lines.concat();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(Payload::Text(text))
}

fn encode_bytes(payload: &Payload, ctx: &CodecContext<'_>) -> Result<Vec<String>, CodecError> {
    let width = chunk_width(ctx)?;
    let compressed = ctx.options.compression.compress(payload.as_bytes())?;
    let encoded = ctx.options.encoding.encode(&compressed);

    // base64 and base85 output is ASCII, so byte chunks are char chunks
    Ok(encoded
        .as_bytes()
        .chunks(width)
        .map(|chunk| {
            let mut line = String::with_capacity(ctx.sentinel.len() + chunk.len() + 1);
            line.push_str(ctx.sentinel);
            line.push_str(&String::from_utf8_lossy(chunk));
            line.push('\n');
            line
        })
        .collect())
}

fn decode_bytes(lines: &[&str], ctx: &CodecContext<'_>) -> Result<Payload, CodecError> {
    let mut encoded = String::new();
    for (index, line) in lines.iter().enumerate() {
        let data = line
            .trim_end()
            .strip_prefix(ctx.sentinel)
            .ok_or_else(|| CodecError::MissingSentinel {
                line: index + 1,
                sentinel: ctx.sentinel.to_string(),
            })?;
        encoded.push_str(data.trim());
    }
    let decoded = ctx.options.encoding.decode(&encoded)?;
    let raw = ctx.options.compression.decompress(decoded)?;
    Ok(Payload::Bytes(raw))
}

fn chunk_width(ctx: &CodecContext<'_>) -> Result<usize, CodecError> {
    let sentinel_len = ctx.sentinel.chars().count();
    if ctx.options.max_line_length <= sentinel_len {
        return Err(CodecError::LineLengthTooSmall {
            max_line_length: ctx.options.max_line_length,
            sentinel: ctx.sentinel.to_string(),
        });
    }
    Ok(ctx.options.max_line_length - sentinel_len)
}

mod base85 {
    //! RFC 1924 base85, padded the same way as Python's `base64.b85encode`.

    const ALPHABET: &[u8; 85] =
        b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

    fn digit(c: u8) -> Option<u32> {
        ALPHABET.iter().position(|&a| a == c).map(|p| p as u32)
    }

    pub(super) fn encode(data: &[u8]) -> String {
        let padding = (4 - data.len() % 4) % 4;
        let mut out = Vec::with_capacity((data.len() + padding) / 4 * 5);
        for chunk in data.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            let mut acc = u32::from_be_bytes(word);
            let mut group = [0u8; 5];
            for slot in group.iter_mut().rev() {
                *slot = ALPHABET[(acc % 85) as usize];
                acc /= 85;
            }
            out.extend_from_slice(&group);
        }
        out.truncate(out.len() - padding);
        String::from_utf8_lossy(&out).into_owned()
    }

    pub(super) fn decode(text: &str) -> Result<Vec<u8>, String> {
        let bytes = text.as_bytes();
        let padding = (5 - bytes.len() % 5) % 5;
        let mut out = Vec::with_capacity((bytes.len() + padding) / 5 * 4);
        for (index, chunk) in bytes.chunks(5).enumerate() {
            let mut acc: u32 = 0;
            for i in 0..5 {
                let c = chunk.get(i).copied().unwrap_or(b'~');
                let d = digit(c)
                    .ok_or_else(|| format!("bad character {:?} in group {index}", c as char))?;
                acc = acc
                    .checked_mul(85)
                    .and_then(|a| a.checked_add(d))
                    .ok_or_else(|| format!("group {index} overflows 32 bits"))?;
            }
            out.extend_from_slice(&acc.to_be_bytes());
        }
        out.truncate(out.len() - padding);
        Ok(out)
    }
}
