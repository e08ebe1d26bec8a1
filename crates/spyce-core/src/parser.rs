//! Single-pass scanner that builds the jar index of a line buffer

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::jar::Jar;
use crate::marker::{Marker, MarkerSyntax};
use crate::payload::{Configuration, PayloadType, is_scalar};

/// Jars in file order plus the `section` anchors that were seen.
#[derive(Debug, Default)]
pub struct Parsed {
    pub jars: Vec<Jar>,
    /// Line index of the last `section` marker per payload type
    pub sections: BTreeMap<PayloadType, usize>,
}

struct OpenJar {
    name: String,
    payload_type: PayloadType,
    configuration: Configuration,
    start: usize,
    /// Still reading configuration lines
    in_header: bool,
}

impl OpenJar {
    fn header_end(&self) -> usize {
        self.start + 1 + self.configuration.len()
    }

    fn close(self, end: usize, terminated: bool) -> Jar {
        Jar::new(
            self.name,
            self.payload_type,
            self.configuration,
            self.start,
            end,
            terminated,
        )
    }
}

/// Scan `lines` once and index every jar.
///
/// A start marker while another jar is open, and the end of input with a jar
/// open, both close the open jar right after its header. Whatever payload it
/// had is left in place as ordinary lines.
pub fn parse(lines: &[String], syntax: &MarkerSyntax, file: &str) -> Result<Parsed> {
    let mut parsed = Parsed::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut open: Option<OpenJar> = None;

    for (index, line) in lines.iter().enumerate() {
        let lineno = index + 1;
        let marker = syntax
            .classify(line)
            .map_err(|message| Error::InvalidMarker {
                file: file.to_string(),
                line: lineno,
                message,
            })?;

        match marker {
            Some(Marker::Start { name, payload_type }) => {
                let payload_type = match payload_type {
                    None => PayloadType::Text,
                    Some(raw) => raw.parse().map_err(|_| Error::UnknownPayloadType {
                        file: file.to_string(),
                        line: lineno,
                        payload_type: raw,
                    })?,
                };
                if let Some(previous) = open.take() {
                    tracing::warn!(
                        file,
                        line = lineno,
                        jar = %previous.name,
                        "spyce has no end marker before the next start; treating it as empty"
                    );
                    let end = previous.header_end();
                    parsed.jars.push(previous.close(end, false));
                }
                if !seen.insert(name.clone()) {
                    return Err(Error::DuplicateJar {
                        file: file.to_string(),
                        line: lineno,
                        name,
                    });
                }
                open = Some(OpenJar {
                    name,
                    payload_type,
                    configuration: Configuration::new(),
                    start: index,
                    in_header: true,
                });
            }
            Some(Marker::Config { key, value }) => match open.as_mut() {
                Some(jar) if jar.in_header => {
                    let value = parse_value(&value).map_err(|message| {
                        Error::InvalidConfiguration {
                            file: file.to_string(),
                            line: lineno,
                            key: key.clone(),
                            message,
                        }
                    })?;
                    jar.configuration.push_parsed(key, value);
                }
                _ => {
                    return Err(Error::MisplacedConfiguration {
                        file: file.to_string(),
                        line: lineno,
                        key,
                    });
                }
            },
            Some(Marker::End { name }) => match open.take() {
                Some(jar) if jar.name == name => {
                    tracing::debug!(file, jar = %name, start = jar.start, end = index + 1, "indexed spyce");
                    parsed.jars.push(jar.close(index + 1, true));
                }
                other => {
                    return Err(Error::UnexpectedEnd {
                        file: file.to_string(),
                        line: lineno,
                        name,
                        open: other.map(|jar| jar.name),
                    });
                }
            },
            Some(Marker::Section { payload_type }) => match open.as_mut() {
                Some(jar) => jar.in_header = false,
                None => {
                    parsed.sections.insert(payload_type, index);
                }
            },
            None => {
                if let Some(jar) = open.as_mut() {
                    jar.in_header = false;
                }
            }
        }
    }

    if let Some(jar) = open {
        tracing::warn!(
            file,
            jar = %jar.name,
            line = jar.start + 1,
            "spyce is not terminated at end of file; treating it as empty"
        );
        let end = jar.header_end();
        parsed.jars.push(jar.close(end, false));
    }

    Ok(parsed)
}

fn parse_value(raw: &str) -> std::result::Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if is_scalar(&value) {
        Ok(value)
    } else {
        Err("expected a JSON scalar".to_string())
    }
}
