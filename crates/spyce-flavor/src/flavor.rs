//! The payload producer trait and the settings every flavor shares

use spyce_core::filter::{FLAVOR_KEY, SOURCE_KEY};
use spyce_core::{Compression, Configuration, Encoding, Payload, PayloadType, Spyce};

use crate::error::{Error, Result};
use crate::kind::FlavorKind;

/// Something that can (re)generate a jar's payload.
pub trait Flavor: std::fmt::Debug {
    fn kind(&self) -> FlavorKind;

    fn settings(&self) -> &Settings;

    /// Produce the raw content, typed per [`Flavor::payload_type`].
    fn produce_content(&self) -> Result<Payload>;

    /// Path or URL the content comes from, recorded as `source`.
    fn source(&self) -> Option<String> {
        None
    }

    fn name(&self) -> &str {
        &self.settings().name
    }

    fn payload_type(&self) -> PayloadType {
        self.settings().payload_type
    }

    /// `flavor` and `source` keys describing where the payload came from.
    fn configuration(&self) -> Configuration {
        let mut configuration = Configuration::new();
        configuration.set_reserved(FLAVOR_KEY, self.kind().as_str());
        if let Some(source) = self.source() {
            configuration.set_reserved(SOURCE_KEY, source);
        }
        configuration
    }

    /// A spyce ready to be stored.
    fn spyce(&self) -> Result<Spyce> {
        let settings = self.settings();
        let mut spyce = Spyce::new(settings.name.clone(), self.produce_content()?)
            .with_configuration(self.configuration());
        spyce.encoding = settings.encoding;
        spyce.compression = settings.compression;
        Ok(spyce)
    }
}

/// Name, type, and codec overrides resolved for one flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub name: String,
    pub payload_type: PayloadType,
    pub encoding: Option<Encoding>,
    pub compression: Option<Compression>,
}

/// Optional settings as given by the caller, before defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlavorOptions {
    pub name: Option<String>,
    pub payload_type: Option<PayloadType>,
    pub encoding: Option<Encoding>,
    pub compression: Option<Compression>,
}

impl FlavorOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = Some(payload_type);
        self
    }

    /// Fill in defaults and check the result.
    pub(crate) fn resolve(
        self,
        kind: FlavorKind,
        default_name: Option<String>,
        default_type: PayloadType,
    ) -> Result<Settings> {
        let name = self
            .name
            .or(default_name)
            .filter(|name| !name.is_empty())
            .ok_or(Error::NameNotSet {
                category: kind.as_str(),
            })?;
        spyce_core::validate_name(&name)?;
        Ok(Settings {
            name,
            payload_type: self.payload_type.unwrap_or(default_type),
            encoding: self.encoding,
            compression: self.compression,
        })
    }
}

/// Type raw bytes as the payload type asks.
pub(crate) fn typed_payload(
    payload_type: PayloadType,
    bytes: Vec<u8>,
    origin: &str,
) -> Result<Payload> {
    match payload_type {
        PayloadType::Bytes => Ok(Payload::Bytes(bytes)),
        PayloadType::Text => String::from_utf8(bytes)
            .map(Payload::Text)
            .map_err(|_| Error::NotUtf8 {
                origin: origin.to_string(),
            }),
    }
}
