//! Literal content given directly

use spyce_core::{Payload, PayloadType};

use crate::error::{Error, Result};
use crate::flavor::{Flavor, FlavorOptions, Settings};
use crate::kind::FlavorKind;

#[derive(Debug, Clone)]
pub struct InlineFlavor {
    text: String,
    settings: Settings,
}

impl InlineFlavor {
    pub fn new(text: impl Into<String>, options: FlavorOptions) -> Result<Self> {
        let settings = options.resolve(FlavorKind::Inline, None, PayloadType::Text)?;
        Ok(Self {
            text: text.into(),
            settings,
        })
    }
}

impl Flavor for InlineFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::Inline
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn produce_content(&self) -> Result<Payload> {
        Ok(match self.settings.payload_type {
            PayloadType::Text => Payload::Text(self.text.clone()),
            PayloadType::Bytes => Payload::Bytes(self.text.clone().into_bytes()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_a_name() {
        assert!(matches!(
            InlineFlavor::new("x", FlavorOptions::default()),
            Err(Error::NameNotSet { .. })
        ));
    }

    #[test]
    fn bytes_type_stores_utf8() {
        let flavor = InlineFlavor::new(
            "héllo",
            FlavorOptions::named("greeting").with_type(PayloadType::Bytes),
        )
        .unwrap();
        assert_eq!(
            flavor.produce_content().unwrap(),
            Payload::Bytes("héllo".as_bytes().to_vec())
        );
        assert_eq!(flavor.configuration().get_str("flavor"), Some("inline"));
        assert!(flavor.configuration().get_str("source").is_none());
    }
}
