//! Self-bootstrap reader: Python source that decodes jars at the target's runtime

use spyce_core::{MarkerSyntax, Payload, PayloadType};

use crate::error::{Error, Result};
use crate::flavor::{Flavor, FlavorOptions, Settings};
use crate::kind::FlavorKind;

/// Name of the jar when none is given.
pub const DEFAULT_API_NAME: &str = "spyce";

const TEMPLATE: &str = include_str!("bootstrap.py");

/// Emits `get_spyce(name, file=None)` for the host script to read its own jars.
#[derive(Debug, Clone)]
pub struct ApiFlavor {
    syntax: MarkerSyntax,
    settings: Settings,
}

impl ApiFlavor {
    pub fn new(options: FlavorOptions) -> Result<Self> {
        let settings = options.resolve(
            FlavorKind::Api,
            Some(DEFAULT_API_NAME.to_string()),
            PayloadType::Text,
        )?;
        if settings.payload_type != PayloadType::Text {
            return Err(Error::UnsupportedType {
                category: FlavorKind::Api.as_str(),
                payload_type: settings.payload_type,
            });
        }
        Ok(Self {
            syntax: MarkerSyntax::default(),
            settings,
        })
    }

    /// Read markers written with `syntax` instead of the default one.
    pub fn with_syntax(mut self, syntax: MarkerSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// The generated Python source.
    pub fn render(&self) -> String {
        TEMPLATE
            .replace("__VERSION__", env!("CARGO_PKG_VERSION"))
            .replace("__PREFIX__", &python_str(self.syntax.comment_prefix()))
            .replace("__KEYWORD__", &python_str(self.syntax.keyword()))
    }
}

fn python_str(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

impl Flavor for ApiFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::Api
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn produce_content(&self) -> Result<Payload> {
        Ok(Payload::Text(self.render()))
    }
}
