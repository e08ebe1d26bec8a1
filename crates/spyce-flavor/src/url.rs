//! Content fetched over HTTP

use std::time::Duration;

use spyce_core::{Payload, PayloadType};

use crate::error::{Error, Result};
use crate::flavor::{Flavor, FlavorOptions, Settings, typed_payload};
use crate::kind::FlavorKind;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Body of an HTTP GET, bytes unless told otherwise.
#[derive(Debug, Clone)]
pub struct UrlFlavor {
    url: String,
    settings: Settings,
}

impl UrlFlavor {
    pub fn new(url: impl Into<String>, options: FlavorOptions) -> Result<Self> {
        let url = url.into();
        let settings = options.resolve(FlavorKind::Url, default_name(&url), PayloadType::Bytes)?;
        Ok(Self { url, settings })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Last non-empty path segment of the URL.
fn default_name(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let (_, path) = path.split_once('/')?;
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

impl Flavor for UrlFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::Url
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn source(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn produce_content(&self) -> Result<Payload> {
        let http = |source| Error::Http {
            url: self.url.clone(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(http)?;
        let response = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http)?;
        let bytes = response.bytes().map_err(http)?.to_vec();
        tracing::info!(url = %self.url, bytes = bytes.len(), "fetched");
        typed_payload(self.settings.payload_type, bytes, &self.url)
    }
}
