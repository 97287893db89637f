//! Encoding of wizard answers into URL path segments.
//!
//! The wizard keeps no server side state: every answer given so far travels
//! in the path of the next page. Each answer is one path segment, percent
//! encoded so that spaces, slashes and reserved characters survive the trip.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use kitinit_utils::is_release_tag;
use serde_json::Value;

use crate::error::{Result, WizardError};
use crate::extensions;

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ~`.
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn decode_segment(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .map_err(|_| WizardError::bad_request(format!("Invalid URL segment: {}", segment)))
}

pub fn encode_extensions(extensions: &[String]) -> String {
    let json = Value::from(extensions.to_vec()).to_string();
    encode_segment(&json)
}

/// Every entry must be a package from the extension catalogue.
pub fn decode_extensions(segment: &str) -> Result<Vec<String>> {
    let json = decode_segment(segment)?;
    let packages: Vec<String> = serde_json::from_str(&json)
        .map_err(|_| WizardError::bad_request(format!("Invalid extensions list: {}", json)))?;
    match packages.iter().find(|package| extensions::find(package).is_none()) {
        Some(unknown) => Err(WizardError::bad_request(format!("Unknown extension: {}", unknown))),
        None => Ok(packages),
    }
}

pub fn encode_directory(directory: &Path) -> String {
    encode_segment(&directory.to_string_lossy())
}

/// Directories in the URL are always absolute.
pub fn decode_directory(segment: &str) -> Result<PathBuf> {
    let directory = PathBuf::from(decode_segment(segment)?);
    if directory.is_absolute() {
        Ok(directory)
    } else {
        Err(WizardError::bad_request(format!(
            "Not an absolute directory: {}",
            directory.display()
        )))
    }
}

pub fn decode_release(segment: &str) -> Result<String> {
    let release = decode_segment(segment)?;
    if is_release_tag(&release) {
        Ok(release)
    } else {
        Err(WizardError::bad_request(format!("Unknown release: {}", release)))
    }
}

pub fn decode_service_name(segment: &str) -> Result<String> {
    let service_name = decode_segment(segment)?;
    if service_name.trim().is_empty() {
        Err(WizardError::bad_request("Missing service name"))
    } else {
        Ok(service_name)
    }
}

/// Builds `key=value&...` with both sides percent-encoded.
pub fn encode_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_segment(key), encode_segment(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Everything a finished wizard run has collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardAnswers {
    pub release: String,
    pub service_name: String,
    pub directory: PathBuf,
    pub extensions: Vec<String>,
}

impl WizardAnswers {
    pub fn to_segments(&self) -> [String; 4] {
        [
            encode_segment(&self.release),
            encode_segment(&self.service_name),
            encode_directory(&self.directory),
            encode_extensions(&self.extensions),
        ]
    }

    pub fn from_segments(
        release: &str,
        service_name: &str,
        directory: &str,
        extensions: &str,
    ) -> Result<Self> {
        Ok(Self {
            release: decode_release(release)?,
            service_name: decode_service_name(service_name)?,
            directory: decode_directory(directory)?,
            extensions: decode_extensions(extensions)?,
        })
    }
}
