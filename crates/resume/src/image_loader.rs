//! Profile image loading
//!
//! An image comes either inline as a data URI or from a remote URL. Loading
//! never fails a render: every problem is logged and reported as "no image".

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use std::time::Duration;
use thiserror::Error;

/// Standard alphabet, padding optional, trailing bits tolerated
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Reasons an image could not be loaded
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("image payload is empty")]
    Empty,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Raw image file bytes, format not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer(Vec<u8>);

impl ImageBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Fetches the body of a remote image
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// `ImageFetcher` performing one blocking HTTP GET
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Resolves a record's image fields to bytes
#[derive(Debug, Clone)]
pub struct ImageLoader<F = HttpFetcher> {
    fetcher: F,
}

impl<F: ImageFetcher> ImageLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load the profile image
    ///
    /// Inline `data` takes precedence over `url`; the URL is not fetched when
    /// data is present, even if the data is malformed. Blank values count as
    /// absent.
    pub fn load(&self, url: Option<&str>, data: Option<&str>) -> Option<ImageBuffer> {
        let data = data.filter(|d| !d.trim().is_empty());
        let url = url.map(str::trim).filter(|u| !u.is_empty());

        let result = match (data, url) {
            (Some(data), _) => {
                log::debug!("Loading profile image from inline data ({} bytes)", data.len());
                decode_data_uri(data)
            }
            (None, Some(url)) => {
                log::debug!("Fetching profile image from {url}");
                self.fetch(url)
            }
            (None, None) => return None,
        };

        match result {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Profile image unavailable: {e}");
                None
            }
        }
    }

    fn fetch(&self, url: &str) -> Result<ImageBuffer, ImageError> {
        let bytes = self.fetcher.fetch(url)?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(ImageBuffer::new(bytes))
    }
}

/// Decode an inline image (`data:<mime>;base64,<payload>`)
///
/// Everything up to the first comma is ignored; without a comma the whole
/// text is the payload. Whitespace inside the payload is skipped and the
/// URL-safe alphabet is accepted alongside the standard one.
pub fn decode_data_uri(data: &str) -> Result<ImageBuffer, ImageError> {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };

    let normalized: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    if normalized.is_empty() {
        return Err(ImageError::Empty);
    }

    let bytes = LENIENT_BASE64.decode(normalized.as_bytes())?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    Ok(ImageBuffer::new(bytes))
}
