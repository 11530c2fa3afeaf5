// ABOUTME: Image payload handling for the feed-slides application
// ABOUTME: Loads reference images from local files or remote URLs and encodes data URLs

use crate::errors::{FeedError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_ATTEMPTS: u32 = 3;
const FETCH_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// An image held in memory together with its mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Build from raw bytes, sniffing the mime type from the content.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data)
            .map_err(|e| FeedError::InvalidImage(format!("Unrecognized image content: {}", e)))?;
        Ok(Self::new(mime_for_format(format), data))
    }

    /// Build from base64 payload as returned by the generation service.
    pub fn from_base64(mime_type: &str, payload: &str) -> Result<Self> {
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| FeedError::InvalidImage(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime_type, data))
    }

    /// Parse `data:<mime>;base64,<payload>`. A missing mime type defaults to `image/png`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| FeedError::InvalidImage("Not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| FeedError::InvalidImage("Data URL has no payload".to_string()))?;
        let mime_type = header
            .split(';')
            .next()
            .filter(|mime| !mime.is_empty())
            .unwrap_or("image/png");
        Self::from_base64(mime_type, payload)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        ImageData::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}

fn mime_for_format(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Where a reference image comes from: a data URL, a local path or a remote URL.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub path: String,
    pub is_remote: bool,
}

impl ImageSource {
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    pub fn is_data_url(&self) -> bool {
        self.path.starts_with("data:")
    }

    /// Load the image, resolving relative local paths against `base_dir`.
    pub fn load(&self, base_dir: &Path) -> Result<ImageData> {
        if self.is_data_url() {
            ImageData::from_data_url(&self.path)
        } else if self.is_remote {
            ImageData::from_bytes(self.fetch_remote()?)
        } else {
            ImageData::from_bytes(self.read_local(base_dir)?)
        }
    }

    /// Download a remote image, retrying transient failures with doubling delays.
    fn fetch_remote(&self) -> Result<Vec<u8>> {
        info!("Fetching remote image: {}", self.path);
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(FeedError::FetchError)?;

        let mut delay = FETCH_INITIAL_BACKOFF;
        let mut attempt = 1;
        loop {
            let outcome = client
                .get(&self.path)
                .send()
                .map_err(FeedError::FetchError)
                .and_then(|response| {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(FeedError::ServiceError {
                            status: status.as_u16(),
                            message: format!("while fetching {}", self.path),
                        });
                    }
                    Ok(response.bytes().map_err(FeedError::FetchError)?.to_vec())
                });

            match outcome {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < FETCH_ATTEMPTS => {
                    warn!("Image fetch attempt {} failed ({}), retrying in {:?}", attempt, e, delay);
                    std::thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn read_local(&self, base_dir: &Path) -> Result<Vec<u8>> {
        let path = base_dir.join(&self.path);
        info!("Reading local image: {:?}", path);
        if !path.exists() {
            return Err(FeedError::PathNotFoundError(path));
        }
        fs::read(&path).map_err(FeedError::FileReadError)
    }
}
