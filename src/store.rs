// ABOUTME: Result store for the feed-slides application
// ABOUTME: Keeps the generated image of each slide index

use crate::errors::{FeedError, Result};
use crate::images::ImageData;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Generated images keyed by slide index.
///
/// Entries are only ever added or replaced, never dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    images: BTreeMap<usize, ImageData>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&ImageData> {
        self.images.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.images.contains_key(&index)
    }

    /// Store an image, returning the one it replaced.
    pub fn insert(&mut self, index: usize, image: ImageData) -> Option<ImageData> {
        self.images.insert(index, image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ImageData)> {
        self.images.iter().map(|(index, image)| (*index, image))
    }

    /// Seed the store from previously exported files named `slide_<NN>_*.png`
    /// so a rerun resumes instead of regenerating.
    pub fn load_exported(dir: &Path) -> Result<Self> {
        let mut store = Self::new();
        if !dir.exists() {
            return Ok(store);
        }
        let pattern = format!(
            "{}/slide_*_*.png",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        for path in (glob::glob(&pattern)
            .map_err(|e| FeedError::ExportError(format!("Invalid glob pattern: {}", e)))?)
        .flatten()
        {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(index) = exported_index(name) else {
                continue;
            };
            match fs::read(&path).map_err(FeedError::FileReadError).and_then(ImageData::from_bytes) {
                Ok(image) => {
                    debug!("Found existing image for slide {}: {:?}", index, path);
                    store.insert(index, image);
                }
                Err(e) => warn!("Ignoring unreadable slide image {:?}: {}", path, e),
            }
        }
        Ok(store)
    }
}

/// Parse the zero-based slide index out of `slide_<NN>_<stem>.png`.
fn exported_index(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("slide_")?.strip_suffix(".png")?;
    let (number, _) = rest.split_once('_')?;
    number.parse::<usize>().ok()?.checked_sub(1)
}
