// ABOUTME: Export module for the feed-slides application
// ABOUTME: Writes generated slides as PNG files or as a single ZIP archive

use crate::errors::{FeedError, Result};
use crate::images::ImageData;
use crate::model::Deck;
use crate::store::ResultStore;
use crate::utils::{ensure_directory_exists, ensure_parent_directory_exists};
use image::ImageOutputFormat;
use log::{debug, info, warn};
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::{ZipWriter, write::FileOptions};

/// File name of the bulk archive.
pub const ARCHIVE_NAME: &str = "insta_feed_slides.zip";

/// Replace everything outside ASCII alphanumerics and the U+3000..U+9FFF
/// block (kana and common CJK) with `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{3000}'..='\u{9FFF}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `slide_<NN>_<sanitized title>.png`, numbered from 1.
pub fn slide_file_name(index: usize, title: &str) -> String {
    format!("slide_{:02}_{}.png", index + 1, sanitize_title(title))
}

/// PNG bytes for an image, transcoding other formats.
pub fn png_bytes(image: &ImageData) -> Result<Vec<u8>> {
    if image.mime_type == "image/png" {
        return Ok(image.data.clone());
    }
    debug!("Transcoding {} image to PNG", image.mime_type);
    let decoded = image::load_from_memory(&image.data)
        .map_err(|e| FeedError::InvalidImage(format!("Cannot decode {}: {}", image.mime_type, e)))?;
    let mut buffer = Cursor::new(Vec::new());
    decoded
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| FeedError::ExportError(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Write one generated slide, named after its display label.
///
/// Returns `None` when the slide has no image yet.
pub fn export_slide(
    deck: &Deck,
    store: &ResultStore,
    index: usize,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let slide = deck.slide(index).ok_or(FeedError::SlideNotFound(index))?;
    let Some(image) = store.get(index) else {
        return Ok(None);
    };

    let path = dir.join(slide_file_name(index, &slide.label()));
    ensure_parent_directory_exists(&path)?;
    fs::write(&path, png_bytes(image)?).map_err(FeedError::FileReadError)?;
    info!("Saved slide {} to {:?}", index + 1, path);
    Ok(Some(path))
}

/// Write one image into `dir` as `slide_<NN>_<stem>.png`, the name a later
/// run resumes from.
pub fn export_generated(deck: &Deck, index: usize, image: &ImageData, dir: &Path) -> Result<PathBuf> {
    let slide = deck.slide(index).ok_or(FeedError::SlideNotFound(index))?;
    ensure_directory_exists(dir)?;
    let path = dir.join(slide_file_name(index, &slide.export_stem()));
    fs::write(&path, png_bytes(image)?).map_err(FeedError::FileReadError)?;
    debug!("Wrote {:?}", path);
    Ok(path)
}

/// Write every generated slide into `dir` as `slide_<NN>_<stem>.png`.
pub fn export_directory(deck: &Deck, store: &ResultStore, dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory_exists(dir)?;
    let mut written = Vec::new();
    for index in 0..deck.len() {
        let Some(image) = store.get(index) else {
            continue;
        };
        written.push(export_generated(deck, index, image, dir)?);
    }
    info!("Saved {} slide image(s) to {:?}", written.len(), dir);
    Ok(written)
}

/// Write one archive entry per generated slide; returns the entry count.
pub fn write_archive<W: Write + Seek>(deck: &Deck, store: &ResultStore, writer: W) -> Result<usize> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default();
    let mut entries = 0;

    for (index, slide) in deck.slides().iter().enumerate() {
        let Some(image) = store.get(index) else {
            continue;
        };
        let name = slide_file_name(index, &slide.export_stem());
        debug!("Adding {} to archive", name);
        zip.start_file(name, options)?;
        zip.write_all(&png_bytes(image)?)?;
        entries += 1;
    }

    zip.finish()?;
    Ok(entries)
}

/// Write `insta_feed_slides.zip` into `dir`.
///
/// Nothing is written, and `None` returned, when no slide has been generated.
pub fn export_archive(deck: &Deck, store: &ResultStore, dir: &Path) -> Result<Option<PathBuf>> {
    let generated = (0..deck.len()).filter(|i| store.contains(*i)).count();
    if generated == 0 {
        warn!("No generated slides to archive");
        return Ok(None);
    }

    ensure_directory_exists(dir)?;
    let path = dir.join(ARCHIVE_NAME);
    let file = fs::File::create(&path).map_err(FeedError::FileReadError)?;
    let entries = write_archive(deck, store, file)?;
    info!("Archive with {} slide(s) created at {:?}", entries, path);
    Ok(Some(path))
}
