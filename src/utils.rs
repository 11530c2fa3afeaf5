// ABOUTME: Filesystem helpers for the feed-slides application
// ABOUTME: Validates input files and prepares output directories

use crate::errors::{FeedError, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// Fail unless `path` is an existing regular file.
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(FeedError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(FeedError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Create the directory if needed
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(FeedError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(FeedError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

/// Check an output directory with a throwaway file before a long batch run
/// writes into it.
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    let scratch = path.join(format!(".feed_slides_{}.tmp", uuid::Uuid::new_v4()));
    match fs::File::create(&scratch) {
        Ok(_) => {
            if let Err(e) = fs::remove_file(&scratch) {
                warn!("Failed to clean up scratch file {:?}: {}", scratch, e);
            }
            Ok(())
        }
        Err(e) => Err(FeedError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Read a UTF-8 text input, rejecting blank content.
pub fn read_text_input(path: &Path) -> Result<String> {
    validate_file_exists(path)?;
    let text = fs::read_to_string(path).map_err(FeedError::FileReadError)?;
    if text.trim().is_empty() {
        return Err(FeedError::ValidationError(format!("{:?} is empty", path)));
    }
    Ok(text)
}
