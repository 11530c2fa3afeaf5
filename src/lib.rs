// ABOUTME: Library module for the feed-slides program.
// ABOUTME: Composes slide prompts and drives batch image generation for carousel posts.

pub mod batch;
pub mod catalog;
pub mod client;
pub mod color;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod export;
pub mod images;
pub mod model;
pub mod prompt;
pub mod references;
pub mod store;
pub mod structure;
pub mod utils;

// Reexport common types and functions
pub use batch::{
    BatchHandle, BatchOptions, BatchReport, Generator, RunState, SlideCallback, SlideStatus,
};
pub use client::{GeminiClient, GenerationClient, dispatch};
pub use config::Config;
pub use credentials::CredentialStore;
pub use errors::{FeedError, Result};
pub use export::{export_archive, export_directory, export_generated, export_slide};
pub use images::ImageData;
pub use model::{Deck, DesignConfig, Project, Slide};
pub use prompt::compile_prompt;
pub use references::{Reference, ReferenceRole, resolve_references};
pub use store::ResultStore;
pub use structure::{PostStructure, parse_structure};

#[cfg(test)]
mod tests;
