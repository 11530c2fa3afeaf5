// ABOUTME: Reference image resolution for the feed-slides application
// ABOUTME: Picks the character, style and background images sent along with a prompt

use crate::images::ImageData;
use crate::model::{BackgroundKind, Project, Slide, resolve_background};

/// Role of a reference image within a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Character,
    Style,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference<'a> {
    pub role: ReferenceRole,
    pub image: &'a ImageData,
}

/// Resolve the reference images for one slide, in submission order:
/// character, style reference, background.
///
/// The first entry is the primary reference when only one is present.
pub fn resolve_references<'a>(project: &'a Project, slide: Slide<'a>) -> Vec<Reference<'a>> {
    let design = &project.design;
    let section = slide.section();

    let character = section
        .character_image
        .as_ref()
        .or_else(|| design.character.global_image());
    let style = section.style_reference.as_ref();
    let background = resolve_background(section.background.as_ref(), &design.background);
    // Only an uploaded bitmap counts; a named style is described in the prompt instead
    let background_image = match background.kind {
        BackgroundKind::Image => background.image,
        _ => None,
    };

    [
        (ReferenceRole::Character, character),
        (ReferenceRole::Style, style),
        (ReferenceRole::Background, background_image),
    ]
    .into_iter()
    .filter_map(|(role, image)| image.map(|image| Reference { role, image }))
    .collect()
}
