// ABOUTME: Prompt composition for the feed-slides application
// ABOUTME: Compiles a project snapshot and one slide into an image-generation prompt

use crate::catalog::{SubtitleDesign, ThemeId};
use crate::model::{
    BackgroundKind, DesignConfig, Project, ResolvedBackground, SectionSettings, Slide, SlideKind,
    resolve_background,
};

const CONTINUITY_CLAUSE: &str = "【重要】ここで作成するキャラクターは{1.表紙}のキャラクターを使用してください (Use the SAME character as Slide 1). ";

const HIGH_SENSE_WARDROBE: &str = "wearing monotone/black-and-white mode fashion (chic, edgy style)";

/// Compile the prompt for one slide.
///
/// Pure and deterministic: the same project and slide always yield the same
/// string. Segments are emitted in a fixed order; optional segments are
/// skipped rather than left empty.
pub fn compile_prompt(project: &Project, slide: Slide<'_>) -> String {
    let design = &project.design;
    let section = slide.section();
    let background = resolve_background(section.background.as_ref(), &design.background);
    let mut p = String::new();

    // Keep later slides on the cover's character
    if matches!(slide.kind(), SlideKind::Main | SlideKind::Summary) {
        p.push_str(CONTINUITY_CLAUSE);
    }

    p.push_str("Instagram feed post design, aspect ratio 4:5 vertical. ");

    push_background(&mut p, design, &background);

    let details = background.description.trim();
    if !details.is_empty() {
        p.push_str(&format!("Background Details: {}. ", details));
    }

    p.push_str(&format!(
        "Style: {}. High quality, 8k, trending on pinterest. ",
        design.theme.atmosphere()
    ));

    if let Some(brand) = design.color.brand_color() {
        p.push_str(&format!(
            "Main Theme Color: {}. Use this color prominently for header bands, accent elements, decorative shapes, highlights, and borders. Derive lighter tints for backgrounds and darker shades for emphasis. ",
            brand
        ));
    }

    p.push_str(&format!(
        "Text Layout: {} with generous whitespace margins/padding. ",
        design.text_align.prompt()
    ));
    p.push_str("Language: Japanese. All text included in the image must be in Japanese. ");

    if design.character.enabled {
        push_character(&mut p, design, section);
    }

    if section.style_reference.is_some() {
        p.push_str("**STYLE REFERENCE**: I have uploaded a style reference image. Please match the overall visual style, color tone, layout composition, and atmosphere of the reference image as closely as possible. ");
    }

    push_layout(&mut p, project, slide);
    push_palette(&mut p, design, background.kind);

    p
}

fn push_background(p: &mut String, design: &DesignConfig, background: &ResolvedBackground<'_>) {
    match background.kind {
        BackgroundKind::White => p.push_str("Background: Pure clean white studio background. "),
        BackgroundKind::Solid => p.push_str(&format!(
            "Background: Solid flat color background (hex color code {}). ",
            background.color
        )),
        BackgroundKind::Frame => p.push_str(&format!(
            "Background: Clean white background with a thick decorative border frame (color: {}) around the entire image edges, about 5-8% width on each side, creating an elegant bordered look. ",
            design.frame_color()
        )),
        // An uploaded bitmap wins over a named style recipe
        BackgroundKind::Image => match (background.image, background.image_style) {
            (Some(_), _) => p.push_str(
                "Background: Use the uploaded background image as the full-bleed background behind all content. ",
            ),
            (None, Some(style)) => p.push_str(&format!("Background: {}. ", style.prompt())),
            (None, None) => p.push_str("Background: Clean neutral background. "),
        },
        BackgroundKind::Theme => {
            p.push_str(&format!("Background: {}. ", design.theme.background()))
        }
    }
}

fn push_character(p: &mut String, design: &DesignConfig, section: &SectionSettings) {
    let character = &design.character;
    let description = if character.description.is_empty() {
        "Person"
    } else {
        character.description.as_str()
    };
    let who = if design.theme == ThemeId::HighSense {
        format!("{} {}", description, HIGH_SENSE_WARDROBE)
    } else {
        description.to_string()
    };
    let expression = if section.expression.is_empty() {
        "neutral expression"
    } else {
        section.expression.as_str()
    };

    let has_image = section.character_image.is_some() || character.global_image().is_some();
    if has_image {
        p.push_str("**IMPORTANT**: I have uploaded a reference image of the character. Please Generate the character based on the uploaded reference image provided in the prompt context. ");
        p.push_str(&format!("Character Description: {}. ", who));
        p.push_str(&format!("Pose/Expression: {}. ", expression));
    } else if design.theme == ThemeId::HighSense {
        p.push_str(&format!(
            "Character: ({}) with ({}) in FULL VIVID NATURAL COLOR (Skin, Hair, Eyes). ",
            who, expression
        ));
    } else {
        p.push_str(&format!("Character: ({}) with ({}). ", who, expression));
    }

    p.push_str(&format!("Shot Type: {}. ", character.size.prompt()));
    p.push_str(&format!(
        "Position: Character is positioned at the {} of the layout. ",
        section.position.prompt()
    ));

    if section.bubble && !section.bubble_text.is_empty() {
        p.push_str(&format!(
            "A speech bubble (balloon) containing Japanese text \"{}\" is near the character. ",
            section.bubble_text
        ));
    }
}

fn push_layout(p: &mut String, project: &Project, slide: Slide<'_>) {
    let design = &project.design;
    match slide {
        Slide::Cover(cover) => {
            let choices = &design.cover;
            p.push_str("LAYOUT: Title Slide. Huge typography design. ");

            if !cover.subtitle.is_empty() {
                p.push_str(&format!(
                    "Subtitle: \"{}\" (in Japanese) is placed at the top. ",
                    cover.subtitle
                ));
                if choices.subtitle_design != SubtitleDesign::None {
                    p.push_str(&format!(
                        "Subtitle Decoration: {}. ",
                        choices.subtitle_design.prompt()
                    ));
                }
            }

            p.push_str(&format!(
                "Main Title: \"{}\" (in Japanese) in center, {}. ",
                flatten(&cover.title),
                design.font.prompt()
            ));
            p.push_str(&format!("Cover Layout: {}. ", choices.layout.prompt()));
            p.push_str(&format!("Title Text Design: {}. ", choices.title_design.prompt()));

            let extras = [
                ("Swipe Guide", choices.swipe_guide.prompt()),
                ("Eye-Catch Badge", choices.eye_catch_badge.prompt()),
                ("Decoration", choices.decoration.prompt()),
                ("Spacing", choices.margin.prompt()),
                ("Title Emphasis", choices.title_emphasis.prompt()),
            ];
            for (name, fragment) in extras {
                if !fragment.is_empty() {
                    p.push_str(&format!("{}: {}. ", name, fragment));
                }
            }

            if design.theme == ThemeId::HighSense {
                p.push_str("Design: Stylish Matte Mode, using abstract geometric patterns or architectural shapes to create a cool, avant-garde look. Not glossy, but sophisticated and high-end. ");
            } else {
                p.push_str("Design: Eye-catching, high contrast. ");
            }
        }
        Slide::Intro(intro) => {
            p.push_str("LAYOUT: Introduction Slide. ");
            p.push_str(&format!(
                "TOP HEADER: Display the main title \"{}\" on a stylish header band strip at the very top. ",
                flatten(&project.deck.cover.title)
            ));
            p.push_str(&format!(
                "TEXT: \"{}\" (in Japanese) clearly written in the main area. ",
                flatten(&intro.text)
            ));
            p.push_str("Design: Storytelling vibe.");
        }
        Slide::Main(_, main) => {
            p.push_str("LAYOUT: Content Slide. Structure: Top header band, Center Image, Bottom text area. ");
            p.push_str(&format!(
                "TOP: Header strip band with title \"{}\" (in Japanese). ",
                main.title
            ));
            p.push_str(&format!("CENTER: Main visual is ({}). ", main.image_description));
            p.push_str(&format!(
                "BOTTOM: Short explanation text area \"{}\" (in Japanese). ",
                flatten(&main.text)
            ));
        }
        Slide::Summary(summary) => {
            p.push_str("LAYOUT: Summary/Conclusion Slide. ");
            p.push_str("TOP: Header strip band with title \"まとめ\" or \"SUMMARY\". ");
            p.push_str(&format!(
                "CONTENT: Bullet point list in Japanese: {}. ",
                summary.items.join(", ")
            ));
        }
    }
}

/// Trailing palette segment. Non-theme, non-frame backgrounds only get one with
/// a custom brand color.
fn push_palette(p: &mut String, design: &DesignConfig, kind: BackgroundKind) {
    let brand = design.color.brand_color();
    match kind {
        BackgroundKind::Theme => {
            match brand {
                Some(color) => p.push_str(&format!(
                    " Color palette: The main/brand color is {}. Use this hex color for header bands, accent borders, highlights, and decorative elements. Background should use a very light tint of this color.",
                    color
                )),
                None => {
                    let band = design.theme.colors().band;
                    if band.contains("yellow") {
                        p.push_str(" Color palette: Yellow and Pop accents.");
                    }
                    if band.contains("blue") {
                        p.push_str(" Color palette: Blue and Professional accents.");
                    }
                }
            }

            if design.theme == ThemeId::HighSense {
                match brand {
                    Some(color) => p.push_str(&format!(
                        " **CRITICAL STYLE INSTRUCTION**: MONOTONE BASE with {} as the vivid accent color. The character/subject MUST be in FULL COLOR.",
                        color
                    )),
                    None => p.push_str(" **CRITICAL STYLE INSTRUCTION**: The overall image should be MONOTONE BASE (grayscale/black and white) but with STYLISH COLOR ACCENTS. The background should be primarily matte monochrome with geometric/architectural patterns, but can feature minimal, sharp splashes of vivid color (like neon lines or geometric shapes) as accents. The character/subject MUST be in FULL COLOR (Natural Skin tones) to serve as the main focal point against the monotone backdrop. Create a high-end, edgy contrast between the grayscale elements and the specific color accents."),
                }
            }
        }
        BackgroundKind::Frame => match brand {
            Some(color) => p.push_str(&format!(
                " Frame/Border Color: {}. Use this as the frame border color and accent color for header bands and decorative elements.",
                color
            )),
            None => p.push_str(" Frame/Border Color: Use the theme's accent color for the frame border."),
        },
        _ => {
            if let Some(color) = brand {
                p.push_str(&format!(
                    " Accent/Brand Color: Use {} as the main accent color for text bands, highlights, borders, and decorative elements.",
                    color
                ));
            }
        }
    }
}

/// Collapse line breaks so multi-line titles read as one phrase.
fn flatten(text: &str) -> String {
    text.replace('\n', " ")
}
