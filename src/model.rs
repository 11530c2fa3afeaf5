// ABOUTME: Configuration model for the feed-slides application
// ABOUTME: Design snapshot, slide deck, per-section overrides and project file loading

use crate::catalog::{
    BackgroundImageStyle, CharacterSize, CoverLayout, DecorationEffect, EyeCatchBadge, FontStyle,
    MarginLevel, Position, SubtitleDesign, SwipeGuide, TextAlign, ThemeId, TitleDesign,
    TitleEmphasis,
};
use crate::color::{self, BrandPalette};
use crate::errors::{FeedError, Result};
use crate::images::{ImageData, ImageSource};
use crate::structure::PostStructure;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const MAX_MAIN_SLIDES: usize = 7;
pub const MAX_SUMMARY_ITEMS: usize = 7;

const DEFAULT_SOLID_COLOR: &str = "#E2E8F0";

/// Keys in a project file whose values are images.
const IMAGE_KEYS: &[&str] = &["image", "character_image", "style_reference", "uploaded_image"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    White,
    Solid,
    Theme,
    Frame,
    Image,
}

/// The deck-wide default background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalBackground {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub color: String,
    pub image: Option<ImageData>,
    pub image_style: Option<BackgroundImageStyle>,
    pub description: String,
}

impl Default for GlobalBackground {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Theme,
            color: DEFAULT_SOLID_COLOR.to_string(),
            image: None,
            image_style: None,
            description: String::new(),
        }
    }
}

/// A per-slide background. With a type set it replaces the type, color, image
/// and image style of the global default for that slide only. A null or absent
/// type inherits the global background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOverride {
    #[serde(rename = "type")]
    pub kind: Option<BackgroundKind>,
    pub color: String,
    pub image: Option<ImageData>,
    pub image_style: Option<BackgroundImageStyle>,
    pub description: String,
}

impl Default for BackgroundOverride {
    fn default() -> Self {
        Self {
            kind: None,
            color: DEFAULT_SOLID_COLOR.to_string(),
            image: None,
            image_style: None,
            description: String::new(),
        }
    }
}

/// Effective background of one slide after override resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBackground<'a> {
    pub kind: BackgroundKind,
    pub color: &'a str,
    pub image: Option<&'a ImageData>,
    pub image_style: Option<BackgroundImageStyle>,
    pub description: &'a str,
}

/// Apply a section override on top of the global default.
///
/// An override without a type keeps the global type, color and style, and only
/// contributes its own image and description. A blank description always falls
/// back to the global one.
pub fn resolve_background<'a>(
    section: Option<&'a BackgroundOverride>,
    global: &'a GlobalBackground,
) -> ResolvedBackground<'a> {
    match section {
        Some(o) => {
            let description = if o.description.trim().is_empty() {
                &global.description
            } else {
                &o.description
            };
            match o.kind {
                Some(kind) => ResolvedBackground {
                    kind,
                    color: if o.color.trim().is_empty() {
                        &global.color
                    } else {
                        &o.color
                    },
                    image: o.image.as_ref(),
                    image_style: o.image_style,
                    description,
                },
                None => ResolvedBackground {
                    kind: global.kind,
                    color: &global.color,
                    image: o.image.as_ref().or(global.image.as_ref()),
                    image_style: global.image_style,
                    description,
                },
            }
        }
        None => ResolvedBackground {
            kind: global.kind,
            color: &global.color,
            image: global.image.as_ref(),
            image_style: global.image_style,
            description: &global.description,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub use_custom: bool,
    pub custom_color: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            use_custom: false,
            custom_color: color::FALLBACK_BRAND_COLOR.to_string(),
        }
    }
}

impl ColorConfig {
    /// The validated brand color, or `None` when theme colors are in use.
    pub fn brand_color(&self) -> Option<&str> {
        self.use_custom
            .then(|| color::valid_brand_color(&self.custom_color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterSource {
    #[default]
    Ai,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub enabled: bool,
    pub source: CharacterSource,
    pub description: String,
    pub uploaded_image: Option<ImageData>,
    pub size: CharacterSize,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: CharacterSource::Ai,
            description: "カジュアルな服装の笑顔の日本人女性".to_string(),
            uploaded_image: None,
            size: CharacterSize::Medium,
        }
    }
}

impl CharacterConfig {
    /// The globally uploaded character image, only while upload mode is active.
    pub fn global_image(&self) -> Option<&ImageData> {
        match self.source {
            CharacterSource::Upload => self.uploaded_image.as_ref(),
            CharacterSource::Ai => None,
        }
    }
}

/// Cover-only layout choices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverDesign {
    pub layout: CoverLayout,
    pub title_design: TitleDesign,
    pub subtitle_design: SubtitleDesign,
    pub swipe_guide: SwipeGuide,
    pub eye_catch_badge: EyeCatchBadge,
    pub decoration: DecorationEffect,
    pub margin: MarginLevel,
    pub title_emphasis: TitleEmphasis,
}

/// Immutable snapshot of every deck-wide design choice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub theme: ThemeId,
    pub font: FontStyle,
    pub text_align: TextAlign,
    pub background: GlobalBackground,
    pub color: ColorConfig,
    pub character: CharacterConfig,
    pub cover: CoverDesign,
}

impl DesignConfig {
    /// Border color for `frame` backgrounds.
    pub fn frame_color(&self) -> &str {
        match self.color.brand_color() {
            Some(brand) => brand,
            None => self.theme.band_hex(),
        }
    }

    /// Colors derived from the brand color, when custom color mode is on.
    pub fn brand_palette(&self) -> Option<BrandPalette> {
        self.color.brand_color().map(BrandPalette::derive)
    }
}

/// Character and reference settings that every slide carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSettings {
    pub expression: String,
    pub position: Position,
    pub bubble: bool,
    pub bubble_text: String,
    pub character_image: Option<ImageData>,
    pub style_reference: Option<ImageData>,
    pub background: Option<BackgroundOverride>,
}

impl SectionSettings {
    fn with_character(expression: &str, position: Position, bubble: bool, text: &str) -> Self {
        Self {
            expression: expression.to_string(),
            position,
            bubble,
            bubble_text: text.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverSlide {
    pub title: String,
    pub subtitle: String,
    #[serde(flatten)]
    pub section: SectionSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroSlide {
    pub text: String,
    #[serde(flatten)]
    pub section: SectionSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MainSlide {
    pub title: String,
    pub image_description: String,
    pub text: String,
    #[serde(flatten)]
    pub section: SectionSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySlide {
    pub items: Vec<String>,
    #[serde(flatten)]
    pub section: SectionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideKind {
    Cover,
    Intro,
    Main,
    Summary,
}

/// One slide of the deck, borrowed from its owner.
#[derive(Debug, Clone, Copy)]
pub enum Slide<'a> {
    Cover(&'a CoverSlide),
    Intro(&'a IntroSlide),
    /// Position within the main slides, starting at 0.
    Main(usize, &'a MainSlide),
    Summary(&'a SummarySlide),
}

impl<'a> Slide<'a> {
    pub fn kind(&self) -> SlideKind {
        match self {
            Slide::Cover(_) => SlideKind::Cover,
            Slide::Intro(_) => SlideKind::Intro,
            Slide::Main(..) => SlideKind::Main,
            Slide::Summary(_) => SlideKind::Summary,
        }
    }

    pub fn section(&self) -> &'a SectionSettings {
        match *self {
            Slide::Cover(s) => &s.section,
            Slide::Intro(s) => &s.section,
            Slide::Main(_, s) => &s.section,
            Slide::Summary(s) => &s.section,
        }
    }

    /// Human readable label, e.g. `3. 1. プロフィール設定`.
    pub fn label(&self) -> String {
        match self {
            Slide::Cover(_) => "1. 表紙".to_string(),
            Slide::Intro(_) => "2. 導入".to_string(),
            Slide::Main(i, s) => format!("{}. {}", i + 3, s.title),
            Slide::Summary(_) => "まとめ".to_string(),
        }
    }

    /// Stem used for exported file names.
    pub fn export_stem(&self) -> String {
        match self {
            Slide::Cover(_) => "cover".to_string(),
            Slide::Intro(_) => "intro".to_string(),
            Slide::Main(i, _) => format!("main_{}", i + 1),
            Slide::Summary(_) => "summary".to_string(),
        }
    }
}

/// Slide content: cover, intro, 1..=7 main slides and the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deck {
    pub cover: CoverSlide,
    pub intro: IntroSlide,
    pub mains: Vec<MainSlide>,
    pub summary: SummarySlide,
}

impl Default for Deck {
    fn default() -> Self {
        let main = |title: &str, desc: &str, text: &str, section: SectionSettings| MainSlide {
            title: title.to_string(),
            image_description: desc.to_string(),
            text: text.to_string(),
            section,
        };
        Self {
            cover: CoverSlide {
                title: "2024年版\nインスタ運用の\n完全攻略ガイド".to_string(),
                subtitle: "初心者さんOK！".to_string(),
                section: SectionSettings::with_character(
                    "自信満々な笑顔で指差し",
                    Position::BottomRight,
                    false,
                    "保存必須！",
                ),
            },
            intro: IntroSlide {
                text: "「フォロワーが増えない...」\n「投稿ネタがない...」\nそんな悩みを解決する\n最強のメソッドを公開します。".to_string(),
                section: SectionSettings::with_character(
                    "困った顔で悩んでいるポーズ",
                    Position::TopRight,
                    true,
                    "要チェック！",
                ),
            },
            mains: vec![
                main(
                    "1. プロフィール設定",
                    "スマートフォンのインスタグラムのプロフィール画面",
                    "まずはプロフィールを整えよう。\n誰に何を届けるアカウントなのか\n一目でわかるように設定します。",
                    SectionSettings::with_character("真剣な顔で解説するポーズ", Position::BottomRight, true, "ここ重要！"),
                ),
                main(
                    "2. 統一感のある投稿",
                    "トーンの揃ったインスタグラムの写真グリッドレイアウト",
                    "フィード全体のトーン＆マナーを\n揃えることで、フォロー率が\n劇的にアップします。",
                    SectionSettings::with_character("プレゼンボードを示すポーズ", Position::BottomLeft, false, ""),
                ),
                main(
                    "3. ハッシュタグ選定",
                    "分析チャートと共に浮かぶハッシュタグ記号",
                    "ビッグワードだけでなく、\nミドル・スモールワードを\n組み合わせて流入を狙います。",
                    SectionSettings::with_character("虫眼鏡を持っているポーズ", Position::BottomRight, true, "検索対策"),
                ),
            ],
            summary: SummarySlide {
                items: [
                    "プロフィールを整える",
                    "世界観（トンマナ）を統一",
                    "適切なタグ付けを行う",
                    "ストーリーズで交流する",
                    "保存される投稿を作る",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                section: SectionSettings::with_character(
                    "幸せそうな笑顔でサムズアップ",
                    Position::BottomRight,
                    true,
                    "試してみてね",
                ),
            },
        }
    }
}

impl Deck {
    /// All slides in display order: cover, intro, mains, summary.
    pub fn slides(&self) -> Vec<Slide<'_>> {
        let mut slides = Vec::with_capacity(self.len());
        slides.push(Slide::Cover(&self.cover));
        slides.push(Slide::Intro(&self.intro));
        slides.extend(self.mains.iter().enumerate().map(|(i, s)| Slide::Main(i, s)));
        slides.push(Slide::Summary(&self.summary));
        slides
    }

    pub fn slide(&self, index: usize) -> Option<Slide<'_>> {
        let main_count = self.mains.len();
        match index {
            0 => Some(Slide::Cover(&self.cover)),
            1 => Some(Slide::Intro(&self.intro)),
            i if i < main_count + 2 => Some(Slide::Main(i - 2, &self.mains[i - 2])),
            i if i == main_count + 2 => Some(Slide::Summary(&self.summary)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.mains.len() + 3
    }

    pub fn add_main_slide(&mut self) -> Result<()> {
        if self.mains.len() >= MAX_MAIN_SLIDES {
            return Err(FeedError::ValidationError(format!(
                "A deck can hold at most {} main slides",
                MAX_MAIN_SLIDES
            )));
        }
        let number = self.mains.len() + 1;
        self.mains.push(MainSlide {
            title: format!("ポイント {}", number),
            image_description: String::new(),
            text: "ここに説明文が入ります。".to_string(),
            section: SectionSettings::with_character(
                "解説している",
                Position::BottomRight,
                false,
                "",
            ),
        });
        Ok(())
    }

    pub fn remove_main_slide(&mut self, index: usize) -> Result<MainSlide> {
        if index >= self.mains.len() {
            return Err(FeedError::SlideNotFound(index + 2));
        }
        Ok(self.mains.remove(index))
    }

    pub fn add_summary_item(&mut self, item: &str) -> Result<()> {
        if self.summary.items.len() >= MAX_SUMMARY_ITEMS {
            return Err(FeedError::ValidationError(format!(
                "A summary can hold at most {} items",
                MAX_SUMMARY_ITEMS
            )));
        }
        self.summary.items.push(item.to_string());
        Ok(())
    }

    /// Replace the deck's text content with a generated post structure.
    ///
    /// Main slides are rebuilt from scratch, capped at [`MAX_MAIN_SLIDES`], so
    /// their character, reference and background settings return to defaults.
    /// Cover, intro and summary keep their section settings.
    pub fn apply_structure(&mut self, structure: &PostStructure) {
        self.cover.title = structure.cover_title.clone();
        self.cover.subtitle = structure.cover_subtitle.clone();
        self.intro.text = structure.intro_text.clone();
        self.mains = structure
            .main_slides
            .iter()
            .take(MAX_MAIN_SLIDES)
            .enumerate()
            .map(|(i, draft)| MainSlide {
                title: if draft.title.is_empty() {
                    format!("ページ {}", i + 1)
                } else {
                    draft.title.clone()
                },
                image_description: draft.image_desc.clone(),
                text: draft.text.clone(),
                section: SectionSettings::default(),
            })
            .collect();
        if let Some(items) = &structure.summary_items {
            self.summary.items = items.clone();
        }
        info!(
            "Applied post structure: {} main slides, {} summary items",
            self.mains.len(),
            self.summary.items.len()
        );
    }
}

/// A complete project: deck-wide design plus slide content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub design: DesignConfig,
    pub deck: Deck,
}

impl Project {
    /// Load a project file. Image fields may hold data URLs, paths relative to
    /// the project file, or http(s) URLs; the latter two are loaded and inlined.
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading project: {:?}", path);
        crate::utils::validate_file_exists(path)?;
        let content = fs::read_to_string(path).map_err(FeedError::FileReadError)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&content, base_dir)
    }

    pub fn from_json(content: &str, base_dir: &Path) -> Result<Self> {
        let mut value: Value = serde_json::from_str(content)?;
        inline_image_sources(&mut value, base_dir)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        crate::utils::ensure_parent_directory_exists(path)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(FeedError::FileReadError)
    }
}

fn inline_image_sources(value: &mut Value, base_dir: &Path) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if IMAGE_KEYS.contains(&key.as_str()) {
                    if let Value::String(raw) = child {
                        let source = ImageSource::new(raw);
                        if !source.is_data_url() {
                            debug!("Inlining image {:?} for key {}", raw, key);
                            *raw = source.load(base_dir)?.to_data_url();
                        }
                        continue;
                    }
                }
                inline_image_sources(child, base_dir)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_image_sources(item, base_dir)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::MainSlideDraft;
    use tempfile::TempDir;

    #[test]
    fn test_slide_order_and_lookup() {
        let deck = Deck::default();
        let kinds: Vec<SlideKind> = deck.slides().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SlideKind::Cover,
                SlideKind::Intro,
                SlideKind::Main,
                SlideKind::Main,
                SlideKind::Main,
                SlideKind::Summary
            ]
        );
        assert_eq!(deck.len(), 6);
        assert!(matches!(deck.slide(3), Some(Slide::Main(1, _))));
        assert!(matches!(deck.slide(5), Some(Slide::Summary(_))));
        assert!(deck.slide(6).is_none());
    }

    #[test]
    fn test_labels_and_stems() {
        let deck = Deck::default();
        let slide = deck.slide(2).unwrap();
        assert_eq!(slide.label(), "3. 1. プロフィール設定");
        assert_eq!(slide.export_stem(), "main_1");
        assert_eq!(deck.slide(0).unwrap().export_stem(), "cover");
    }

    #[test]
    fn test_override_replaces_global() {
        let global = GlobalBackground {
            kind: BackgroundKind::Solid,
            color: "#111111".to_string(),
            description: "global detail".to_string(),
            ..GlobalBackground::default()
        };
        let section = BackgroundOverride {
            kind: Some(BackgroundKind::White),
            ..BackgroundOverride::default()
        };

        let inherited = resolve_background(None, &global);
        assert_eq!(inherited.kind, BackgroundKind::Solid);
        assert_eq!(inherited.color, "#111111");

        let resolved = resolve_background(Some(&section), &global);
        assert_eq!(resolved.kind, BackgroundKind::White);
        assert_eq!(resolved.color, DEFAULT_SOLID_COLOR);
        assert_eq!(resolved.description, "global detail");
    }

    #[test]
    fn test_untyped_override_keeps_global_frame() {
        let global = GlobalBackground {
            kind: BackgroundKind::Frame,
            color: "#a8a29e".to_string(),
            ..GlobalBackground::default()
        };
        let section = BackgroundOverride {
            description: "soft paper texture".to_string(),
            ..BackgroundOverride::default()
        };

        let resolved = resolve_background(Some(&section), &global);
        assert_eq!(resolved.kind, BackgroundKind::Frame);
        assert_eq!(resolved.color, "#a8a29e");
        assert_eq!(resolved.description, "soft paper texture");

        let parsed: BackgroundOverride =
            serde_json::from_str(r#"{"type": null, "description": "x"}"#).unwrap();
        assert_eq!(parsed.kind, None);
    }

    #[test]
    fn test_main_slide_limits() {
        let mut deck = Deck::default();
        while deck.mains.len() < MAX_MAIN_SLIDES {
            deck.add_main_slide().unwrap();
        }
        assert_eq!(deck.mains[3].title, "ポイント 4");
        assert!(deck.add_main_slide().is_err());
        deck.remove_main_slide(0).unwrap();
        assert!(matches!(deck.remove_main_slide(10), Err(FeedError::SlideNotFound(12))));

        while deck.summary.items.len() < MAX_SUMMARY_ITEMS {
            deck.add_summary_item("もう一つ").unwrap();
        }
        assert!(matches!(
            deck.add_summary_item("多すぎ"),
            Err(FeedError::ValidationError(_))
        ));
    }

    #[test]
    fn test_apply_structure_resets_mains() {
        let mut deck = Deck::default();
        let structure = PostStructure {
            cover_title: "新タイトル".to_string(),
            cover_subtitle: "副題".to_string(),
            intro_text: "導入".to_string(),
            main_slides: vec![
                MainSlideDraft {
                    title: String::new(),
                    image_desc: "a desk".to_string(),
                    text: "本文".to_string(),
                },
                MainSlideDraft {
                    title: "二枚目".to_string(),
                    image_desc: String::new(),
                    text: String::new(),
                },
            ],
            summary_items: Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
        };
        deck.apply_structure(&structure);
        assert_eq!(deck.cover.title, "新タイトル");
        assert_eq!(deck.mains.len(), 2);
        assert_eq!(deck.mains[0].title, "ページ 1");
        assert_eq!(deck.mains[0].section, SectionSettings::default());
        assert_eq!(deck.summary.items.len(), 3);
        assert_eq!(deck.cover.section.expression, "自信満々な笑顔で指差し");

        deck.apply_structure(&PostStructure {
            summary_items: None,
            ..structure.clone()
        });
        assert_eq!(deck.summary.items, vec!["a", "b", "c"]);

        deck.apply_structure(&PostStructure {
            summary_items: Some(Vec::new()),
            ..structure
        });
        assert!(deck.summary.items.is_empty());
    }

    #[test]
    fn test_brand_palette_follows_custom_color() {
        let mut design = DesignConfig::default();
        assert_eq!(design.brand_palette(), None);

        design.color.use_custom = true;
        design.color.custom_color = "#FFF59D".to_string();
        let palette = design.brand_palette().unwrap();
        assert_eq!(palette.band, "#FFF59D");
        assert_eq!(palette.text, "#1e293b");
    }

    #[test]
    fn test_brand_color_validation() {
        let mut colors = ColorConfig::default();
        assert_eq!(colors.brand_color(), None);
        colors.use_custom = true;
        colors.custom_color = "pink".to_string();
        assert_eq!(colors.brand_color(), Some(color::FALLBACK_BRAND_COLOR));
    }

    #[test]
    fn test_project_inlines_relative_images() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        fs::write(dir.path().join("me.png"), png).expect("write image");
        let json = r#"{
            "design": { "theme": "high_sense", "character": { "source": "upload", "uploaded_image": "me.png" } },
            "deck": { "cover": { "title": "T", "background": { "type": "image", "image_style": "wood" } } }
        }"#;
        let path = dir.path().join("project.json");
        fs::write(&path, json).expect("write project");

        let project = Project::from_file(&path).unwrap();
        assert_eq!(project.design.theme, ThemeId::HighSense);
        let image = project.design.character.global_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        let bg = project.deck.cover.section.background.as_ref().unwrap();
        assert_eq!(bg.kind, Some(BackgroundKind::Image));
        assert_eq!(bg.image_style, Some(BackgroundImageStyle::Wood));
        // Omitted sections keep their defaults
        assert_eq!(project.deck.mains.len(), 3);
    }

    #[test]
    fn test_project_round_trips_through_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("project.json");
        let project = Project::default();
        project.to_file(&path).unwrap();
        assert_eq!(Project::from_file(&path).unwrap(), project);
    }
}
