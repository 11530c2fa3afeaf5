// ABOUTME: Design catalogs for the feed-slides application
// ABOUTME: Enum-keyed tables mapping each selectable option to its prompt fragment

/// Declares a catalog enum. Every variant carries a stable id (used in project
/// files), a display label and a prompt fragment. Unknown ids resolve to the
/// `fallback` variant instead of failing.
macro_rules! catalog {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default $default:ident, fallback $fallback:ident) {
            $( $variant:ident => ($id:literal, $label:literal, $prompt:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn prompt(self) -> &'static str {
                match self {
                    $($name::$variant => $prompt),+
                }
            }

            pub fn from_id(id: &str) -> Self {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.id() == id)
                    .unwrap_or($name::$fallback)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.id())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let id = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_id(&id))
            }
        }
    };
}

catalog! {
    /// Visual theme. The prompt fragment is the theme's background descriptor.
    pub enum ThemeId (default ModernLifestyle, fallback ModernLifestyle) {
        ModernLifestyle => ("modern_lifestyle", "モダン・ライフスタイル",
            "clean white marble background, soft shadows, dried flowers, kinfolk style"),
        AnimeArt => ("anime_art", "アニメ調",
            "anime art style background, beautiful blue sky with huge cumulus clouds, school rooftop, makoto shinkai style"),
        HighSense => ("high_sense", "ハイセンス・モード",
            "stylish matte monochrome background with minimal vivid color accents, abstract geometric patterns, architectural shapes, noise grain, high-end editorial design"),
        TechGadget => ("tech_gadget", "ガジェット・黒背景",
            "dark matte workspace, neon blue rim light, sleek gadgets layout"),
        PopColor => ("pop_color", "ポップ・カラフル",
            "solid pastel color background, memphis pattern elements"),
        EmotionalSky => ("emotional_sky", "エモ・空/風景",
            "beautiful sunset sky, emotional clouds, grainy film photography style"),
        BusinessClean => ("business_clean", "ビジネス・信頼",
            "blurred office background, geometric blue overlays"),
        SoftFeminine => ("soft_feminine", "やわらかく女性的",
            "soft beige and pastel pink gradient, lace texture overlay, dried flowers, warm morning sunlight, airy composition, cozy atmosphere"),
    }
}

/// Color tokens of a theme. `band` is a palette token such as `blue-600`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub text: &'static str,
    pub band: &'static str,
    pub background: &'static str,
    pub accent: &'static str,
}

impl ThemeId {
    pub fn background(self) -> &'static str {
        self.prompt()
    }

    pub fn atmosphere(self) -> &'static str {
        match self {
            ThemeId::ModernLifestyle => {
                "aesthetic, clean, minimalist, high key lighting, instagrammable"
            }
            ThemeId::AnimeArt => {
                "emotional, vivid, 2D animation style, sparkling, nostalgic, high quality anime art"
            }
            ThemeId::HighSense => {
                "avant-garde, fashionable, modern art, cool, sophisticated, luxury brand aesthetic. Monotone base with striking color accents."
            }
            ThemeId::TechGadget => "tech-savvy, futuristic, professional, dark mode style",
            ThemeId::PopColor => "energetic, playful, gen-z aesthetic, bold colors",
            ThemeId::EmotionalSky => "nostalgic, emotional, sentimental, warm lighting",
            ThemeId::BusinessClean => "trustworthy, informative, corporate, educational",
            ThemeId::SoftFeminine => {
                "feminine, gentle, soft, elegant, airy, bright and warm, lovely"
            }
        }
    }

    pub fn colors(self) -> ThemeColors {
        let (text, band, background, accent) = match self {
            ThemeId::ModernLifestyle => ("slate-800", "stone-200", "stone-50/stone-100", "stone-600"),
            ThemeId::AnimeArt => ("slate-900", "indigo-400", "sky-100/indigo-200", "indigo-600"),
            ThemeId::HighSense => ("black", "lime-400", "slate-200/slate-400", "stone-800"),
            ThemeId::TechGadget => ("white", "blue-600", "slate-900/black", "blue-400"),
            ThemeId::PopColor => ("slate-900", "yellow-400", "pink-200/yellow-100", "pink-600"),
            ThemeId::EmotionalSky => ("white", "orange-500/80", "orange-100/blue-200", "orange-200"),
            ThemeId::BusinessClean => ("white", "navy-900", "blue-50/white", "blue-800"),
            ThemeId::SoftFeminine => ("slate-600", "rose-200", "rose-50/orange-50", "rose-400"),
        };
        ThemeColors {
            text,
            band,
            background,
            accent,
        }
    }

    /// Hex value of the band color, used for frame borders.
    pub fn band_hex(self) -> &'static str {
        match self.colors().band {
            "stone-200" => "#a8a29e",
            "indigo-400" => "#818cf8",
            "lime-400" => "#a3e635",
            "blue-600" => "#2563eb",
            "yellow-400" => "#facc15",
            "orange-500/80" => "#f97316",
            "navy-900" => "#1e3a5f",
            "rose-200" => "#fda4af",
            _ => "#ec4899",
        }
    }
}

catalog! {
    pub enum FontStyle (default BoldSans, fallback BoldSans) {
        BoldSans => ("bold_sans", "太字ゴシック", "heavy bold sans-serif typography, impact font"),
        Mincho => ("mincho", "明朝体", "elegant serif typography, japanese mincho style"),
        Handwritten => ("handwritten", "手書き風", "playful handwritten style typography, marker font"),
    }
}

catalog! {
    pub enum CoverLayout (default Band, fallback Band) {
        Simple => ("simple", "シンプル",
            "No overlay box, text floats directly on background with subtle drop shadow"),
        Band => ("band", "帯",
            "Text on a distinct solid colored horizontal banner strip across the image"),
        DarkOverlay => ("dark_overlay", "ダークオーバーレイ",
            "Semi-transparent dark black blurred glass effect overlay box, modern luxury UI style"),
        PopFrame => ("pop_frame", "ポップ枠",
            "Pop style design with a white inner frame border, decorative elements and cute layout"),
        Split => ("split", "上下分割",
            "Split layout: top half is visual/image area, bottom half is clean solid color text zone"),
        LeftRight => ("left_right", "左右分割",
            "Left-right split layout: left side has title text area, right side has character/visual image area, vertically divided"),
        Card => ("card", "カード型",
            "A centered white/light card panel floating on the full-bleed background image. Text is inside the card with rounded corners and shadow. Background visible around the card edges"),
        Diagonal => ("diagonal", "対角線",
            "Dynamic diagonal layout with title text placed at an angle, diagonal divider line splitting the composition into two color/image zones, energetic and modern"),
    }
}

catalog! {
    pub enum TitleDesign (default Shadow, fallback Shadow) {
        Shadow => ("shadow", "ドロップシャドウ",
            "Bold text with strong dramatic drop shadow for depth and impact"),
        Frame => ("frame", "枠文字",
            "Text with visible border/outline stroke around each character, outlined typography"),
        Marker => ("marker", "マーカー",
            "Text with highlight marker/brush stroke color behind it, hand-drawn highlight effect"),
        Gradient => ("gradient", "グラデーション",
            "Text with gradient color fill effect, colorful typography"),
        Outline => ("outline", "白フチ",
            "White outlined text with dark fill, manga/comic style bold text"),
    }
}

catalog! {
    pub enum SubtitleDesign (default Pill, fallback Pill) {
        Pill => ("pill", "ピル型", "Subtitle in a rounded pill/capsule shaped badge with shadow"),
        Tag => ("tag", "タグ風",
            "Subtitle styled as a tag/label with angled left edge, like a price tag"),
        Bubble => ("bubble", "吹き出し",
            "Subtitle in a speech bubble shape with a small triangle pointer"),
        Underline => ("underline", "下線",
            "Subtitle with a decorative thick underline accent below it"),
        None => ("none", "なし", "Subtitle displayed as plain text without any decoration"),
    }
}

catalog! {
    /// Named AI background recipes for the `image` background type.
    pub enum BackgroundImageStyle (default Marble, fallback Marble) {
        Marble => ("marble", "大理石",
            "elegant white and grey marble stone texture background, luxury natural pattern"),
        Nature => ("nature", "自然",
            "lush green nature background, soft bokeh leaves and sunlight, fresh outdoor"),
        City => ("city", "都市",
            "blurred city skyline background, soft bokeh lights, urban atmosphere"),
        Abstract => ("abstract", "抽象",
            "abstract colorful gradient background, smooth flowing shapes, modern art"),
        Texture => ("texture", "テクスチャ",
            "subtle fabric linen texture background, clean muted tones, minimalist"),
        Wood => ("wood", "木目",
            "warm natural wood grain texture background, rustic table top surface"),
        Sky => ("sky", "空", "beautiful clear blue sky with soft white clouds, dreamy atmosphere"),
    }
}

catalog! {
    pub enum SwipeGuide (default None, fallback None) {
        None => ("none", "なし", ""),
        PageCount => ("page_count", "枚数バッジ",
            "A small page count badge \"全10枚\" or \"1/10\" in the top-right or bottom-right corner of the cover"),
        SwipeArrow => ("swipe_arrow", "スワイプ矢印",
            "A \"Swipe →\" or \"→ スワイプ\" indicator with arrow icon at the bottom of the cover to encourage swiping"),
        Peek => ("peek", "チラ見せ",
            "The right edge of the cover shows a slight peek/preview of the next slide content, as if the next page is slightly visible behind this one"),
    }
}

catalog! {
    pub enum EyeCatchBadge (default None, fallback None) {
        None => ("none", "なし", ""),
        NumberBig => ("number_big", "数字強調",
            "A large bold emphasized number or statistic (like \"TOP5\" \"3選\" \"100%\") is prominently displayed as a huge eye-catching element"),
        Label => ("label", "ラベル",
            "A decorative label badge like \"保存版\" \"完全攻略\" \"初心者OK\" \"永久保存版\" in a rounded badge/chip placed prominently"),
        Ribbon => ("ribbon", "リボン",
            "A ribbon or seal-shaped badge decoration (like \"NEW\" \"人気\" \"おすすめ\") in the corner of the image, like a gift ribbon or award seal"),
    }
}

catalog! {
    pub enum DecorationEffect (default None, fallback None) {
        None => ("none", "なし", ""),
        Sparkle => ("sparkle", "キラキラ",
            "Sparkle/glitter particle effects scattered around the text and edges, twinkling light dots, magical atmosphere"),
        Geometric => ("geometric", "幾何学",
            "Geometric decorative shapes (circles, triangles, lines, dots) scattered as accent elements around the layout"),
        GradientOverlay => ("gradient_overlay", "グラデオーバーレイ",
            "A subtle gradient color overlay flowing across the design, adding depth and modern aesthetic"),
        Grain => ("grain", "ノイズ/グレイン",
            "Film grain/noise texture overlay for a retro vintage analog feel, slightly grainy matte finish"),
    }
}

catalog! {
    pub enum MarginLevel (default Medium, fallback None) {
        None => ("none", "指定なし", ""),
        FullBleed => ("full_bleed", "フルブリード",
            "Full-bleed design with no margins, content extends to all edges"),
        Small => ("small", "少し余白",
            "Slight padding/margin around the content, about 3-5% from each edge"),
        Medium => ("medium", "標準余白",
            "Standard comfortable margins with balanced whitespace around all content, about 8-10% padding"),
        Large => ("large", "たっぷり余白",
            "Generous whitespace margins (15%+ from edges), luxurious airy breathing room, high-end editorial feel"),
    }
}

catalog! {
    pub enum TitleEmphasis (default None, fallback None) {
        None => ("none", "均一", ""),
        KeywordLarge => ("keyword_large", "キーワード特大",
            "The most important keyword/number in the title should be displayed 2-3x larger than the rest of the title text, creating dramatic size contrast for visual hierarchy"),
        FirstLineLarge => ("first_line_large", "1行目特大",
            "The first line of the title text should be much larger (2x) than subsequent lines, creating a bold header with smaller subtext below"),
    }
}

catalog! {
    /// Character size, mapped to a camera shot descriptor.
    pub enum CharacterSize (default Medium, fallback Medium) {
        Chibi => ("chibi", "ちびキャラ",
            "Chibi style, super deformed, tiny full body shot, occupying 1/10 of the screen area"),
        Small => ("small", "小", "Full body shot, wide shot showing entire figure"),
        Medium => ("medium", "中", "Upper body shot (waist up)"),
        Large => ("large", "大", "Close-up shot, bust up shot"),
    }
}

catalog! {
    /// Corner of the slide the character is placed in.
    pub enum Position (default BottomRight, fallback BottomRight) {
        TopLeft => ("top_left", "左上", "top left"),
        TopRight => ("top_right", "右上", "top right"),
        BottomLeft => ("bottom_left", "左下", "bottom left"),
        BottomRight => ("bottom_right", "右下", "bottom right"),
    }
}

catalog! {
    pub enum TextAlign (default Center, fallback Center) {
        Left => ("left", "左揃え", "Left aligned text"),
        Center => ("center", "中央揃え", "Center aligned text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_fall_back() {
        assert_eq!(ThemeId::from_id("vaporwave"), ThemeId::ModernLifestyle);
        assert_eq!(CoverLayout::from_id(""), CoverLayout::Band);
        assert_eq!(TitleDesign::from_id("glitter"), TitleDesign::Shadow);
        assert_eq!(SwipeGuide::from_id("bogus"), SwipeGuide::None);
        assert_eq!(MarginLevel::from_id("bogus"), MarginLevel::None);
    }

    #[test]
    fn test_ids_are_unique_and_round_trip() {
        for layout in CoverLayout::ALL {
            assert_eq!(CoverLayout::from_id(layout.id()), *layout);
        }
        for theme in ThemeId::ALL {
            assert_eq!(ThemeId::from_id(theme.id()), *theme);
        }
        assert_eq!(CoverLayout::ALL.len(), 8);
        assert_eq!(TitleDesign::ALL.len(), 5);
        assert_eq!(SubtitleDesign::ALL.len(), 5);
    }

    #[test]
    fn test_none_selections_have_empty_fragments() {
        assert!(SwipeGuide::None.prompt().is_empty());
        assert!(EyeCatchBadge::None.prompt().is_empty());
        assert!(DecorationEffect::None.prompt().is_empty());
        assert!(MarginLevel::None.prompt().is_empty());
        assert!(TitleEmphasis::None.prompt().is_empty());
        assert!(!MarginLevel::FullBleed.prompt().is_empty());
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&CoverLayout::DarkOverlay).unwrap();
        assert_eq!(json, "\"dark_overlay\"");
        let parsed: Position = serde_json::from_str("\"top_left\"").unwrap();
        assert_eq!(parsed, Position::TopLeft);
        let unknown: CharacterSize = serde_json::from_str("\"giant\"").unwrap();
        assert_eq!(unknown, CharacterSize::Medium);
    }

    #[test]
    fn test_band_hex() {
        assert_eq!(ThemeId::TechGadget.band_hex(), "#2563eb");
        assert_eq!(ThemeId::HighSense.band_hex(), "#a3e635");
    }
}
