// ABOUTME: Color utilities for the feed-slides application
// ABOUTME: Hex/RGB conversion, lightening, darkening and brand palette derivation

use log::warn;

/// Brand color used when the configured custom color is not a valid `#RRGGBB` value.
pub const FALLBACK_BRAND_COLOR: &str = "#E91E63";

/// Luminance above which a color counts as light.
const LIGHT_THRESHOLD: f64 = 0.6;

/// An RGB triple. Channels are kept as floats so interpolation can be
/// rounded once, when the color is encoded back to hex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Decode `#rrggbb` (the leading `#` is optional).
///
/// Never fails: a channel that cannot be parsed decodes to 0.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .map(f64::from)
            .unwrap_or(0.0)
    };
    Rgb {
        r: channel(0..2),
        g: channel(2..4),
        b: channel(4..6),
    }
}

/// Encode channels as lowercase `#rrggbb`, clamping to [0, 255] and rounding.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    fn channel(c: f64) -> u8 {
        if c.is_nan() {
            return 0;
        }
        c.round().clamp(0.0, 255.0) as u8
    }
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// Interpolate toward white by `amount` in [0, 1].
pub fn lighten(hex: &str, amount: f64) -> String {
    let amount = clamp_amount(amount);
    let Rgb { r, g, b } = hex_to_rgb(hex);
    rgb_to_hex(
        r + (255.0 - r) * amount,
        g + (255.0 - g) * amount,
        b + (255.0 - b) * amount,
    )
}

/// Interpolate toward black by `amount` in [0, 1].
pub fn darken(hex: &str, amount: f64) -> String {
    let amount = clamp_amount(amount);
    let Rgb { r, g, b } = hex_to_rgb(hex);
    rgb_to_hex(r * (1.0 - amount), g * (1.0 - amount), b * (1.0 - amount))
}

/// Perceived luminance test: `0.299R + 0.587G + 0.114B` over 255 against 0.6.
pub fn is_light(hex: &str) -> bool {
    let Rgb { r, g, b } = hex_to_rgb(hex);
    (0.299 * r + 0.587 * g + 0.114 * b) / 255.0 > LIGHT_THRESHOLD
}

/// Whether `value` is exactly `#` followed by six hex digits.
pub fn is_valid_hex(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns the custom color if it is well formed, otherwise [`FALLBACK_BRAND_COLOR`].
pub fn valid_brand_color(value: &str) -> &str {
    if is_valid_hex(value) {
        value
    } else {
        warn!(
            "Custom color {:?} is not a #RRGGBB value, using {}",
            value, FALLBACK_BRAND_COLOR
        );
        FALLBACK_BRAND_COLOR
    }
}

fn clamp_amount(amount: f64) -> f64 {
    if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    }
}

/// Colors derived from a single brand color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandPalette {
    pub band: String,
    pub text: String,
    pub background_light: String,
    pub background_very_light: String,
    pub accent: String,
    pub title_stroke: String,
}

impl BrandPalette {
    pub fn derive(brand: &str) -> Self {
        let brand = valid_brand_color(brand);
        Self {
            band: brand.to_string(),
            text: if is_light(brand) { "#1e293b" } else { "#ffffff" }.to_string(),
            background_light: lighten(brand, 0.85),
            background_very_light: lighten(brand, 0.92),
            accent: darken(brand, 0.3),
            title_stroke: darken(brand, 0.2),
        }
    }
}
