//! Color specifications and generated cluster palettes.
//!
//! A color specification is an SVG color name (case and spaces ignored),
//! `transparent`, or `#` followed by 3, 6, 8 (`AARRGGBB`), 9 or 12 hex
//! digits.

use std::sync::LazyLock;

use palette::{Hsv, IntoColor, Srgb, Srgba};
use regex::Regex;

/// Color of a cluster, 8 bits per channel with alpha.
pub type Color = Srgba<u8>;

/// `#` followed by a supported number of hex digits.
pub static HEX_COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8}|[0-9a-fA-F]{9}|[0-9a-fA-F]{12})$")
        .expect("Invalid hex color pattern")
});

/// Saturation of generated palette colors.
pub const PALETTE_SATURATION: f32 = 0.5;
/// Value (brightness) of generated palette colors.
pub const PALETTE_VALUE: f32 = 1.0;

/// Returns true if `value` is a color specification.
#[inline]
pub fn is_color(value: &str) -> bool {
    parse_color(value).is_some()
}

/// Parse a color specification.
pub fn parse_color(value: &str) -> Option<Color> {
    if value.starts_with('#') {
        return parse_hex(value);
    }

    let name: String = value
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if name == "transparent" {
        return Some(Srgba::new(0, 0, 0, 0));
    }
    palette::named::from_str(&name).map(|rgb| Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
}

fn parse_hex(value: &str) -> Option<Color> {
    if !HEX_COLOR_PATTERN.is_match(value) {
        return None;
    }
    let digits = &value[1..];
    let channel = |index: usize, width: usize| {
        u32::from_str_radix(&digits[index * width..(index + 1) * width], 16).ok()
    };

    let (alpha, red, green, blue) = match digits.len() {
        3 => (255, channel(0, 1)? * 17, channel(1, 1)? * 17, channel(2, 1)? * 17),
        6 => (255, channel(0, 2)?, channel(1, 2)?, channel(2, 2)?),
        8 => (channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, channel(3, 2)?),
        9 => (255, channel(0, 3)? >> 4, channel(1, 3)? >> 4, channel(2, 3)? >> 4),
        12 => (255, channel(0, 4)? >> 8, channel(1, 4)? >> 8, channel(2, 4)? >> 8),
        _ => return None,
    };
    Some(Srgba::new(red as u8, green as u8, blue as u8, alpha as u8))
}

/// Generate `n` colors with evenly spaced hues `k / (n + 1)` for `k < n`.
pub fn generate_palette(n: usize) -> Vec<Color> {
    (0..n)
        .map(|k| {
            let hue = k as f32 / (n + 1) as f32;
            let hsv: Hsv = Hsv::new(hue * 360.0, PALETTE_SATURATION, PALETTE_VALUE);
            let rgb: Srgb = hsv.into_color();
            let rgb = rgb.into_format::<u8>();
            Srgba::new(rgb.red, rgb.green, rgb.blue, 255)
        })
        .collect()
}

/// Format as `#rrggbb`, or `#aarrggbb` for translucent colors.
pub fn to_hex(color: Color) -> String {
    if color.alpha == 255 {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.alpha, color.red, color.green, color.blue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red"), Some(Srgba::new(255, 0, 0, 255)));
        assert_eq!(parse_color("Blue"), Some(Srgba::new(0, 0, 255, 255)));
        assert_eq!(parse_color("dark blue"), parse_color("darkblue"));
        assert_eq!(parse_color("transparent"), Some(Srgba::new(0, 0, 0, 0)));
        assert!(!is_color("reddish"));
        assert!(!is_color("N/A"));
        assert!(!is_color(""));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#f00"), Some(Srgba::new(255, 0, 0, 255)));
        assert_eq!(parse_color("#00FF80"), Some(Srgba::new(0, 255, 128, 255)));
        assert_eq!(parse_color("#80112233"), Some(Srgba::new(0x11, 0x22, 0x33, 0x80)));
        assert_eq!(parse_color("#fff000000"), Some(Srgba::new(255, 0, 0, 255)));
        assert_eq!(parse_color("#ffff00000000"), Some(Srgba::new(255, 0, 0, 255)));
        assert!(!is_color("#ff"));
        assert!(!is_color("#ggg"));
        assert!(!is_color("ff0000"));
    }

    #[test]
    fn test_generate_palette() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        // First hue is 0: red at full value, half saturation.
        assert_eq!(colors[0].red, 255);
        assert_eq!(colors[0].green, colors[0].blue);
        assert!(colors.iter().all(|c| c.alpha == 255));
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Srgba::new(255, 0, 16, 255)), "#ff0010");
        assert_eq!(to_hex(Srgba::new(0, 0, 0, 0)), "#00000000");
        assert_eq!(parse_color(&to_hex(Srgba::new(1, 2, 3, 255))), Some(Srgba::new(1, 2, 3, 255)));
    }
}
