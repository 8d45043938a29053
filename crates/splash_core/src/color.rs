//! RGBA colors
//!
//! Colors deserialize from CSS-style hex strings (`"#RRGGBB"` or
//! `"#RRGGBBAA"`) so they can be written directly in config files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color, components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned when a color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ColorParseError(pub String);

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Build a color from CSS `hsla()` components
    ///
    /// `hue` is in degrees and wraps; saturation, lightness and alpha are
    /// fractions and are clamped to `0.0..=1.0`.
    pub fn from_hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let a = alpha.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::rgba(l, l, l, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgba(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            a,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        let err = || ColorParseError(s.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let value = u32::from_str_radix(digits, 16).map_err(|_| err())?;
        match digits.len() {
            6 => Ok(Self::from_hex(value)),
            8 => Ok(Self::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
            _ => Err(err()),
        }
    }

    /// Format as `#RRGGBBAA`
    pub fn to_hex_string(&self) -> String {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b),
            to_byte(self.a)
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex_string()
    }
}
